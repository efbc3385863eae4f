use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::types::{EmotionalState, NeedLevel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub audio: AudioConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
    pub buffer_size: usize,
    /// Constant tone gain, fraction of full scale.
    pub gain: f32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub show_foreign_affirmation: bool,
    pub default_emotional_state: Option<EmotionalState>,
    pub default_need_level: Option<NeedLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig {
                device: None, // Use default device
                sample_rate: 0, // 0 = ask the device
                buffer_size: 1024,
                gain: 0.2,
                enabled: true,
            },
            player: PlayerConfig {
                show_foreign_affirmation: true,
                default_emotional_state: None,
                default_need_level: None,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if let Ok(content) = fs::read_to_string(&path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid config file {:?}", path))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(&path, yaml).with_context(|| format!("Failed to write config {:?}", path))?;
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(dir.join("mindful").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_historical_values() {
        let config = Config::default();
        assert_eq!(config.audio.gain, 0.2);
        assert!(config.audio.enabled);
        assert!(config.player.show_foreign_affirmation);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let mut config = Config::default();
        config.audio.device = Some("pipewire".to_string());
        config.player.default_emotional_state = Some(EmotionalState::Fear);
        config.player.default_need_level = Some(NeedLevel::Safety);

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.audio.device.as_deref(), Some("pipewire"));
        assert_eq!(parsed.player.default_emotional_state, Some(EmotionalState::Fear));
        assert_eq!(parsed.player.default_need_level, Some(NeedLevel::Safety));
    }
}
