use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Emotional state half of an exercise key, after the Hawkins scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionalState {
    Shame,
    Guilt,
    Fear,
    Anger,
    Courage,
    Acceptance,
    Love,
    Joy,
    Peace,
}

impl EmotionalState {
    pub const ALL: [EmotionalState; 9] = [
        EmotionalState::Shame,
        EmotionalState::Guilt,
        EmotionalState::Fear,
        EmotionalState::Anger,
        EmotionalState::Courage,
        EmotionalState::Acceptance,
        EmotionalState::Love,
        EmotionalState::Joy,
        EmotionalState::Peace,
    ];

    /// Calibration score shown on the selection screen.
    pub fn score(&self) -> u16 {
        match self {
            EmotionalState::Shame => 20,
            EmotionalState::Guilt => 30,
            EmotionalState::Fear => 100,
            EmotionalState::Anger => 150,
            EmotionalState::Courage => 200,
            EmotionalState::Acceptance => 350,
            EmotionalState::Love => 500,
            EmotionalState::Joy => 540,
            EmotionalState::Peace => 600,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            EmotionalState::Shame => "😔",
            EmotionalState::Guilt => "😞",
            EmotionalState::Fear => "😰",
            EmotionalState::Anger => "😠",
            EmotionalState::Courage => "💪",
            EmotionalState::Acceptance => "🙏",
            EmotionalState::Love => "❤️",
            EmotionalState::Joy => "😊",
            EmotionalState::Peace => "☮️",
        }
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmotionalState::Shame => "Shame",
            EmotionalState::Guilt => "Guilt",
            EmotionalState::Fear => "Fear",
            EmotionalState::Anger => "Anger",
            EmotionalState::Courage => "Courage",
            EmotionalState::Acceptance => "Acceptance",
            EmotionalState::Love => "Love",
            EmotionalState::Joy => "Joy",
            EmotionalState::Peace => "Peace",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for EmotionalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionalState::ALL
            .iter()
            .find(|state| state.to_string().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown emotional state '{}'", s))
    }
}

/// Need level half of an exercise key, after Maslow's hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedLevel {
    Physiological,
    Safety,
    LoveBelonging,
    Esteem,
    SelfActualization,
}

impl NeedLevel {
    pub const ALL: [NeedLevel; 5] = [
        NeedLevel::Physiological,
        NeedLevel::Safety,
        NeedLevel::LoveBelonging,
        NeedLevel::Esteem,
        NeedLevel::SelfActualization,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NeedLevel::Physiological => "Бие махбод",
            NeedLevel::Safety => "Аюулгүй байдал",
            NeedLevel::LoveBelonging => "Хайр ба харьяалал",
            NeedLevel::Esteem => "Өөртөө үнэлэлт",
            NeedLevel::SelfActualization => "Өөрийгөө хэрэгжүүлэх",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NeedLevel::Physiological => "🫀",
            NeedLevel::Safety => "🛡️",
            NeedLevel::LoveBelonging => "❤️",
            NeedLevel::Esteem => "⭐",
            NeedLevel::SelfActualization => "🌟",
        }
    }
}

impl fmt::Display for NeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            NeedLevel::Physiological => "physiological",
            NeedLevel::Safety => "safety",
            NeedLevel::LoveBelonging => "love_belonging",
            NeedLevel::Esteem => "esteem",
            NeedLevel::SelfActualization => "self_actualization",
        };
        write!(f, "{}", key)
    }
}

impl FromStr for NeedLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NeedLevel::ALL
            .iter()
            .find(|need| need.to_string().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown need level '{}'", s))
    }
}

/// One authored guided-meditation recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub tone_frequency_hz: f32,
    pub display_color: String,
    pub name: String,
    pub affirmation_native: String,
    pub affirmation_foreign: String,
    pub breathing_instruction: String,
    pub visualization_instruction: String,
    /// Advisory total length. The timer is phase-driven, not derived from this.
    pub total_duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Breathing,
    Affirmation,
    Silence,
    Outro,
}

impl Phase {
    /// The tone plays through breathing, affirmation and silence.
    pub fn is_audible(&self) -> bool {
        matches!(self, Phase::Breathing | Phase::Affirmation | Phase::Silence)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Intro => "intro",
            Phase::Breathing => "breathing",
            Phase::Affirmation => "affirmation",
            Phase::Silence => "silence",
            Phase::Outro => "outro",
        };
        write!(f, "{}", name)
    }
}

/// Observable session state published to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub phase: Phase,
    pub countdown_seconds: u32,
    pub affirmation_repeat_index: u32,
    pub is_running: bool,
    /// Cleared once the session has ended, returning the UI to selection.
    pub exercise: Option<Exercise>,
    pub started_at: std::time::SystemTime,
}
