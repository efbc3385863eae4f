use anyhow::Result;
use log::{info, warn};
use mindful_sequencer::{
    start_session, ExerciseCatalog, SilentToneEngine, ToneEngine, AFFIRMATION_REPEATS,
};
use shared::{Config, EmotionalState, Exercise, NeedLevel, Phase, SessionSnapshot};
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

use crate::audio::CpalToneEngine;

pub struct PlayerApp {
    config: Config,
    catalog: ExerciseCatalog,
}

#[derive(Debug, PartialEq)]
enum PlayerCommand {
    Skip,
    Pause,
    Resume,
    Quit,
}

impl PlayerApp {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: ExerciseCatalog::new(),
        }
    }

    pub fn list_exercises(&self) {
        for entry in self.catalog.entries() {
            println!(
                "{:>8} × {:<19} {:>4} Hz  {}",
                entry.emotional_state.to_string(),
                entry.need_level.to_string(),
                entry.exercise.tone_frequency_hz,
                entry.exercise.name
            );
        }
    }

    /// Resolve the exercise key from flags, then config defaults, then the
    /// interactive selection screen.
    pub fn select_exercise(
        &self,
        emotion: Option<EmotionalState>,
        need: Option<NeedLevel>,
    ) -> Result<Exercise> {
        let state = match emotion.or(self.config.player.default_emotional_state) {
            Some(state) => state,
            None => prompt_emotional_state()?,
        };
        let need = match need.or(self.config.player.default_need_level) {
            Some(need) => need,
            None => prompt_need_level()?,
        };

        info!("Selected {} × {}", state, need);
        Ok(self.catalog.lookup(state, need).clone())
    }

    pub fn print_exercise_card(&self, exercise: &Exercise) {
        println!();
        println!("  🎵 {} Hz — {}", exercise.tone_frequency_hz, exercise.name);
        println!();
        println!("  📖 {}", exercise.affirmation_native);
        if self.config.player.show_foreign_affirmation {
            println!("     {}", exercise.affirmation_foreign);
        }
        println!("  🫁 {}", exercise.breathing_instruction);
        println!("  🎨 {}", exercise.visualization_instruction);
        println!("  ⏱  ~{} min", exercise.total_duration_minutes);
        println!();
    }

    pub async fn run(&self, exercise: Exercise, silent: bool) -> Result<()> {
        let tone = self.build_tone_engine(silent);

        println!("Press Enter to begin. Controls: [s]kip  [p]ause  [r]esume  [q]uit");
        let _ = read_line()?;

        let handle = start_session(exercise, tone);
        let mut snapshots = handle.subscribe();
        let mut commands = spawn_command_reader();
        let mut commands_open = true;
        let mut banner: Option<(Phase, u32)> = None;

        self.render(&handle.snapshot(), &mut banner);

        loop {
            tokio::select! {
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow().clone();
                    if snapshot.exercise.is_none() {
                        break;
                    }
                    self.render(&snapshot, &mut banner);
                }
                command = commands.recv(), if commands_open => {
                    match command {
                        Some(PlayerCommand::Skip) => handle.skip().await,
                        Some(PlayerCommand::Pause) => handle.pause().await,
                        Some(PlayerCommand::Resume) => handle.resume().await,
                        Some(PlayerCommand::Quit) => handle.stop().await,
                        // Stdin closed; let the session play out.
                        None => commands_open = false,
                    }
                }
            }
        }

        handle.wait().await;
        println!();
        println!("✨ Session ended.");
        Ok(())
    }

    fn build_tone_engine(&self, silent: bool) -> Box<dyn ToneEngine> {
        if silent || !self.config.audio.enabled {
            info!("Tone playback disabled");
            return Box::new(SilentToneEngine);
        }

        match CpalToneEngine::new(&self.config.audio) {
            Ok(engine) => Box::new(engine),
            Err(e) => {
                warn!("Audio unavailable, continuing without tone: {}", e);
                Box::new(SilentToneEngine)
            }
        }
    }

    fn render(&self, snapshot: &SessionSnapshot, banner: &mut Option<(Phase, u32)>) {
        let Some(exercise) = &snapshot.exercise else {
            return;
        };

        let key = (snapshot.phase, snapshot.affirmation_repeat_index);
        if *banner != Some(key) {
            *banner = Some(key);
            println!();
            match snapshot.phase {
                Phase::Intro => {}
                Phase::Breathing => {
                    println!("🫁 Breathing — {}", exercise.breathing_instruction);
                }
                Phase::Affirmation => {
                    println!(
                        "📖 Affirmation {}/{}",
                        snapshot.affirmation_repeat_index + 1,
                        AFFIRMATION_REPEATS
                    );
                    println!("   {}", exercise.affirmation_native);
                    if self.config.player.show_foreign_affirmation {
                        println!("   {}", exercise.affirmation_foreign);
                    }
                }
                Phase::Silence => {
                    println!("🧘 Silence — {}", exercise.visualization_instruction);
                }
                Phase::Outro => {
                    println!("✨ Closing");
                }
            }
        }

        if snapshot.is_running {
            print!("\r  {:>2} ", snapshot.countdown_seconds);
        } else {
            print!("\r  ⏸  ");
        }
        let _ = io::stdout().flush();
    }
}

fn spawn_command_reader() -> mpsc::Receiver<PlayerCommand> {
    let (tx, rx) = mpsc::channel(8);

    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(command) = parse_command(&line) else {
                continue;
            };
            if tx.blocking_send(command).is_err() {
                break;
            }
        }
    });

    rx
}

fn parse_command(line: &str) -> Option<PlayerCommand> {
    match line.trim().to_lowercase().as_str() {
        "s" | "skip" | "next" => Some(PlayerCommand::Skip),
        "p" | "pause" => Some(PlayerCommand::Pause),
        "r" | "resume" => Some(PlayerCommand::Resume),
        "q" | "quit" | "stop" => Some(PlayerCommand::Quit),
        "" => None,
        other => {
            warn!("Unknown command '{}'", other);
            None
        }
    }
}

fn prompt_emotional_state() -> Result<EmotionalState> {
    println!("How are you feeling right now?");
    for (i, state) in EmotionalState::ALL.iter().enumerate() {
        println!(
            "  {}. {} {} ({})",
            i + 1,
            state.emoji(),
            state,
            state.score()
        );
    }
    print!("Choose 1-{} [Fear]: ", EmotionalState::ALL.len());
    io::stdout().flush()?;

    let line = read_line()?;
    Ok(parse_choice(&line, &EmotionalState::ALL).unwrap_or(EmotionalState::Fear))
}

fn prompt_need_level() -> Result<NeedLevel> {
    println!("Which need feels unmet?");
    for (i, need) in NeedLevel::ALL.iter().enumerate() {
        println!("  {}. {} {}", i + 1, need.icon(), need.label());
    }
    print!("Choose 1-{} [safety]: ", NeedLevel::ALL.len());
    io::stdout().flush()?;

    let line = read_line()?;
    Ok(parse_choice(&line, &NeedLevel::ALL).unwrap_or(NeedLevel::Safety))
}

/// Accept a menu number or a name; anything else falls back to the
/// caller's default, matching the forgiving catalog lookup.
fn parse_choice<T>(line: &str, options: &[T]) -> Option<T>
where
    T: Copy + std::str::FromStr,
{
    let trimmed = line.trim();
    if let Ok(index) = trimmed.parse::<usize>() {
        if (1..=options.len()).contains(&index) {
            return Some(options[index - 1]);
        }
    }
    trimmed.parse().ok()
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
