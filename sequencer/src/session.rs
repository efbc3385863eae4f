use log::{debug, info, warn};
use shared::{Exercise, Phase, SessionSnapshot};
use std::time::SystemTime;
use uuid::Uuid;

use crate::tone::ToneEngine;

// Phase durations are fixed; the exercise's advisory duration does not
// drive the timer.
pub const BREATHING_SECONDS: u32 = 5;
pub const AFFIRMATION_SECONDS: u32 = 4;
pub const AFFIRMATION_REPEATS: u32 = 5;
pub const SILENCE_SECONDS: u32 = 20;
pub const OUTRO_SECONDS: u32 = 3;

/// One guided-meditation run: the phase state machine plus the tone it
/// keeps in sync.
///
/// A session starts in the intro pseudostate with no timer running.
/// `start` enters breathing and begins the tone; from there the phases
/// advance forward-only (breathing, affirmation × 5, silence, outro)
/// under `tick` or `skip`, both of which share one transition function.
pub struct Session {
    id: Uuid,
    exercise: Exercise,
    phase: Phase,
    countdown_seconds: u32,
    affirmation_repeat_index: u32,
    is_running: bool,
    finished: bool,
    started_at: SystemTime,
    tone: Box<dyn ToneEngine>,
}

impl Session {
    pub fn new(exercise: Exercise, tone: Box<dyn ToneEngine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise,
            phase: Phase::Intro,
            countdown_seconds: 0,
            affirmation_repeat_index: 0,
            is_running: false,
            finished: false,
            started_at: SystemTime::now(),
            tone,
        }
    }

    /// Leave the intro pseudostate: enter breathing and start the tone.
    /// No-op once the session is underway or over.
    pub fn start(&mut self) {
        if self.phase != Phase::Intro || self.finished {
            debug!("Ignoring start in phase {}", self.phase);
            return;
        }

        info!(
            "Session {} started: {} at {} Hz",
            self.id, self.exercise.name, self.exercise.tone_frequency_hz
        );
        self.phase = Phase::Breathing;
        self.countdown_seconds = BREATHING_SECONDS;
        self.is_running = true;
        self.started_at = SystemTime::now();
        self.start_tone();
    }

    /// One second of timer progress. A countdown at 1 or 0 transitions
    /// instead of decrementing, so each N-second phase consumes exactly
    /// N ticks and the countdown never goes negative.
    pub fn tick(&mut self) {
        if !self.is_running {
            return;
        }

        if self.countdown_seconds <= 1 {
            self.advance();
        } else {
            self.countdown_seconds -= 1;
        }
    }

    /// User fast-forward. Same transition as countdown expiry.
    pub fn skip(&mut self) {
        if self.finished {
            return;
        }
        debug!("Skip requested in phase {}", self.phase);
        self.advance();
    }

    /// Halt the timer and the tone, preserving phase, countdown and
    /// affirmation index for `resume`.
    pub fn pause(&mut self) {
        if !self.is_running {
            return;
        }
        info!("Session {} paused in {}", self.id, self.phase);
        self.is_running = false;
        self.stop_tone();
    }

    /// Continue from the frozen countdown. The tone returns only in an
    /// audible phase.
    pub fn resume(&mut self) {
        if self.is_running || self.finished || self.phase == Phase::Intro {
            return;
        }
        info!("Session {} resumed in {}", self.id, self.phase);
        self.is_running = true;
        if self.phase.is_audible() {
            self.start_tone();
        }
    }

    /// Abandon the session: timer off, tone off, no further transitions.
    pub fn stop(&mut self) {
        if self.finished {
            return;
        }
        info!("Session {} stopped in {}", self.id, self.phase);
        self.is_running = false;
        self.finished = true;
        self.stop_tone();
    }

    /// The single authoritative transition, shared by timer expiry and
    /// skip so the two can never diverge.
    fn advance(&mut self) {
        match self.phase {
            // The only exit from intro is an explicit start.
            Phase::Intro => {}
            Phase::Breathing => {
                self.phase = Phase::Affirmation;
                self.affirmation_repeat_index = 0;
                self.countdown_seconds = AFFIRMATION_SECONDS;
            }
            Phase::Affirmation => {
                if self.affirmation_repeat_index + 1 < AFFIRMATION_REPEATS {
                    self.affirmation_repeat_index += 1;
                    self.countdown_seconds = AFFIRMATION_SECONDS;
                } else {
                    self.phase = Phase::Silence;
                    self.countdown_seconds = SILENCE_SECONDS;
                }
            }
            Phase::Silence => {
                self.phase = Phase::Outro;
                self.countdown_seconds = OUTRO_SECONDS;
                self.stop_tone();
            }
            Phase::Outro => {
                info!("Session {} complete", self.id);
                self.is_running = false;
                self.finished = true;
                self.countdown_seconds = 0;
                self.stop_tone();
            }
        }
    }

    // Tone playback is best-effort: failures are logged, never surfaced,
    // and the countdown experience continues without sound.
    fn start_tone(&mut self) {
        if let Err(e) = self.tone.start(self.exercise.tone_frequency_hz) {
            warn!("Tone playback unavailable: {}", e);
        }
    }

    fn stop_tone(&mut self) {
        if let Err(e) = self.tone.stop() {
            warn!("Failed to stop tone: {}", e);
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            phase: self.phase,
            countdown_seconds: self.countdown_seconds,
            affirmation_repeat_index: self.affirmation_repeat_index,
            is_running: self.is_running,
            exercise: if self.finished {
                None
            } else {
                Some(self.exercise.clone())
            },
            started_at: self.started_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    pub fn affirmation_repeat_index(&self) -> u32 {
        self.affirmation_repeat_index
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ExerciseCatalog;
    use shared::{EmotionalState, NeedLevel};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeToneState {
        started: bool,
        start_count: u32,
        stop_count: u32,
        last_frequency: Option<f32>,
    }

    #[derive(Clone, Default)]
    struct FakeTone {
        state: Arc<Mutex<FakeToneState>>,
    }

    impl FakeTone {
        fn is_started(&self) -> bool {
            self.state.lock().unwrap().started
        }

        fn last_frequency(&self) -> Option<f32> {
            self.state.lock().unwrap().last_frequency
        }
    }

    impl ToneEngine for FakeTone {
        fn start(&mut self, frequency_hz: f32) -> anyhow::Result<()> {
            let mut state = self.state.lock().unwrap();
            state.started = true;
            state.start_count += 1;
            state.last_frequency = Some(frequency_hz);
            Ok(())
        }

        fn stop(&mut self) -> anyhow::Result<()> {
            let mut state = self.state.lock().unwrap();
            state.started = false;
            state.stop_count += 1;
            Ok(())
        }
    }

    fn test_session() -> (Session, FakeTone) {
        let tone = FakeTone::default();
        let catalog = ExerciseCatalog::new();
        let exercise = catalog
            .lookup(EmotionalState::Fear, NeedLevel::Safety)
            .clone();
        (Session::new(exercise, Box::new(tone.clone())), tone)
    }

    #[test]
    fn intro_is_inert_until_start() {
        let (mut session, tone) = test_session();
        assert_eq!(session.phase(), Phase::Intro);
        assert!(!session.is_running());

        session.tick();
        session.skip();
        assert_eq!(session.phase(), Phase::Intro);
        assert!(!tone.is_started());

        session.start();
        assert_eq!(session.phase(), Phase::Breathing);
        assert_eq!(session.countdown_seconds(), BREATHING_SECONDS);
        assert!(session.is_running());
        assert!(tone.is_started());
        assert_eq!(tone.last_frequency(), Some(396.0));
    }

    #[test]
    fn untouched_run_visits_phases_in_order_over_48_ticks() {
        let (mut session, _tone) = test_session();
        session.start();

        let mut visited = vec![session.phase()];
        let mut ticks = 0;
        while !session.is_finished() {
            session.tick();
            ticks += 1;
            if visited.last() != Some(&session.phase()) {
                visited.push(session.phase());
            }
            assert!(ticks <= 48, "session ran past 48 ticks");
        }

        assert_eq!(ticks, 48);
        assert_eq!(
            visited,
            vec![
                Phase::Breathing,
                Phase::Affirmation,
                Phase::Silence,
                Phase::Outro
            ]
        );
    }

    #[test]
    fn affirmation_repeats_exactly_five_times() {
        let (mut session, _tone) = test_session();
        session.start();
        session.skip(); // breathing -> affirmation

        let mut seen = Vec::new();
        while session.phase() == Phase::Affirmation {
            assert!(session.affirmation_repeat_index() <= 4);
            seen.push(session.affirmation_repeat_index());
            for _ in 0..AFFIRMATION_SECONDS {
                session.tick();
            }
        }

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(session.phase(), Phase::Silence);
    }

    #[test]
    fn five_skips_from_breathing_land_on_last_affirmation() {
        let (mut session, _tone) = test_session();
        session.start();

        for _ in 0..5 {
            session.skip();
        }
        assert_eq!(session.phase(), Phase::Affirmation);
        assert_eq!(session.affirmation_repeat_index(), 4);

        session.skip();
        assert_eq!(session.phase(), Phase::Silence);
        assert_eq!(session.countdown_seconds(), SILENCE_SECONDS);
    }

    #[test]
    fn countdown_transitions_instead_of_going_negative() {
        let (mut session, _tone) = test_session();
        session.start();

        for _ in 0..(BREATHING_SECONDS - 1) {
            session.tick();
        }
        assert_eq!(session.phase(), Phase::Breathing);
        assert_eq!(session.countdown_seconds(), 1);

        session.tick();
        assert_eq!(session.phase(), Phase::Affirmation);
        assert_eq!(session.countdown_seconds(), AFFIRMATION_SECONDS);
    }

    #[test]
    fn tone_is_audible_exactly_through_breathing_affirmation_silence() {
        let (mut session, tone) = test_session();
        session.start();

        while !session.is_finished() {
            let expect_tone = session.phase().is_audible() && session.is_running();
            assert_eq!(tone.is_started(), expect_tone, "in {}", session.phase());
            session.tick();
        }
        assert!(!tone.is_started());
    }

    #[test]
    fn tone_stops_on_entering_outro() {
        let (mut session, tone) = test_session();
        session.start();
        session.skip(); // -> affirmation
        for _ in 0..5 {
            session.skip(); // through affirmations -> silence
        }
        assert!(tone.is_started());

        session.skip(); // -> outro
        assert_eq!(session.phase(), Phase::Outro);
        assert!(!tone.is_started());

        session.skip(); // -> end
        assert!(session.is_finished());
        assert!(!session.is_running());
        assert!(session.snapshot().exercise.is_none());
    }

    #[test]
    fn pause_freezes_state_and_silences_tone() {
        let (mut session, tone) = test_session();
        session.start();
        session.tick();
        session.tick();
        let frozen = session.countdown_seconds();

        session.pause();
        assert!(!session.is_running());
        assert!(!tone.is_started());
        assert_eq!(session.phase(), Phase::Breathing);
        assert_eq!(session.countdown_seconds(), frozen);

        // Paused ticks must not mutate anything.
        session.tick();
        session.tick();
        assert_eq!(session.countdown_seconds(), frozen);
    }

    #[test]
    fn resume_continues_frozen_countdown_and_restarts_tone() {
        let (mut session, tone) = test_session();
        session.start();
        session.tick();
        let frozen = session.countdown_seconds();
        session.pause();

        session.resume();
        assert!(session.is_running());
        assert_eq!(session.countdown_seconds(), frozen);
        assert!(tone.is_started());
    }

    #[test]
    fn resume_in_outro_leaves_tone_silent() {
        let (mut session, tone) = test_session();
        session.start();
        for _ in 0..7 {
            session.skip(); // breathing + 5 affirmations + silence -> outro
        }
        assert_eq!(session.phase(), Phase::Outro);

        session.pause();
        session.resume();
        assert!(session.is_running());
        assert!(!tone.is_started());
    }

    #[test]
    fn skip_while_paused_advances_without_tone() {
        let (mut session, tone) = test_session();
        session.start();
        session.pause();

        session.skip();
        assert_eq!(session.phase(), Phase::Affirmation);
        assert!(!tone.is_started());

        session.resume();
        assert!(tone.is_started());
    }

    #[test]
    fn stop_ends_session_from_any_phase() {
        let (mut session, tone) = test_session();
        session.start();
        session.skip();
        session.stop();

        assert!(session.is_finished());
        assert!(!session.is_running());
        assert!(!tone.is_started());

        // Further controls are no-ops.
        session.skip();
        session.resume();
        session.tick();
        assert!(session.is_finished());
    }
}
