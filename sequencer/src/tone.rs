use anyhow::Result;

/// Continuous tone playback for the audible phases of a session.
///
/// One engine instance belongs to one session and is dropped with it.
/// The state machine depends only on `start`/`stop`; playback is
/// best-effort and a failing backend must never stall a session.
pub trait ToneEngine: Send {
    /// Begin playback at the given frequency. A tone that is already
    /// playing is replaced, never layered.
    fn start(&mut self, frequency_hz: f32) -> Result<()>;

    /// Silence playback. Calling this while already silent is a no-op.
    fn stop(&mut self) -> Result<()>;
}

/// Backend used when audio is disabled or unavailable.
pub struct SilentToneEngine;

impl ToneEngine for SilentToneEngine {
    fn start(&mut self, _frequency_hz: f32) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}
