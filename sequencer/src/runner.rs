use log::debug;
use shared::{Exercise, SessionSnapshot};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::session::Session;
use crate::tone::ToneEngine;

#[derive(Debug)]
enum SessionCommand {
    Skip,
    Pause,
    Resume,
    Stop,
}

/// Handle to a running session task.
///
/// Controls are fire-and-forget: once the session has ended they land on
/// a closed channel and are dropped, mirroring the total transitions of
/// the state machine. Dropping the handle stops the session, so the
/// timer and the tone are released on every exit path.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn skip(&self) {
        let _ = self.commands.send(SessionCommand::Skip).await;
    }

    pub async fn pause(&self) {
        let _ = self.commands.send(SessionCommand::Pause).await;
    }

    pub async fn resume(&self) {
        let _ = self.commands.send(SessionCommand::Resume).await;
    }

    pub async fn stop(&self) {
        let _ = self.commands.send(SessionCommand::Stop).await;
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that yields a change notification for every tick and
    /// every control action.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait for the session task to finish.
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// Spawn a session on the current tokio runtime. The intro pseudostate
/// is exited immediately: calling this is the user's explicit start.
pub fn start_session(exercise: Exercise, tone: Box<dyn ToneEngine>) -> SessionHandle {
    let mut session = Session::new(exercise, tone);
    session.start();

    let (command_tx, command_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
    let task = tokio::spawn(run_session(session, command_rx, snapshot_tx));

    SessionHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        task,
    }
}

async fn run_session(
    mut session: Session,
    mut commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<SessionSnapshot>,
) {
    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !session.is_finished() {
        // The tick branch is disabled while paused, so no stale tick can
        // fire between pause and resume; resume resets the cadence so the
        // first resumed tick lands a full second later.
        tokio::select! {
            _ = ticker.tick(), if session.is_running() => {
                session.tick();
            }
            command = commands.recv() => {
                match command {
                    Some(SessionCommand::Skip) => session.skip(),
                    Some(SessionCommand::Pause) => session.pause(),
                    Some(SessionCommand::Resume) => {
                        session.resume();
                        ticker.reset();
                    }
                    // Channel closed means the handle is gone.
                    Some(SessionCommand::Stop) | None => session.stop(),
                }
            }
        }
        let _ = snapshots.send(session.snapshot());
    }

    debug!("Session {} task exiting", session.id());
}
