//! Cancellable macro playback
//!
//! [`Sequencer::start`] copies the step list and hands the copy to a detached worker thread.
//! The worker and its owner share exactly two things: the session's cancellation flag and a
//! channel that carries one [`PlaybackReport`] back when the worker exits. The owner observes
//! that report with [`Sequencer::poll`] (or [`Sequencer::wait`]) on its own thread, and only then
//! does the sequencer return to [`PlaybackState::Idle`].
//!
//! Cancellation is checked before every step and again right after a step's delay, so a stop
//! requested during a delay keeps that step from firing. The delay itself is a plain sleep: the
//! worst case between `stop()` and the worker noticing is one step's delay.

use crossbeam_channel::{unbounded, Receiver, Sender};
use easymacro_core::{Action, InputActuator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    /// Stop requested, worker still unwinding
    Stopping,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    Completed,
    Cancelled,
}

/// Sent once by the worker when a session ends
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackReport {
    pub end: PlaybackEnd,
    pub looping: bool,
    /// Full passes through the snapshot
    pub passes: u64,
    pub clicks: usize,
    /// Clicks the actuator rejected; playback carried on past them
    pub failed_clicks: usize,
    pub elapsed: Duration,
}

impl PlaybackReport {
    pub fn was_cancelled(&self) -> bool {
        self.end == PlaybackEnd::Cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Empty list, nothing was spawned
    NothingToPlay,
    /// A session is running or still stopping
    AlreadyPlaying,
    /// The worker thread could not be created
    SpawnFailed,
}

/// Everything a worker owns for one run
struct PlaybackSession {
    snapshot: Vec<Action>,
    looping: bool,
    cancel: Arc<AtomicBool>,
}

impl PlaybackSession {
    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

pub struct Sequencer {
    actuator: Arc<dyn InputActuator>,
    state: PlaybackState,
    cancel: Option<Arc<AtomicBool>>,
    done_tx: Sender<PlaybackReport>,
    done_rx: Receiver<PlaybackReport>,
}

impl Sequencer {
    pub fn new(actuator: Arc<dyn InputActuator>) -> Self {
        let (done_tx, done_rx) = unbounded();
        Self {
            actuator,
            state: PlaybackState::Idle,
            cancel: None,
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// True while a session occupies playback, including while it is stopping
    pub fn is_running(&self) -> bool {
        self.state != PlaybackState::Idle
    }

    /// Begin playing a copy of `actions`. Never blocks.
    pub fn start(&mut self, actions: &[Action], looping: bool) -> StartOutcome {
        if self.is_running() {
            debug!(state = ?self.state, "start ignored, session still active");
            return StartOutcome::AlreadyPlaying;
        }
        if actions.is_empty() {
            return StartOutcome::NothingToPlay;
        }

        // Fresh flag per session, created before the worker exists
        let cancel = Arc::new(AtomicBool::new(false));
        let session = PlaybackSession {
            snapshot: actions.to_vec(),
            looping,
            cancel: cancel.clone(),
        };
        let actuator = self.actuator.clone();
        let done = self.done_tx.clone();

        let spawned = thread::Builder::new()
            .name("easymacro-playback".to_string())
            .spawn(move || {
                let report = run_session(&session, actuator.as_ref());
                // Owner may be gone already; nothing left to tell then
                let _ = done.send(report);
            });

        match spawned {
            Ok(_detached) => {
                info!(steps = actions.len(), looping, "playback started");
                self.cancel = Some(cancel);
                self.state = PlaybackState::Running;
                StartOutcome::Started
            }
            Err(e) => {
                error!("failed to spawn playback worker: {}", e);
                StartOutcome::SpawnFailed
            }
        }
    }

    /// Ask the running session to stop. Returns true if this call raised the flag.
    pub fn stop(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        if let Some(cancel) = &self.cancel {
            cancel.store(true, Ordering::SeqCst);
        }
        self.state = PlaybackState::Stopping;
        info!("playback stop requested");
        true
    }

    /// Collect the worker's report if it has finished. Call from the owning thread.
    pub fn poll(&mut self) -> Option<PlaybackReport> {
        let report = self.done_rx.try_recv().ok()?;
        self.finish(&report);
        Some(report)
    }

    /// Block up to `timeout` for the worker's report
    pub fn wait(&mut self, timeout: Duration) -> Option<PlaybackReport> {
        if !self.is_running() {
            return None;
        }
        let report = self.done_rx.recv_timeout(timeout).ok()?;
        self.finish(&report);
        Some(report)
    }

    fn finish(&mut self, report: &PlaybackReport) {
        self.state = PlaybackState::Idle;
        self.cancel = None;
        info!(
            end = ?report.end,
            passes = report.passes,
            clicks = report.clicks,
            failed = report.failed_clicks,
            "playback ended"
        );
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        // Detached workers would otherwise keep clicking after their owner is gone
        if let Some(cancel) = &self.cancel {
            cancel.store(true, Ordering::SeqCst);
        }
    }
}

fn run_session(session: &PlaybackSession, actuator: &dyn InputActuator) -> PlaybackReport {
    let started = Instant::now();
    let mut passes = 0u64;
    let mut clicks = 0usize;
    let mut failed_clicks = 0usize;

    'session: loop {
        for (i, action) in session.snapshot.iter().enumerate() {
            if session.cancelled() {
                break 'session;
            }
            if let Some(wait) = action.wait() {
                thread::sleep(wait);
                if session.cancelled() {
                    break 'session;
                }
            }
            if action.kind.is_pause() {
                continue;
            }

            debug!(step = i + 1, kind = action.kind.label(), x = action.x, y = action.y, "click");
            match actuator.inject(action.kind, action.x, action.y) {
                Ok(()) => clicks += 1,
                Err(e) => {
                    failed_clicks += 1;
                    warn!(step = i + 1, "click failed, continuing: {}", e);
                }
            }
        }
        passes += 1;

        if !session.looping || session.cancelled() {
            break;
        }
    }

    PlaybackReport {
        end: if session.cancelled() {
            PlaybackEnd::Cancelled
        } else {
            PlaybackEnd::Completed
        },
        looping: session.looping,
        passes,
        clicks,
        failed_clicks,
        elapsed: started.elapsed(),
    }
}
