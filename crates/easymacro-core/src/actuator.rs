//! Pointer injection capability
//!
//! The sequencer only talks to [`InputActuator`]. Platform adapters live in
//! [`crate::platform`]; [`RecordingActuator`] stands in for them in dry runs and tests.

use crate::action::ActionKind;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Moves the pointer and clicks. Called from the playback worker, so implementations must be
/// `Send + Sync`.
pub trait InputActuator: Send + Sync {
    /// Move to `(x, y)` and press+release the button implied by `kind`.
    /// `Pause` never reaches this call.
    fn inject(&self, kind: ActionKind, x: f64, y: f64) -> Result<()>;

    /// Current pointer location, if the platform can report it
    fn pointer_position(&self) -> Option<(f64, f64)> {
        None
    }

    /// Primary screen size in pixels, if the platform can report it
    fn screen_size(&self) -> Option<(f64, f64)> {
        None
    }
}

/// One call observed by [`RecordingActuator`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Injection {
    pub kind: ActionKind,
    pub x: f64,
    pub y: f64,
}

/// Records injections instead of touching the pointer.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    calls: Mutex<Vec<Injection>>,
    pointer: Option<(f64, f64)>,
    screen: Option<(f64, f64)>,
    fail_injections: bool,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a fixed pointer position
    pub fn pointer(mut self, x: f64, y: f64) -> Self {
        self.pointer = Some((x, y));
        self
    }

    /// Report a fixed screen size
    pub fn screen(mut self, width: f64, height: f64) -> Self {
        self.screen = Some((width, height));
        self
    }

    /// Record every call but report it as rejected
    pub fn failing(mut self) -> Self {
        self.fail_injections = true;
        self
    }

    pub fn calls(&self) -> Vec<Injection> {
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl InputActuator for RecordingActuator {
    fn inject(&self, kind: ActionKind, x: f64, y: f64) -> Result<()> {
        tracing::info!(kind = kind.label(), x, y, "dry-run click");
        self.calls.lock().push(Injection { kind, x, y });
        if self.fail_injections {
            return Err(Error::action_failed(kind.label(), "rejected by dry-run actuator"));
        }
        Ok(())
    }

    fn pointer_position(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    fn screen_size(&self) -> Option<(f64, f64)> {
        self.screen
    }
}

/// Actuator for the current platform
pub fn native_actuator() -> Result<Arc<dyn InputActuator>> {
    crate::platform::current::actuator()
}
