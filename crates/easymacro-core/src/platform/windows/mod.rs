//! Windows platform implementation
//!
//! Pointer injection through `SetCursorPos` + `SendInput`.

mod input;

pub use input::*;

use crate::actuator::InputActuator;
use crate::Result;
use std::sync::Arc;

pub fn actuator() -> Result<Arc<dyn InputActuator>> {
    Ok(Arc::new(SendInputActuator::new()))
}
