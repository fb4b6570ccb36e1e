//! Linux platform implementation
//!
//! No pointer injection yet. XTest or uinput would slot in here behind `InputActuator`;
//! until then `em play --dry-run` is the way to exercise a macro on Linux.

use crate::actuator::InputActuator;
use crate::{Error, Result};
use std::sync::Arc;

pub fn actuator() -> Result<Arc<dyn InputActuator>> {
    Err(Error::not_implemented("Pointer injection").with_suggestions(vec![
        "Run with --dry-run to walk through the macro without clicking".to_string(),
    ]))
}
