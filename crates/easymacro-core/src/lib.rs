//! easymacro-core - Timed click macros
//!
//! The building blocks every other easymacro crate shares:
//!
//! - [`action`]: steps ([`Action`]) and the ordered [`ActionList`]
//! - [`codec`]: the `.emacro` JSON interchange format
//! - [`actuator`]: the [`InputActuator`] capability that performs clicks
//!
//! ## Platform Support
//!
//! - **Windows**: SetCursorPos + SendInput
//! - **macOS**: CoreGraphics events
//! - **Linux**: Coming soon (dry runs only)

pub mod action;
pub mod actuator;
pub mod codec;
pub mod error;
pub mod platform;

pub use action::{format_delay, Action, ActionId, ActionKind, ActionList, MouseButton};
pub use actuator::{native_actuator, InputActuator, Injection, RecordingActuator};
pub use codec::{decode, encode, FILE_EXTENSION};
pub use error::{Error, ErrorCode, Result};

pub mod prelude {
    pub use crate::action::{Action, ActionId, ActionKind, ActionList};
    pub use crate::actuator::{native_actuator, InputActuator, RecordingActuator};
    pub use crate::codec::{decode, encode};
    pub use crate::error::{Error, ErrorCode, Result};
}
