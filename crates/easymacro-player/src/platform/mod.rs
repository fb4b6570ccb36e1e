//! Native hotkey delivery
//!
//! Each platform exposes `NativeHotkeys` (a [`crate::HotkeyBackend`]) and `HostWindow`, a
//! window whose message stream carries hotkey presses for callers that have no window of their own.

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(target_os = "windows"))]
pub mod unsupported;

#[cfg(target_os = "windows")]
pub use windows as current;

#[cfg(not(target_os = "windows"))]
pub use unsupported as current;

pub use current::{HostWindow, NativeHotkeys};
