//! Windows platform implementation

mod hotkey;

pub use hotkey::{HostWindow, Win32Hotkeys as NativeHotkeys};
