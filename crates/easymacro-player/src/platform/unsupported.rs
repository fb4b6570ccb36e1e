//! Platforms without a global hotkey backend yet

use crate::interrupt::{HotkeyBackend, HotkeyCallback, HotkeyCombo, WindowHandle};
use easymacro_core::{Error, Result};

/// Refuses every binding
#[derive(Debug, Default)]
pub struct NativeHotkeys;

impl NativeHotkeys {
    pub fn new() -> Self {
        Self
    }
}

impl HotkeyBackend for NativeHotkeys {
    fn install(
        &mut self,
        _window: WindowHandle,
        _combo: &HotkeyCombo,
        _callback: HotkeyCallback,
    ) -> Result<()> {
        Err(Error::not_implemented("Global hotkeys")
            .with_suggestions(vec!["Stop playback with Ctrl+C instead".to_string()]))
    }

    fn uninstall(&mut self) {}
}

/// Never opens; there is no message stream to pump here
#[derive(Debug)]
pub struct HostWindow {
    _private: (),
}

impl HostWindow {
    pub fn open() -> Option<Self> {
        None
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle::NONE
    }

    pub fn pump(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::InterruptBridge;

    #[test]
    fn registration_reports_failure() {
        let mut bridge = InterruptBridge::new(NativeHotkeys::new());
        assert!(!bridge.register(WindowHandle(1), HotkeyCombo::default(), || {}));
        assert!(!bridge.is_registered());
        assert!(HostWindow::open().is_none());
    }
}
