//! Global hotkeys via RegisterHotKey
//!
//! The target window is subclassed so `WM_HOTKEY` reaches our callback without the owner's
//! window procedure having to know about it.

use std::cell::RefCell;
use std::ffi::c_void;

use windows::core::w;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_NOREPEAT,
};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DestroyWindow, DispatchMessageW, PeekMessageW, TranslateMessage, HMENU,
    HWND_MESSAGE, MSG, PM_REMOVE, WINDOW_EX_STYLE, WINDOW_STYLE, WM_HOTKEY,
};

use crate::interrupt::{HotkeyBackend, HotkeyCallback, HotkeyCombo, WindowHandle};
use easymacro_core::{Error, Result};

const DEFAULT_HOTKEY_ID: i32 = 1;
const SUBCLASS_ID: usize = 1;

/// Passed to the subclass procedure as its reference data
struct SubclassState {
    id: i32,
    callback: RefCell<HotkeyCallback>,
}

struct Installed {
    hwnd: HWND,
    state: *mut SubclassState,
}

pub struct Win32Hotkeys {
    id: i32,
    installed: Option<Installed>,
}

impl Default for Win32Hotkeys {
    fn default() -> Self {
        Self::new()
    }
}

impl Win32Hotkeys {
    pub fn new() -> Self {
        Self {
            id: DEFAULT_HOTKEY_ID,
            installed: None,
        }
    }
}

impl HotkeyBackend for Win32Hotkeys {
    fn install(
        &mut self,
        window: WindowHandle,
        combo: &HotkeyCombo,
        callback: HotkeyCallback,
    ) -> Result<()> {
        self.uninstall();

        let hwnd = HWND(window.0 as *mut c_void);
        let state = Box::into_raw(Box::new(SubclassState {
            id: self.id,
            callback: RefCell::new(callback),
        }));

        let hooked =
            unsafe { SetWindowSubclass(hwnd, Some(hotkey_subclass_proc), SUBCLASS_ID, state as usize) };
        if !hooked.as_bool() {
            drop(unsafe { Box::from_raw(state) });
            return Err(Error::registration_failed(
                &combo.to_string(),
                "could not hook the window's messages",
            ));
        }

        let modifiers = HOT_KEY_MODIFIERS(u32::from(combo.modifiers.bits())) | MOD_NOREPEAT;
        if let Err(e) = unsafe { RegisterHotKey(hwnd, self.id, modifiers, combo.key.virtual_key()) } {
            unsafe {
                let _ = RemoveWindowSubclass(hwnd, Some(hotkey_subclass_proc), SUBCLASS_ID);
                drop(Box::from_raw(state));
            }
            return Err(Error::registration_failed(&combo.to_string(), &format!("{:?}", e)));
        }

        self.installed = Some(Installed { hwnd, state });
        Ok(())
    }

    fn uninstall(&mut self) {
        let Some(Installed { hwnd, state }) = self.installed.take() else {
            return;
        };
        unsafe {
            let _ = UnregisterHotKey(hwnd, self.id);
            let _ = RemoveWindowSubclass(hwnd, Some(hotkey_subclass_proc), SUBCLASS_ID);
            drop(Box::from_raw(state));
        }
    }
}

impl Drop for Win32Hotkeys {
    fn drop(&mut self) {
        self.uninstall();
    }
}

unsafe extern "system" fn hotkey_subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _subclass_id: usize,
    ref_data: usize,
) -> LRESULT {
    if msg == WM_HOTKEY && ref_data != 0 {
        let state = &*(ref_data as *const SubclassState);
        if wparam.0 == state.id as usize {
            // Re-entrant presses are dropped
            if let Ok(mut callback) = state.callback.try_borrow_mut() {
                (*callback)();
            }
            return LRESULT(0);
        }
    }
    DefSubclassProc(hwnd, msg, wparam, lparam)
}

/// Hidden message-only window for callers without a window of their own
pub struct HostWindow {
    hwnd: HWND,
}

impl HostWindow {
    pub fn open() -> Option<Self> {
        unsafe {
            let module = GetModuleHandleW(None).ok()?;
            let hwnd = CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                w!("STATIC"),
                w!("easymacro"),
                WINDOW_STYLE::default(),
                0,
                0,
                0,
                0,
                HWND_MESSAGE,
                HMENU::default(),
                HINSTANCE(module.0),
                None,
            )
            .ok()?;
            Some(Self { hwnd })
        }
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle(self.hwnd.0 as isize)
    }

    /// Dispatch whatever is queued for this thread without blocking. Returns the message count.
    pub fn pump(&self) -> usize {
        let mut msg = MSG::default();
        let mut dispatched = 0;
        unsafe {
            while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
                dispatched += 1;
            }
        }
        dispatched
    }
}

impl Drop for HostWindow {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
