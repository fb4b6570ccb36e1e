//! Panic hotkey
//!
//! [`InterruptBridge`] owns at most one global hotkey registration. Delivery goes through a
//! [`HotkeyBackend`]: the backend binds the combo to a window and invokes the callback from that
//! window's message stream, which is the control surface's thread.

use easymacro_core::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Raw native window handle. Zero is never a valid window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NONE: WindowHandle = WindowHandle(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Modifier bits, laid out like the Win32 `MOD_*` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const ALT: Modifiers = Modifiers(0x1);
    pub const CTRL: Modifiers = Modifiers(0x2);
    pub const SHIFT: Modifiers = Modifiers(0x4);
    pub const SUPER: Modifiers = Modifiers(0x8);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `A`-`Z` or `0`-`9`, stored uppercase
    Char(char),
    /// `F1`-`F24`
    F(u8),
}

impl Key {
    /// Win32 virtual-key code
    pub fn virtual_key(self) -> u32 {
        match self {
            Key::Char(c) => c as u32,
            Key::F(n) => 0x70 + u32::from(n) - 1,
        }
    }

    fn parse(token: &str) -> Option<Key> {
        let upper = token.to_ascii_uppercase();
        let mut chars = upper.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => return Some(Key::Char(c)),
            _ => {}
        }
        let n: u8 = upper.strip_prefix('F')?.parse().ok()?;
        (1..=24).contains(&n).then_some(Key::F(n))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_lowercase()),
            Key::F(n) => write!(f, "f{}", n),
        }
    }
}

/// Modifier set plus one key, written `ctrl+alt+shift+p`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyCombo {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl HotkeyCombo {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }
}

impl Default for HotkeyCombo {
    fn default() -> Self {
        Self::new(
            Modifiers::CTRL | Modifiers::ALT | Modifiers::SHIFT,
            Key::Char('P'),
        )
    }
}

impl FromStr for HotkeyCombo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |why: &str| {
            Error::validation(format!("Invalid hotkey '{}': {}", s, why))
                .with_suggestions(vec!["Use a form like ctrl+alt+shift+p or ctrl+f9".to_string()])
        };

        let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
        let Some((key_token, modifier_tokens)) = tokens.split_last() else {
            return Err(invalid("empty"));
        };

        let mut modifiers = Modifiers::NONE;
        for token in modifier_tokens {
            modifiers = modifiers
                | match token.to_ascii_lowercase().as_str() {
                    "ctrl" | "control" => Modifiers::CTRL,
                    "alt" => Modifiers::ALT,
                    "shift" => Modifiers::SHIFT,
                    "super" | "win" | "cmd" => Modifiers::SUPER,
                    other => return Err(invalid(&format!("unknown modifier '{}'", other))),
                };
        }
        if modifiers.is_empty() {
            return Err(invalid("at least one modifier is required"));
        }

        let key = Key::parse(key_token).ok_or_else(|| invalid("unknown key"))?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for HotkeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::ALT, "alt"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::SUPER, "super"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

pub type HotkeyCallback = Box<dyn FnMut()>;

/// Binds a combo to a window and calls back from that window's message stream.
///
/// `install` must leave nothing behind when it fails. The bridge calls `uninstall` before any new
/// `install`, and only after a successful one.
pub trait HotkeyBackend {
    fn install(&mut self, window: WindowHandle, combo: &HotkeyCombo, callback: HotkeyCallback)
        -> Result<()>;

    fn uninstall(&mut self);
}

pub struct InterruptBridge<B: HotkeyBackend> {
    backend: B,
    active: Option<HotkeyCombo>,
    last_error: Option<Error>,
}

impl<B: HotkeyBackend> InterruptBridge<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
            last_error: None,
        }
    }

    /// Replace any current registration. False means nothing is registered afterwards.
    pub fn register<F>(&mut self, window: WindowHandle, combo: HotkeyCombo, callback: F) -> bool
    where
        F: FnMut() + 'static,
    {
        self.unregister();
        self.last_error = None;

        if !window.is_valid() {
            warn!(hotkey = %combo, "no window to bind the hotkey to");
            self.last_error = Some(Error::registration_failed(
                &combo.to_string(),
                "invalid window handle",
            ));
            return false;
        }

        match self.backend.install(window, &combo, Box::new(callback)) {
            Ok(()) => {
                info!(hotkey = %combo, "panic hotkey registered");
                self.active = Some(combo);
                true
            }
            Err(e) => {
                warn!(hotkey = %combo, "hotkey registration failed: {}", e);
                self.last_error = Some(e);
                false
            }
        }
    }

    pub fn unregister(&mut self) {
        if let Some(combo) = self.active.take() {
            self.backend.uninstall();
            debug!(hotkey = %combo, "panic hotkey released");
        }
    }

    pub fn is_registered(&self) -> bool {
        self.active.is_some()
    }

    pub fn combo(&self) -> Option<&HotkeyCombo> {
        self.active.as_ref()
    }

    /// Why the last `register` returned false
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: HotkeyBackend> Drop for InterruptBridge<B> {
    fn drop(&mut self) {
        self.unregister();
    }
}

/// In-process backend: presses come from [`ScriptedHotkeys::press`] instead of the OS.
#[derive(Default)]
pub struct ScriptedHotkeys {
    binding: Option<(WindowHandle, HotkeyCombo)>,
    callback: Rc<RefCell<Option<HotkeyCallback>>>,
    refuse: bool,
    installs: usize,
    uninstalls: usize,
}

impl ScriptedHotkeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every binding, as the OS does when the combo is taken
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Deliver one press. Returns false if nothing is bound or a press is already being handled.
    pub fn press(&self) -> bool {
        let Ok(mut slot) = self.callback.try_borrow_mut() else {
            return false;
        };
        match slot.as_mut() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn binding(&self) -> Option<(WindowHandle, HotkeyCombo)> {
        self.binding
    }

    pub fn installs(&self) -> usize {
        self.installs
    }

    pub fn uninstalls(&self) -> usize {
        self.uninstalls
    }
}

impl HotkeyBackend for ScriptedHotkeys {
    fn install(
        &mut self,
        window: WindowHandle,
        combo: &HotkeyCombo,
        callback: HotkeyCallback,
    ) -> Result<()> {
        if self.refuse {
            return Err(Error::registration_failed(
                &combo.to_string(),
                "combination already in use",
            ));
        }
        self.installs += 1;
        self.binding = Some((window, *combo));
        *self.callback.borrow_mut() = Some(callback);
        Ok(())
    }

    fn uninstall(&mut self) {
        self.uninstalls += 1;
        self.binding = None;
        *self.callback.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const WINDOW: WindowHandle = WindowHandle(0x1234);

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let inner = hits.clone();
        (hits, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn parses_and_prints_combos() {
        let combo: HotkeyCombo = "Ctrl+Alt+Shift+P".parse().unwrap();
        assert_eq!(combo, HotkeyCombo::default());
        assert_eq!(combo.to_string(), "ctrl+alt+shift+p");

        let f9: HotkeyCombo = "ctrl + f9".parse().unwrap();
        assert_eq!(f9.key, Key::F(9));
        assert_eq!(f9.key.virtual_key(), 0x78);
        assert_eq!(Key::Char('P').virtual_key(), 0x50);
    }

    #[test]
    fn rejects_bad_combos() {
        for bad in ["", "p", "ctrl+", "ctrl+f25", "hyper+p", "ctrl+pp"] {
            let err = bad.parse::<HotkeyCombo>().unwrap_err();
            assert!(err.is_validation(), "{bad:?} should be a validation error");
        }
    }

    #[test]
    fn register_then_press_fires_callback() {
        let mut bridge = InterruptBridge::new(ScriptedHotkeys::new());
        let (hits, callback) = counter();

        assert!(bridge.register(WINDOW, HotkeyCombo::default(), callback));
        assert!(bridge.is_registered());
        assert_eq!(bridge.backend().binding(), Some((WINDOW, HotkeyCombo::default())));

        assert!(bridge.backend().press());
        assert!(bridge.backend().press());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn invalid_window_registers_nothing() {
        let mut bridge = InterruptBridge::new(ScriptedHotkeys::new());
        let (hits, callback) = counter();

        assert!(!bridge.register(WindowHandle::NONE, HotkeyCombo::default(), callback));
        assert!(!bridge.is_registered());
        assert_eq!(bridge.backend().installs(), 0);
        assert!(bridge.last_error().is_some());
        assert!(!bridge.backend().press());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn refused_binding_leaves_no_state() {
        let mut bridge = InterruptBridge::new(ScriptedHotkeys::refusing());
        let (_hits, callback) = counter();

        assert!(!bridge.register(WINDOW, HotkeyCombo::default(), callback));
        assert!(!bridge.is_registered());
        assert_eq!(bridge.backend().binding(), None);

        bridge.unregister();
        assert_eq!(bridge.backend().uninstalls(), 0);
    }

    #[test]
    fn reregistering_replaces_the_previous_binding() {
        let mut bridge = InterruptBridge::new(ScriptedHotkeys::new());
        let (first, first_cb) = counter();
        let (second, second_cb) = counter();
        let f9: HotkeyCombo = "ctrl+f9".parse().unwrap();

        assert!(bridge.register(WINDOW, HotkeyCombo::default(), first_cb));
        assert!(bridge.register(WINDOW, f9, second_cb));
        assert_eq!(bridge.backend().uninstalls(), 1);
        assert_eq!(bridge.combo(), Some(&f9));

        bridge.backend().press();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut bridge = InterruptBridge::new(ScriptedHotkeys::new());
        bridge.unregister();

        let (hits, callback) = counter();
        bridge.register(WINDOW, HotkeyCombo::default(), callback);
        bridge.unregister();
        bridge.unregister();

        assert_eq!(bridge.backend().uninstalls(), 1);
        assert!(!bridge.backend().press());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn reentrant_press_is_dropped() {
        let mut backend = ScriptedHotkeys::new();
        let shared = backend.callback.clone();
        let nested = Rc::new(Cell::new(None));
        let seen = nested.clone();
        backend
            .install(
                WINDOW,
                &HotkeyCombo::default(),
                Box::new(move || {
                    // A press arriving while this one is still running
                    seen.set(Some(shared.try_borrow_mut().is_ok()));
                }),
            )
            .unwrap();

        assert!(backend.press());
        assert_eq!(nested.get(), Some(false));
    }
}
