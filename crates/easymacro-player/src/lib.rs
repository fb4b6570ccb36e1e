//! easymacro-player - Playing macros back
//!
//! - [`sequencer`]: cancellable playback on a background worker
//! - [`interrupt`]: the global panic hotkey
//! - [`editor`]: the editing session that ties the two together
//! - [`storage`]: `.emacro` files on disk
//!
//! ## Usage
//!
//! ```rust,no_run
//! use easymacro_core::{ActionKind, RecordingActuator};
//! use easymacro_player::{MacroEditor, StepForm};
//! use std::sync::Arc;
//!
//! let mut editor = MacroEditor::new(Arc::new(RecordingActuator::new()));
//! editor.add_step(&StepForm::click(ActionKind::PrimaryClick, "100", "200").delay("0.5"));
//! editor.set_looping(false);
//! editor.toggle_playback();
//! while editor.pump().is_none() {
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//! println!("{}", editor.status());
//! ```

pub mod config;
pub mod editor;
pub mod interrupt;
pub mod platform;
pub mod sequencer;
pub mod storage;

pub use config::PlayerConfig;
pub use editor::{MacroEditor, Position, StepForm, StepRow, SurfaceEvent};
pub use interrupt::{
    HotkeyBackend, HotkeyCallback, HotkeyCombo, InterruptBridge, Key, Modifiers, ScriptedHotkeys,
    WindowHandle,
};
pub use platform::{HostWindow, NativeHotkeys};
pub use sequencer::{PlaybackEnd, PlaybackReport, PlaybackState, Sequencer, StartOutcome};
pub use storage::{read_macro, write_macro, MacroEntry, MacroStorage};
