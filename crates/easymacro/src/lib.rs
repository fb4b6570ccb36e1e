//! # EASYMACRO
//!
//! Timed click macros with a panic button.
//!
//! ## Features
//!
//! - **Steps**: left, right and middle clicks at fixed coordinates, plus pauses
//! - **Playback**: once or looping, on a background worker, stoppable mid-delay
//! - **Panic hotkey**: toggle playback from any application
//! - **Files**: plain `.emacro` JSON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use easymacro::prelude::*;
//!
//! let actuator = native_actuator()?;
//! let mut editor = MacroEditor::new(actuator);
//! editor.open("farm.emacro");
//! editor.toggle_playback();
//! # Ok::<(), easymacro::Error>(())
//! ```

// Re-export the model, codec and actuators
pub use easymacro_core::*;

// Re-export playback
pub use easymacro_player as player;

pub use easymacro_player::{
    HostWindow, HotkeyCombo, InterruptBridge, MacroEditor, MacroEntry, MacroStorage,
    NativeHotkeys, PlaybackEnd, PlaybackReport, PlayerConfig, Sequencer, StartOutcome, StepForm,
};

/// Prelude - import everything you need
pub mod prelude {
    pub use easymacro_core::prelude::*;

    pub use easymacro_player::{
        HostWindow, HotkeyCombo, InterruptBridge, MacroEditor, MacroStorage, NativeHotkeys,
        PlaybackReport, PlayerConfig, Position, Sequencer, StartOutcome, StepForm,
    };
}
