//! Player configuration

use crate::interrupt::HotkeyCombo;
use crate::storage;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Toggles playback from any application
    pub hotkey: HotkeyCombo,
    /// Repeat the macro until stopped
    pub loop_playback: bool,
    /// Countdown before the first pass
    pub start_delay_ms: u64,
    /// Storage directory; `None` means [`storage::default_dir`]
    pub macro_dir: Option<PathBuf>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            hotkey: HotkeyCombo::default(),
            loop_playback: true,
            start_delay_ms: 0,
            macro_dir: None,
        }
    }
}

impl PlayerConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn macro_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.macro_dir {
            Some(dir) => Ok(dir.clone()),
            None => storage::default_dir(),
        }
    }
}
