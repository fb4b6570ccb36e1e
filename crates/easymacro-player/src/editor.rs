//! Editing session
//!
//! [`MacroEditor`] is the control surface: it owns the step list, the selection, the current
//! file and the [`Sequencer`], and reports every operation through a short status line. All of
//! its state changes happen on the thread that owns it. Other threads (the hotkey window, a
//! Ctrl+C handler) talk to it through [`SurfaceEvent`]s that [`MacroEditor::pump`] drains.

use crate::sequencer::{PlaybackEnd, PlaybackReport, Sequencer, StartOutcome};
use crate::storage;
use crossbeam_channel::{unbounded, Receiver, Sender};
use easymacro_core::{Action, ActionKind, ActionList, InputActuator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub const UNTITLED: &str = "Untitled.emacro";

/// Requests queued for the owning thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    PanicHotkey,
    Stop,
}

/// Where a click lands
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// Typed coordinates, validated on submit
    Custom { x: String, y: String },
    ScreenCenter,
    /// Wherever the pointer is when the form is submitted
    Pointer,
}

/// Raw form input for adding or editing a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepForm {
    pub kind: ActionKind,
    pub position: Position,
    /// Seconds. Adding a click treats empty as zero; edits require a value.
    pub delay: String,
}

impl StepForm {
    pub fn click(kind: ActionKind, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            kind,
            position: Position::Custom { x: x.into(), y: y.into() },
            delay: String::new(),
        }
    }

    pub fn pause(delay: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Pause,
            position: Position::Custom { x: String::new(), y: String::new() },
            delay: delay.into(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn delay(mut self, delay: impl Into<String>) -> Self {
        self.delay = delay.into();
        self
    }
}

/// One line of the step list as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRow {
    /// 1-based
    pub index: usize,
    pub id: String,
    pub kind: &'static str,
    pub location: String,
    pub delay: String,
    pub selected: bool,
}

/// A non-negative number; the whole text must parse
pub fn parse_non_negative(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub struct MacroEditor {
    actions: ActionList,
    selected: Option<usize>,
    file_path: Option<PathBuf>,
    file_name: String,
    looping: bool,
    status: String,
    actuator: Arc<dyn InputActuator>,
    sequencer: Sequencer,
    events_tx: Sender<SurfaceEvent>,
    events_rx: Receiver<SurfaceEvent>,
}

impl MacroEditor {
    pub fn new(actuator: Arc<dyn InputActuator>) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            actions: ActionList::new(),
            selected: None,
            file_path: None,
            file_name: UNTITLED.to_string(),
            looping: true,
            status: "Ready".to_string(),
            sequencer: Sequencer::new(actuator.clone()),
            actuator,
            events_tx,
            events_rx,
        }
    }

    // ---- state ----

    pub fn actions(&self) -> &ActionList {
        &self.actions
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_running()
    }

    pub fn rows(&self) -> Vec<StepRow> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| StepRow {
                index: i + 1,
                id: action.id.to_string(),
                kind: action.kind_label(),
                location: action.location_label(),
                delay: action.delay_label(),
                selected: self.selected == Some(i),
            })
            .collect()
    }

    fn set_status(&mut self, status: &str) {
        debug!(status, "status");
        self.status = status.to_string();
    }

    // ---- editing ----

    /// Append a step built from `form` and select it
    pub fn add_step(&mut self, form: &StepForm) -> bool {
        let action = match self.resolve_new_step(form) {
            Ok(action) => action,
            Err(message) => {
                self.set_status(message);
                return false;
            }
        };
        let index = self.actions.append(action);
        self.selected = Some(index);
        self.set_status("Added step");
        true
    }

    fn resolve_new_step(&self, form: &StepForm) -> std::result::Result<Action, &'static str> {
        if form.kind.is_pause() {
            let delay = parse_non_negative(&form.delay).ok_or("Enter a valid wait time")?;
            return Ok(Action::pause(delay));
        }

        let (x, y) = self.resolve_position(&form.position, "Enter valid coordinates")?;
        let delay = if form.delay.trim().is_empty() {
            0.0
        } else {
            parse_non_negative(&form.delay).ok_or("Delay must be 0 or greater")?
        };
        Ok(Action::click(form.kind, x, y, delay))
    }

    fn resolve_position(
        &self,
        position: &Position,
        invalid: &'static str,
    ) -> std::result::Result<(f64, f64), &'static str> {
        match position {
            Position::Custom { x, y } => match (parse_non_negative(x), parse_non_negative(y)) {
                (Some(x), Some(y)) => Ok((x, y)),
                _ => Err(invalid),
            },
            Position::ScreenCenter => self
                .actuator
                .screen_size()
                .map(|(w, h)| (w / 2.0, h / 2.0))
                .ok_or("Couldn't read screen size"),
            Position::Pointer => self
                .actuator
                .pointer_position()
                .ok_or("Couldn't read pointer position"),
        }
    }

    /// Select a step, or clear the selection with `None`. Out-of-range indices clear it too.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.actions.len());
    }

    /// Overwrite the selected step with `form`, keeping its id
    pub fn apply_edit(&mut self, form: &StepForm) -> bool {
        let Some(index) = self.selected.filter(|&i| i < self.actions.len()) else {
            self.set_status("Select a step to edit");
            return false;
        };

        let Some(delay) = parse_non_negative(&form.delay) else {
            self.set_status("Delay must be 0 or greater");
            return false;
        };

        let (x, y) = if form.kind.is_pause() {
            (0.0, 0.0)
        } else {
            match self.resolve_position(&form.position, "Enter valid X and Y") {
                Ok(xy) => xy,
                Err(message) => {
                    self.set_status(message);
                    return false;
                }
            }
        };

        self.actions.replace_at(index, form.kind, x, y, delay);
        self.set_status("Updated step");
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(index) if index < self.actions.len() => self.remove_at(index),
            _ => {
                self.set_status("Select a step to delete");
                false
            }
        }
    }

    /// Remove any step by position, keeping the selection on the same step when it survives
    pub fn remove_at(&mut self, index: usize) -> bool {
        if self.actions.remove_at(index).is_none() {
            self.set_status("Select a step to delete");
            return false;
        }
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        self.set_status("Deleted step");
        true
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.selected = None;
        self.set_status("Ready");
    }

    // ---- files ----

    pub fn new_file(&mut self) {
        self.actions.clear();
        self.selected = None;
        self.file_path = None;
        self.file_name = UNTITLED.to_string();
        self.set_status("Ready");
    }

    /// Replace the list with a file's contents. On failure nothing changes but the status.
    pub fn open(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match storage::read_macro(path) {
            Ok(list) => {
                self.actions = list;
                self.selected = None;
                self.file_name = display_name(path);
                self.file_path = Some(path.to_path_buf());
                self.set_status("Loaded steps");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), "open failed: {:#}", e);
                self.set_status("Couldn't open file");
                false
            }
        }
    }

    /// Write to the current file. Fails when no file has been chosen yet.
    pub fn save(&mut self) -> bool {
        match self.file_path.clone() {
            Some(path) => self.write_to(path),
            None => {
                warn!("save without a file, use save_as");
                self.set_status("Failed to save");
                false
            }
        }
    }

    /// Write to `path` (`.emacro` appended when there is no extension) and make it current
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> bool {
        let mut path = path.as_ref().to_path_buf();
        if path.extension().is_none() {
            path.set_extension(easymacro_core::FILE_EXTENSION);
        }
        self.write_to(path)
    }

    fn write_to(&mut self, path: PathBuf) -> bool {
        match storage::write_macro(&path, &self.actions) {
            Ok(()) => {
                self.file_name = display_name(&path);
                self.file_path = Some(path);
                self.set_status("Saved macro");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), "save failed: {:#}", e);
                self.set_status("Failed to save");
                false
            }
        }
    }

    // ---- playback ----

    /// Play/stop button
    pub fn toggle_playback(&mut self) -> StartOutcome {
        if self.sequencer.is_running() {
            self.sequencer.stop();
            self.set_status("Playback stopped");
            return StartOutcome::AlreadyPlaying;
        }
        self.start_playback()
    }

    fn start_playback(&mut self) -> StartOutcome {
        let outcome = self.sequencer.start(&self.actions, self.looping);
        match outcome {
            StartOutcome::Started => {
                self.set_status(if self.looping { "Looping macro" } else { "Playing macro" })
            }
            StartOutcome::NothingToPlay => self.set_status("No steps to play"),
            StartOutcome::SpawnFailed => self.set_status("Couldn't start playback"),
            StartOutcome::AlreadyPlaying => {}
        }
        outcome
    }

    pub fn stop_playback(&mut self) {
        if self.sequencer.stop() {
            self.set_status("Playback stopped");
        }
    }

    /// Panic hotkey: stop whatever is playing, otherwise start
    pub fn on_panic_hotkey(&mut self) {
        if self.sequencer.is_running() {
            self.sequencer.stop();
            self.set_status("Emergency stop");
            return;
        }
        if self.actions.is_empty() {
            self.set_status("Nothing to play");
            return;
        }
        if self.start_playback() == StartOutcome::Started {
            self.set_status("Panic start");
        }
    }

    /// Queue for requests coming from other threads
    pub fn events(&self) -> Sender<SurfaceEvent> {
        self.events_tx.clone()
    }

    /// Callback for [`crate::InterruptBridge::register`]; each press queues a panic event
    pub fn hotkey_callback(&self) -> impl FnMut() + Send + 'static {
        let tx = self.events_tx.clone();
        move || {
            let _ = tx.send(SurfaceEvent::PanicHotkey);
        }
    }

    /// Handle queued events and a finished session, if any. Call regularly from the owning thread.
    pub fn pump(&mut self) -> Option<PlaybackReport> {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                SurfaceEvent::PanicHotkey => self.on_panic_hotkey(),
                SurfaceEvent::Stop => self.stop_playback(),
            }
        }

        let report = self.sequencer.poll()?;
        if report.end == PlaybackEnd::Completed {
            self.set_status(if report.looping { "Loop finished" } else { "Finished playback" });
        }
        Some(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(UNTITLED)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::{HotkeyCombo, InterruptBridge, ScriptedHotkeys, WindowHandle};
    use crate::sequencer::PlaybackState;
    use easymacro_core::RecordingActuator;
    use std::thread;
    use std::time::{Duration, Instant};

    fn editor() -> (MacroEditor, Arc<RecordingActuator>) {
        let act = Arc::new(
            RecordingActuator::new()
                .pointer(300.0, 400.0)
                .screen(1920.0, 1080.0),
        );
        (MacroEditor::new(act.clone()), act)
    }

    fn pump_until_done(editor: &mut MacroEditor) -> PlaybackReport {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(report) = editor.pump() {
                return report;
            }
            assert!(Instant::now() < deadline, "playback did not finish");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn starts_untitled_and_ready() {
        let (ed, _) = editor();
        assert_eq!(ed.file_name(), "Untitled.emacro");
        assert_eq!(ed.status(), "Ready");
        assert!(ed.looping());
        assert!(ed.file_path().is_none());
    }

    #[test]
    fn parses_whole_non_negative_numbers_only() {
        assert_eq!(parse_non_negative("10"), Some(10.0));
        assert_eq!(parse_non_negative(" 0.25 "), Some(0.25));
        assert_eq!(parse_non_negative("0"), Some(0.0));
        assert_eq!(parse_non_negative("-1"), None);
        assert_eq!(parse_non_negative("12px"), None);
        assert_eq!(parse_non_negative(""), None);
        assert_eq!(parse_non_negative("inf"), None);
        assert_eq!(parse_non_negative("NaN"), None);
    }

    #[test]
    fn add_click_selects_it() {
        let (mut ed, _) = editor();
        assert!(ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "10", "20")));
        assert!(ed.add_step(&StepForm::pause("1.5")));

        assert_eq!(ed.status(), "Added step");
        assert_eq!(ed.selected(), Some(1));
        let rows = ed.rows();
        assert_eq!(rows[0].kind, "Left");
        assert_eq!(rows[0].location, "x: 10  y: 20");
        assert_eq!(rows[1].kind, "Wait");
        assert_eq!(rows[1].delay, "1.50s");
        assert!(rows[1].selected);
    }

    #[test]
    fn add_rejects_bad_input_without_changing_the_list() {
        let (mut ed, _) = editor();

        assert!(!ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "abc", "20")));
        assert_eq!(ed.status(), "Enter valid coordinates");

        assert!(!ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "-5", "20")));
        assert_eq!(ed.status(), "Enter valid coordinates");

        assert!(!ed.add_step(&StepForm::pause("soon")));
        assert_eq!(ed.status(), "Enter a valid wait time");

        assert!(!ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "1", "2").delay("-1")));
        assert_eq!(ed.status(), "Delay must be 0 or greater");

        assert!(ed.actions().is_empty());
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn position_sources_use_actuator_probes() {
        let (mut ed, _) = editor();
        ed.add_step(&StepForm::click(ActionKind::SecondaryClick, "", "").at(Position::ScreenCenter));
        ed.add_step(&StepForm::click(ActionKind::TertiaryClick, "", "").at(Position::Pointer));

        let actions = ed.actions();
        assert_eq!((actions[0].x, actions[0].y), (960.0, 540.0));
        assert_eq!((actions[1].x, actions[1].y), (300.0, 400.0));
    }

    #[test]
    fn pointer_source_fails_without_a_probe() {
        let mut ed = MacroEditor::new(Arc::new(RecordingActuator::new()));
        assert!(!ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "", "").at(Position::Pointer)));
        assert_eq!(ed.status(), "Couldn't read pointer position");
    }

    #[test]
    fn edit_keeps_id_and_validates_in_order() {
        let (mut ed, _) = editor();
        ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "1", "2"));
        let id = ed.actions()[0].id.clone();

        ed.select(None);
        assert!(!ed.apply_edit(&StepForm::pause("1")));
        assert_eq!(ed.status(), "Select a step to edit");

        ed.select(Some(0));
        assert!(!ed.apply_edit(&StepForm::click(ActionKind::PrimaryClick, "x", "y").delay("-2")));
        assert_eq!(ed.status(), "Delay must be 0 or greater");

        assert!(!ed.apply_edit(&StepForm::click(ActionKind::PrimaryClick, "5", "6")));
        assert_eq!(ed.status(), "Delay must be 0 or greater", "empty delay is not zero");

        assert!(!ed.apply_edit(&StepForm::click(ActionKind::PrimaryClick, "x", "2").delay("0")));
        assert_eq!(ed.status(), "Enter valid X and Y");
        assert_eq!((ed.actions()[0].x, ed.actions()[0].y), (1.0, 2.0));

        assert!(ed.apply_edit(&StepForm::click(ActionKind::SecondaryClick, "5", "6").delay("0.5")));
        assert_eq!(ed.status(), "Updated step");
        let step = &ed.actions()[0];
        assert_eq!(step.id, id);
        assert_eq!((step.kind, step.x, step.y, step.delay), (ActionKind::SecondaryClick, 5.0, 6.0, 0.5));

        // Pauses ignore coordinate text entirely
        assert!(ed.apply_edit(&StepForm::pause("2").at(Position::Custom {
            x: "junk".into(),
            y: "junk".into()
        })));
        assert_eq!((ed.actions()[0].x, ed.actions()[0].y), (0.0, 0.0));
    }

    #[test]
    fn delete_and_remove_track_selection() {
        let (mut ed, _) = editor();
        for x in ["1", "2", "3"] {
            ed.add_step(&StepForm::click(ActionKind::PrimaryClick, x, "0"));
        }

        ed.select(Some(2));
        assert!(ed.remove_at(0));
        assert_eq!(ed.selected(), Some(1));
        assert_eq!(ed.actions()[1].x, 3.0);

        assert!(ed.delete_selected());
        assert_eq!(ed.status(), "Deleted step");
        assert_eq!(ed.selected(), None);

        assert!(!ed.delete_selected());
        assert_eq!(ed.status(), "Select a step to delete");
        assert!(!ed.remove_at(9));

        ed.clear();
        assert!(ed.actions().is_empty());
        assert_eq!(ed.status(), "Ready");
    }

    #[test]
    fn select_out_of_range_clears() {
        let (mut ed, _) = editor();
        ed.add_step(&StepForm::pause("1"));
        ed.select(Some(3));
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn save_open_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ed, _) = editor();
        ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "10", "20").delay("0.5"));
        ed.add_step(&StepForm::pause("1"));

        assert!(!ed.save());
        assert_eq!(ed.status(), "Failed to save");

        assert!(ed.save_as(dir.path().join("farm")));
        assert_eq!(ed.status(), "Saved macro");
        assert_eq!(ed.file_name(), "farm.emacro");
        assert!(ed.save());

        let saved = ed.actions().clone();
        ed.new_file();
        assert!(ed.actions().is_empty());
        assert_eq!(ed.file_name(), "Untitled.emacro");

        assert!(ed.open(dir.path().join("farm.emacro")));
        assert_eq!(ed.status(), "Loaded steps");
        assert_eq!(ed.actions(), &saved);
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn failed_open_keeps_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.emacro");
        std::fs::write(&bad, r#"{"not": "a list"}"#).unwrap();

        let (mut ed, _) = editor();
        ed.add_step(&StepForm::pause("1"));
        let before = ed.actions().clone();

        assert!(!ed.open(&bad));
        assert_eq!(ed.status(), "Couldn't open file");
        assert_eq!(ed.actions(), &before);
        assert_eq!(ed.file_name(), "Untitled.emacro");

        assert!(!ed.open(dir.path().join("missing.emacro")));
    }

    #[test]
    fn toggle_with_no_steps() {
        let (mut ed, _) = editor();
        assert_eq!(ed.toggle_playback(), StartOutcome::NothingToPlay);
        assert_eq!(ed.status(), "No steps to play");
        assert!(!ed.is_playing());
    }

    #[test]
    fn play_once_reports_finished() {
        let (mut ed, act) = editor();
        ed.set_looping(false);
        ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "10", "20").delay("0.05"));

        assert_eq!(ed.toggle_playback(), StartOutcome::Started);
        assert_eq!(ed.status(), "Playing macro");

        let report = pump_until_done(&mut ed);
        assert_eq!(report.end, PlaybackEnd::Completed);
        assert_eq!(ed.status(), "Finished playback");
        assert_eq!(act.count(), 1);
        assert!(!ed.is_playing());
    }

    #[test]
    fn toggle_stops_a_loop() {
        let (mut ed, _) = editor();
        ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "1", "1").delay("0.02"));

        ed.toggle_playback();
        assert_eq!(ed.status(), "Looping macro");
        thread::sleep(Duration::from_millis(60));

        ed.toggle_playback();
        assert_eq!(ed.status(), "Playback stopped");

        let report = pump_until_done(&mut ed);
        assert!(report.was_cancelled());
        assert_eq!(ed.status(), "Playback stopped");
    }

    #[test]
    fn edits_during_playback_do_not_reach_the_session() {
        let (mut ed, act) = editor();
        ed.set_looping(false);
        ed.add_step(&StepForm::pause("0.1"));
        ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "1", "1"));

        ed.toggle_playback();
        ed.clear();
        ed.add_step(&StepForm::click(ActionKind::SecondaryClick, "9", "9"));

        pump_until_done(&mut ed);
        let calls = act.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!((calls[0].kind, calls[0].x), (ActionKind::PrimaryClick, 1.0));
    }

    #[test]
    fn panic_hotkey_toggles_through_the_bridge() {
        let (mut ed, act) = editor();
        let mut bridge = InterruptBridge::new(ScriptedHotkeys::new());
        assert!(bridge.register(WindowHandle(7), HotkeyCombo::default(), ed.hotkey_callback()));

        // Empty list
        bridge.backend().press();
        ed.pump();
        assert_eq!(ed.status(), "Nothing to play");

        ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "4", "4").delay("0.02"));
        bridge.backend().press();
        assert!(!ed.is_playing(), "press is only queued until pump");
        ed.pump();
        assert_eq!(ed.status(), "Panic start");
        assert!(ed.is_playing());

        thread::sleep(Duration::from_millis(60));
        bridge.backend().press();
        ed.pump();
        assert_eq!(ed.status(), "Emergency stop");

        let report = pump_until_done(&mut ed);
        assert!(report.was_cancelled());
        assert!(act.count() >= 1);
    }

    #[test]
    fn panic_while_stopping_does_not_restart() {
        let (mut ed, act) = editor();
        let mut bridge = InterruptBridge::new(ScriptedHotkeys::new());
        assert!(bridge.register(WindowHandle(7), HotkeyCombo::default(), ed.hotkey_callback()));

        ed.add_step(&StepForm::click(ActionKind::PrimaryClick, "1", "1").delay("0.3"));
        assert_eq!(ed.toggle_playback(), StartOutcome::Started);
        ed.stop_playback();
        assert_eq!(ed.sequencer().state(), PlaybackState::Stopping);

        // Both presses land before the report is drained
        bridge.backend().press();
        bridge.backend().press();
        assert!(ed.pump().is_none());
        assert_eq!(ed.status(), "Emergency stop");
        assert_eq!(ed.sequencer().state(), PlaybackState::Stopping);

        let report = pump_until_done(&mut ed);
        assert!(report.was_cancelled());
        assert_eq!(act.count(), 0);

        assert!(ed.pump().is_none());
        assert!(!ed.is_playing());
        assert_eq!(act.count(), 0);
    }

    #[test]
    fn stop_event_from_another_thread() {
        let (mut ed, _) = editor();
        ed.add_step(&StepForm::pause("0.02"));
        ed.toggle_playback();

        let events = ed.events();
        thread::spawn(move || events.send(SurfaceEvent::Stop).unwrap())
            .join()
            .unwrap();

        let report = pump_until_done(&mut ed);
        assert!(report.was_cancelled());
        assert_eq!(ed.status(), "Playback stopped");
    }
}
