//! em - easymacro CLI
//!
//! Edit stored click macros and play them back, with a global panic hotkey where the platform
//! supports one.
//!
//! Supported: Windows, macOS (playback only; no hotkey)

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use easymacro::error::{Error, ErrorCode};
use easymacro::player::{editor::StepRow, SurfaceEvent};
use easymacro::prelude::*;
use easymacro::MacroEntry;

#[derive(Parser)]
#[command(name = "em")]
#[command(about = "easymacro - timed click macros with a panic hotkey")]
#[command(version)]
struct Cli {
    /// Macro directory (defaults to $EASYMACRO_HOME or ~/.easymacro)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // === Editing ===
    /// Create an empty macro
    New {
        name: String,
        #[arg(long)]
        force: bool,
    },
    /// Append a step
    Add {
        name: String,
        #[command(flatten)]
        step: StepArgs,
    },
    /// Replace a step (1-based index)
    Edit {
        name: String,
        index: usize,
        #[command(flatten)]
        step: StepArgs,
    },
    /// Remove a step (1-based index)
    Remove {
        name: String,
        index: usize,
    },
    /// Remove every step
    Clear {
        name: String,
    },

    // === Library ===
    /// Show a macro's steps
    Show {
        name: String,
    },
    /// List saved macros
    List,
    /// Delete a macro
    Delete {
        name: String,
    },

    // === Playback ===
    /// Play a macro; the panic hotkey toggles it, Ctrl+C quits
    Play {
        name: String,
        /// Single pass instead of looping
        #[arg(long)]
        once: bool,
        /// Panic hotkey
        #[arg(long, default_value = "ctrl+alt+shift+p")]
        hotkey: String,
        /// Log clicks instead of performing them
        #[arg(long)]
        dry_run: bool,
        /// Milliseconds to wait before the first pass
        #[arg(long, default_value = "0")]
        start_delay: u64,
    },
}

#[derive(clap::Args)]
struct StepArgs {
    #[arg(long, value_enum, default_value = "left")]
    kind: StepKind,
    #[arg(long, value_enum, default_value = "custom")]
    at: At,
    #[arg(short, long, default_value = "0")]
    x: String,
    #[arg(short, long, default_value = "0")]
    y: String,
    /// Seconds; the whole step for `wait`. `edit` keeps the current delay when omitted.
    #[arg(short, long, default_value = "")]
    delay: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum StepKind {
    Left,
    Right,
    Middle,
    Wait,
}

#[derive(Clone, Copy, ValueEnum)]
enum At {
    Custom,
    Center,
    Pointer,
}

impl StepArgs {
    fn form(&self) -> StepForm {
        let kind = match self.kind {
            StepKind::Left => ActionKind::PrimaryClick,
            StepKind::Right => ActionKind::SecondaryClick,
            StepKind::Middle => ActionKind::TertiaryClick,
            StepKind::Wait => return StepForm::pause(self.delay.as_str()),
        };
        let position = match self.at {
            At::Custom => Position::Custom {
                x: self.x.clone(),
                y: self.y.clone(),
            },
            At::Center => Position::ScreenCenter,
            At::Pointer => Position::Pointer,
        };
        StepForm::click(kind, "", "")
            .at(position)
            .delay(self.delay.as_str())
    }
}

// ── Output ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Output<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Error>,
}

impl<T: Serialize> Output<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }
    fn err(e: Error) -> Output<()> {
        Output { success: false, data: None, error: Some(e) }
    }
}

fn print_json<T: Serialize>(output: &T) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to encode output: {}", e),
    }
}

#[derive(Serialize)]
struct MacroView {
    file: String,
    status: String,
    steps: Vec<StepRow>,
}

impl MacroView {
    fn of(editor: &MacroEditor) -> Self {
        Self {
            file: editor.file_name().to_string(),
            status: editor.status().to_string(),
            steps: editor.rows(),
        }
    }
}

#[derive(Serialize)]
struct PlaySummary {
    file: String,
    status: String,
    hotkey: Option<String>,
    passes: u64,
    clicks: usize,
    failed_clicks: usize,
    cancelled: bool,
    elapsed_ms: u128,
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = PlayerConfig {
        macro_dir: cli.dir,
        ..PlayerConfig::default()
    };

    let result: Result<(), anyhow::Error> = run_command(|| match cli.command {
        Commands::New { name, force } => cmd_new(&config, &name, force),
        Commands::Add { name, step } => cmd_add(&config, &name, &step),
        Commands::Edit { name, index, step } => cmd_edit(&config, &name, index, &step),
        Commands::Remove { name, index } => cmd_remove(&config, &name, index),
        Commands::Clear { name } => cmd_clear(&config, &name),
        Commands::Show { name } => cmd_show(&config, &name),
        Commands::List => cmd_list(&config),
        Commands::Delete { name } => cmd_delete(&config, &name),
        Commands::Play { name, once, hotkey, dry_run, start_delay } => {
            config.loop_playback = !once;
            config.start_delay_ms = start_delay;
            config.hotkey = hotkey.parse()?;
            cmd_play(&config, &name, dry_run)
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_command<F>(f: F) -> Result<(), anyhow::Error>
where
    F: FnOnce() -> Result<(), anyhow::Error>,
{
    match f() {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Some(err) = e.downcast_ref::<Error>() {
                print_json(&Output::<()>::err(err.clone()));
            }
            Err(e)
        }
    }
}

fn storage(config: &PlayerConfig) -> Result<MacroStorage> {
    MacroStorage::with_dir(config.macro_dir()?)
}

/// Actuator used only for position probes while editing
fn probe_actuator() -> Arc<dyn InputActuator> {
    native_actuator().unwrap_or_else(|_| Arc::new(RecordingActuator::new()))
}

/// Editor with `name` loaded; a missing macro starts empty and is saved under `name`
fn open_editor(config: &PlayerConfig, name: &str, create: bool) -> Result<MacroEditor> {
    let store = storage(config)?;
    let path = store.resolve(name);
    let mut editor = MacroEditor::new(probe_actuator());

    if path.is_file() {
        if !editor.open(&path) {
            bail!(Error::storage(&path.display().to_string(), editor.status()));
        }
    } else if create {
        editor.new_file();
        if !editor.save_as(&path) {
            bail!(Error::storage(&path.display().to_string(), editor.status()));
        }
    } else {
        bail!(Error::new(ErrorCode::Storage, format!("Macro not found: {}", name))
            .with_suggestions(vec!["Run `em list` to see saved macros".to_string()]));
    }
    Ok(editor)
}

/// Turn a rejected edit into an error carrying the status line
fn check(editor: &MacroEditor, ok: bool) -> Result<()> {
    if !ok {
        bail!(Error::validation(editor.status()));
    }
    Ok(())
}

fn save_and_show(editor: &mut MacroEditor) -> Result<()> {
    let status = editor.status().to_string();
    if !editor.save() {
        bail!(Error::new(ErrorCode::Storage, editor.status()));
    }
    let mut view = MacroView::of(editor);
    view.status = status;
    print_json(&Output::ok(view));
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
//  Editing commands
// ══════════════════════════════════════════════════════════════════════════════

fn cmd_new(config: &PlayerConfig, name: &str, force: bool) -> Result<()> {
    let store = storage(config)?;
    if store.exists(name) && !force {
        bail!(Error::new(ErrorCode::Storage, format!("Macro already exists: {}", name))
            .with_suggestions(vec!["Pass --force to overwrite it".to_string()]));
    }
    let path = store.save(name, &[])?;
    print_json(&Output::ok(serde_json::json!({ "path": path })));
    Ok(())
}

fn cmd_add(config: &PlayerConfig, name: &str, step: &StepArgs) -> Result<()> {
    let mut editor = open_editor(config, name, true)?;
    let ok = editor.add_step(&step.form());
    check(&editor, ok)?;
    save_and_show(&mut editor)
}

fn cmd_edit(config: &PlayerConfig, name: &str, index: usize, step: &StepArgs) -> Result<()> {
    let mut editor = open_editor(config, name, false)?;
    let selected = index.checked_sub(1);
    editor.select(selected);
    let mut form = step.form();
    if form.delay.trim().is_empty() {
        // No --delay keeps the step's current one
        if let Some(current) = selected.and_then(|i| editor.actions().get(i)) {
            form.delay = current.delay.to_string();
        }
    }
    let ok = editor.apply_edit(&form);
    check(&editor, ok)?;
    save_and_show(&mut editor)
}

fn cmd_remove(config: &PlayerConfig, name: &str, index: usize) -> Result<()> {
    let mut editor = open_editor(config, name, false)?;
    let ok = match index.checked_sub(1) {
        Some(i) => editor.remove_at(i),
        None => editor.delete_selected(),
    };
    check(&editor, ok)?;
    save_and_show(&mut editor)
}

fn cmd_clear(config: &PlayerConfig, name: &str) -> Result<()> {
    let mut editor = open_editor(config, name, false)?;
    editor.clear();
    save_and_show(&mut editor)
}

// ══════════════════════════════════════════════════════════════════════════════
//  Library commands
// ══════════════════════════════════════════════════════════════════════════════

fn cmd_show(config: &PlayerConfig, name: &str) -> Result<()> {
    let editor = open_editor(config, name, false)?;
    print_json(&Output::ok(MacroView::of(&editor)));
    Ok(())
}

fn cmd_list(config: &PlayerConfig) -> Result<()> {
    let store = storage(config)?;
    let entries: Vec<MacroEntry> = store.list()?;
    print_json(&Output::ok(serde_json::json!({
        "dir": store.path(),
        "macros": entries,
    })));
    Ok(())
}

fn cmd_delete(config: &PlayerConfig, name: &str) -> Result<()> {
    let store = storage(config)?;
    store.delete(name)?;
    print_json(&Output::ok(serde_json::json!({ "deleted": name })));
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
//  Playback
// ══════════════════════════════════════════════════════════════════════════════

fn cmd_play(config: &PlayerConfig, name: &str, dry_run: bool) -> Result<()> {
    let store = storage(config)?;
    let actuator: Arc<dyn InputActuator> = if dry_run {
        Arc::new(RecordingActuator::new())
    } else {
        native_actuator()?
    };

    let mut editor = MacroEditor::new(actuator);
    let path = store.resolve(name);
    if !editor.open(&path) {
        bail!(Error::storage(&path.display().to_string(), editor.status()));
    }
    editor.set_looping(config.loop_playback);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    let events = editor.events();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        let _ = events.send(SurfaceEvent::Stop);
    })?;

    // Hotkey presses arrive through this window's messages
    let host = HostWindow::open();
    let mut bridge = InterruptBridge::new(NativeHotkeys::new());
    let hotkey_active = match &host {
        Some(window) => bridge.register(window.handle(), config.hotkey, editor.hotkey_callback()),
        None => false,
    };
    if hotkey_active {
        eprintln!("Panic hotkey: {} (Ctrl+C to quit)", config.hotkey);
    } else {
        tracing::warn!("panic hotkey unavailable, use Ctrl+C to stop");
    }

    if config.start_delay_ms > 0 {
        eprintln!("Starting in {} ms...", config.start_delay_ms);
        std::thread::sleep(config.start_delay());
    }

    if !running.load(Ordering::SeqCst) {
        bail!("Interrupted before playback started");
    }
    let outcome = editor.toggle_playback();
    if outcome != StartOutcome::Started {
        bail!(Error::validation(editor.status()));
    }

    let mut last_status = editor.status().to_string();
    eprintln!("{}", last_status);
    let mut last_report: Option<PlaybackReport> = None;

    loop {
        if let Some(window) = &host {
            window.pump();
        }
        if let Some(report) = editor.pump() {
            last_report = Some(report);
            if !hotkey_active {
                break;
            }
        }
        if editor.status() != last_status {
            last_status = editor.status().to_string();
            eprintln!("{}", last_status);
        }
        if !running.load(Ordering::SeqCst) && !editor.is_playing() {
            break;
        }
        std::thread::sleep(Duration::from_millis(15));
    }
    bridge.unregister();

    let report = last_report;
    print_json(&Output::ok(PlaySummary {
        file: editor.file_name().to_string(),
        status: editor.status().to_string(),
        hotkey: hotkey_active.then(|| config.hotkey.to_string()),
        passes: report.as_ref().map_or(0, |r| r.passes),
        clicks: report.as_ref().map_or(0, |r| r.clicks),
        failed_clicks: report.as_ref().map_or(0, |r| r.failed_clicks),
        cancelled: report.as_ref().map_or(true, |r| r.was_cancelled()),
        elapsed_ms: report.as_ref().map_or(0, |r| r.elapsed.as_millis()),
    }));
    Ok(())
}
