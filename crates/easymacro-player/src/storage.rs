//! Macro storage - `.emacro` files in one directory

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use easymacro_core::{codec, Action, ActionList, FILE_EXTENSION};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Overrides the default storage directory
pub const HOME_ENV: &str = "EASYMACRO_HOME";

/// `$EASYMACRO_HOME`, else `~/.easymacro`
pub fn default_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .context("HOME not set")?;
    Ok(PathBuf::from(home).join(".easymacro"))
}

/// Read and decode one macro file
pub fn read_macro(path: impl AsRef<Path>) -> Result<ActionList> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let list = codec::decode(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(list)
}

/// Encode and write one macro file, replacing it if present
pub fn write_macro(path: impl AsRef<Path>, actions: &[Action]) -> Result<()> {
    let path = path.as_ref();
    let text = codec::encode(actions)?;

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    w.write_all(text.as_bytes())?;
    w.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct MacroEntry {
    pub name: String,
    /// `None` when the file doesn't decode
    pub steps: Option<usize>,
    pub modified: Option<DateTime<Utc>>,
}

pub struct MacroStorage {
    dir: PathBuf,
}

impl MacroStorage {
    pub fn new() -> Result<Self> {
        Self::with_dir(default_dir()?)
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write under a sanitized file name and return the full path
    pub fn save(&self, name: &str, actions: &[Action]) -> Result<PathBuf> {
        let path = self.dir.join(file_name(name));
        write_macro(&path, actions)?;
        tracing::debug!(path = %path.display(), steps = actions.len(), "macro saved");
        Ok(path)
    }

    /// Load a stored macro by name, or any macro file by path
    pub fn load(&self, name_or_path: &str) -> Result<ActionList> {
        read_macro(self.resolve(name_or_path))
    }

    pub fn list(&self) -> Result<Vec<MacroEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let steps = match read_macro(&path) {
                Ok(list) => Some(list.len()),
                Err(e) => {
                    tracing::debug!(file = name, "skipping step count: {:#}", e);
                    None
                }
            };
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from);

            entries.push(MacroEntry {
                name: name.to_string(),
                steps,
                modified,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.resolve(name);
        fs::remove_file(&path).with_context(|| format!("Failed to delete {}", path.display()))?;
        Ok(())
    }

    pub fn exists(&self, name_or_path: &str) -> bool {
        self.resolve(name_or_path).is_file()
    }

    /// Where `name_or_path` points: itself if it names a file, otherwise a file in this store
    pub fn resolve(&self, name_or_path: &str) -> PathBuf {
        let candidate = Path::new(name_or_path);
        if candidate.components().count() > 1 || candidate.is_file() {
            return candidate.to_path_buf();
        }
        self.dir.join(file_name(name_or_path))
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

/// `name` sanitized with the macro extension appended once
pub fn file_name(name: &str) -> String {
    let suffix = format!(".{}", FILE_EXTENSION);
    let stem = name.strip_suffix(&suffix).unwrap_or(name).trim();
    let stem = if stem.is_empty() { "Untitled" } else { stem };
    format!("{}{}", sanitize(stem), suffix)
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' { c } else { '_' })
        .collect()
}
