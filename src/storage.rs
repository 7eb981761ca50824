use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_json::Map;

use crate::dates::COMPLETED;
use crate::models::{Priority, Task};

/// Marker file recording the last calendar day the reset engine ran.
pub const LAST_RESET: &str = "last_reset";
/// Marker file recording the last calendar day the user was told about a
/// reset.
pub const LAST_RESET_NOTIFICATION: &str = "last_reset_notification";

/// Returns the path to the tasks database file (`tasks.json`).
///
/// The path is determined in the following order:
/// 1. `TASKFLOW_DB` environment variable.
/// 2. `~/.local/share/taskflow/tasks.json` (on Linux).
/// 3. `./tasks.json` (fallback).
fn db_path() -> PathBuf {
    std::env::var("TASKFLOW_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("taskflow");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("tasks.json");
        p
    })
}

/// Returns the path to a day-marker file, located next to the tasks
/// database.
fn marker_path(name: &str) -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push(name);
    p
}

/// Loads the task collection from the storage file.
///
/// A missing file means first run and yields the seed set. Malformed JSON
/// also falls back to the seed set rather than failing startup.
pub fn load_tasks() -> Vec<Task> {
    let path = db_path();
    if !path.exists() {
        return default_tasks(Local::now());
    }
    let mut f = match OpenOptions::new().read(true).open(&path) {
        Ok(f) => f,
        Err(_) => return default_tasks(Local::now()),
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return default_tasks(Local::now());
    }
    serde_json::from_str(&s).unwrap_or_else(|_| default_tasks(Local::now()))
}

/// Saves the given task collection to the storage file.
///
/// Overwrites the existing file with the whole collection.
pub fn save_tasks(tasks: &[Task]) -> std::io::Result<()> {
    write_pretty(&db_path(), tasks)
}

/// Reads a day-marker value. Returns `None` when the marker was never
/// written.
pub fn load_marker(name: &str) -> Option<String> {
    let s = fs::read_to_string(marker_path(name)).ok()?;
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Writes a day-marker value.
pub fn save_marker(name: &str, value: &str) -> std::io::Result<()> {
    fs::write(marker_path(name), value)
}

/// Serializes the task collection as pretty-printed JSON to an arbitrary
/// file (backup/export boundary).
pub fn export_tasks(path: &Path, tasks: &[Task]) -> std::io::Result<()> {
    write_pretty(path, tasks)
}

/// Why an import file was rejected.
#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    /// The file parsed as JSON, but the top-level value is not an array.
    NotAnArray,
    Parse(serde_json::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "could not read file: {}", e),
            ImportError::NotAnArray => write!(f, "invalid file: expected a JSON array of tasks"),
            ImportError::Parse(e) => write!(f, "invalid file: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::Io(e)
    }
}

/// Reads a task collection from an export file.
///
/// The only structural requirement is that the top-level value is a JSON
/// array; element shape is filled in from field defaults. The caller
/// wholesale-replaces its collection with the result.
pub fn import_tasks(path: &Path) -> Result<Vec<Task>, ImportError> {
    let s = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&s).map_err(ImportError::Parse)?;
    if !value.is_array() {
        return Err(ImportError::NotAnArray);
    }
    serde_json::from_value(value).map_err(ImportError::Parse)
}

fn write_pretty(path: &Path, tasks: &[Task]) -> std::io::Result<()> {
    let s = serde_json::to_string_pretty(tasks).unwrap();
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// The example tasks seeded on first run. Fixed content; task 4 starts out
/// completed with the sentinel date.
pub fn default_tasks(now: DateTime<Local>) -> Vec<Task> {
    let created_at = now.to_rfc3339();
    let task = |id: u64, title: &str, description: &str, category: &str, priority, date: &str| Task {
        id,
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        priority,
        date: date.to_string(),
        original_date: None,
        completed: false,
        important: false,
        created_at: created_at.clone(),
        extra: Map::new(),
    };
    let mut tasks = vec![
        task(
            1,
            "Reunião com a equipe de desenvolvimento",
            "Discutir o progresso do projeto e definir próximos passos para o sprint atual.",
            "Trabalho",
            Priority::High,
            "Hoje, 10:00",
        ),
        task(
            2,
            "Fazer exercícios físicos",
            "30 minutos de cardio e exercícios de força na academia.",
            "Saúde",
            Priority::Medium,
            "Hoje, 18:00",
        ),
        task(
            3,
            "Estudar JavaScript avançado",
            "Revisar conceitos de closures, promises e async/await.",
            "Estudos",
            Priority::Low,
            "Amanhã, 19:00",
        ),
        task(
            4,
            "Comprar mantimentos",
            "Frutas, verduras, pão, leite e produtos de limpeza.",
            "Pessoal",
            Priority::Medium,
            COMPLETED,
        ),
    ];
    tasks[1].important = true;
    tasks[3].completed = true;
    tasks
}
