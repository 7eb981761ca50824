//! # TaskFlow
//!
//! A local task list manager with a daily reset, written in Rust. Tasks live
//! in a JSON file on disk; the CLI covers adding, editing, filtering,
//! searching, completion and importance toggling, plus export/import
//! backups.
//!
//! ## Features
//!
//! *   **Daily Reset**: completed tasks automatically go back to pending on
//!     the next calendar day, restoring their original display date. Done
//!     once per day, gated by a persisted marker.
//! *   **Filters & Search**: today / next days / important / completed
//!     views, combined with case-insensitive text search over title,
//!     description and category.
//! *   **Display Order**: important tasks first, then pending before
//!     completed, newest first.
//! *   **Data Persistence**: tasks are stored in standard XDG data
//!     directories (JSON format) and written back synchronously after every
//!     change.
//! *   **Backups**: export the collection as pretty-printed JSON and import
//!     it back (wholesale replacement).
//!
//! ## Usage
//!
//! ```bash
//! # Add a task scheduled for a specific date and time
//! taskflow add "Reunião de planejamento" --category Trabalho \
//!     --priority high --date 2025-12-25 --time 10:00
//!
//! # List pending tasks scheduled for today
//! taskflow list --filter today
//!
//! # Search across all tasks
//! taskflow list --search academia
//!
//! # Toggle completion / importance
//! taskflow complete 2
//! taskflow important 2
//!
//! # Backup and restore
//! taskflow export backup.json
//! taskflow import backup.json
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/taskflow/tasks.json`
//! *   macOS: `~/Library/Application Support/taskflow/tasks.json`
//! *   Windows: `%APPDATA%\taskflow\tasks.json`
//!
//! You can override the file location by setting the `TASKFLOW_DB`
//! environment variable. Two small marker files (`last_reset`,
//! `last_reset_notification`) next to it keep the once-per-day gating state.
//!
//! ## Dates
//!
//! Tasks carry a display-facing date string rather than a machine-readable
//! due date: `"Hoje, 10:00"`, `"25 dez, 10:00"`, `"Sem data definida"`, or
//! the sentinel `"Concluída"` while the task is completed. The previous
//! value is remembered so un-completing a task (or the daily reset) brings
//! its schedule back.

pub mod commands;
pub mod dates;
pub mod models;
pub mod overdue;
pub mod repo;
pub mod reset;
pub mod storage;
