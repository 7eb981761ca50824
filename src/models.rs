use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Priority level of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// Represents a single task in the task list.
///
/// Serialized with camelCase field names. Unknown fields found in a stored
/// collection are kept in `extra` and written back unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, immutable after creation.
    #[serde(default)]
    pub id: u64,
    /// Short title. Never empty after trimming for tasks created here;
    /// imports only validate the array shape, not element fields.
    #[serde(default)]
    pub title: String,
    /// Longer free-text description.
    #[serde(default)]
    pub description: String,
    /// Category label ("Trabalho", "Saúde", ...).
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    /// Display date: a formatted date/time string, or "Concluída" while the
    /// task is completed.
    #[serde(default)]
    pub date: String,
    /// Last non-sentinel display date, used to restore `date` when the task
    /// is un-completed or reset for a new day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Independent of `completed`.
    #[serde(default)]
    pub important: bool,
    /// Creation timestamp (RFC 3339). Sort tie-break and overdue input.
    #[serde(default)]
    pub created_at: String,
    /// Fields from other versions of the stored format, preserved on
    /// round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// View filter applied by `TaskRepository::query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Pending tasks whose display date mentions today.
    Today,
    /// Pending tasks scheduled past today. String heuristic, no date-range
    /// math (there is no machine-readable due date in the model).
    Week,
    /// Important pending tasks.
    Important,
    /// Completed tasks.
    Completed,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Filter::All => "all",
            Filter::Today => "today",
            Filter::Week => "week",
            Filter::Important => "important",
            Filter::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

/// Partial update for an existing task. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

/// Dashboard counters over the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    pub important: usize,
}
