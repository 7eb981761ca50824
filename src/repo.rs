use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::Map;

use crate::dates::{self, COMPLETED, TODAY};
use crate::models::{Filter, Stats, Task, TaskDraft, TaskPatch};
use crate::overdue::is_overdue;
use crate::storage;

/// Validation failures raised by repository operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskError {
    /// The given title trims to nothing.
    EmptyTitle,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl std::error::Error for TaskError {}

/// In-memory ordered collection of tasks, most recent first.
///
/// The repository owns the collection exclusively. All operations are
/// synchronous and in-memory; the caller persists the collection after each
/// mutation.
#[derive(Debug, Default)]
pub struct TaskRepository {
    tasks: Vec<Task>,
}

impl TaskRepository {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Repository holding the first-run example tasks.
    pub fn seeded(now: DateTime<Local>) -> Self {
        Self::new(storage::default_tasks(now))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Creates a task from `draft` and inserts it at the front of the
    /// collection.
    ///
    /// The display date is formatted relative to `today`; the same value
    /// seeds `original_date` so a later complete/un-complete cycle restores
    /// it. Fails without touching the collection when the title trims to
    /// nothing.
    pub fn create(
        &mut self,
        draft: TaskDraft,
        today: NaiveDate,
        now: DateTime<Local>,
    ) -> Result<u64, TaskError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let date = dates::format_task_date(draft.date, draft.time.as_deref(), today);
        let task = Task {
            id: self.next_id(),
            title: title.to_string(),
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            date: date.clone(),
            original_date: Some(date),
            completed: false,
            important: false,
            created_at: now.to_rfc3339(),
            extra: Map::new(),
        };
        let id = task.id;
        self.tasks.insert(0, task);
        Ok(id)
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// Returns `Ok(false)` when the id is unknown (stale ids are tolerated,
    /// not an error). When a new date or time is given the display date is
    /// recomputed; `original_date` is preserved if already set, otherwise
    /// seeded from the task's prior display date. For a completed task the
    /// sentinel stays in `date` and the recomputed value becomes the restore
    /// point instead.
    pub fn update(&mut self, id: u64, patch: TaskPatch, today: NaiveDate) -> Result<bool, TaskError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if let Some(title) = patch.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(TaskError::EmptyTitle);
            }
            task.title = title.to_string();
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if patch.date.is_some() || patch.time.is_some() {
            let date = dates::format_task_date(patch.date, patch.time.as_deref(), today);
            if task.completed {
                task.original_date = Some(date);
            } else {
                if task.original_date.is_none() && task.date != COMPLETED {
                    task.original_date = Some(task.date.clone());
                }
                task.date = date;
            }
        }
        Ok(true)
    }

    /// Flips completion and applies the date bookkeeping: completing
    /// captures the current display date into `original_date` before
    /// replacing it with the sentinel; un-completing restores the original
    /// date, or `"Hoje"` when none was captured.
    ///
    /// Returns the new completion state, or `None` for an unknown id.
    pub fn toggle_complete(&mut self, id: u64) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        if task.completed {
            if task.date != COMPLETED {
                task.original_date = Some(task.date.clone());
            }
            task.date = COMPLETED.to_string();
        } else {
            task.date = task
                .original_date
                .clone()
                .unwrap_or_else(|| TODAY.to_string());
        }
        Some(task.completed)
    }

    /// Flips the important flag. No date interaction.
    pub fn toggle_important(&mut self, id: u64) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.important = !task.important;
        Some(task.important)
    }

    /// Removes the task with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != len_before
    }

    /// Empties the collection.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Wholesale replacement of the collection (import boundary).
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Filtered, searched and display-sorted view over the collection.
    ///
    /// The filter is applied first, then a case-insensitive substring search
    /// over title, description and category, then the display order:
    /// important first, pending before completed, newest `created_at` first.
    /// The sequence is finite and restartable; call again for a fresh pass.
    pub fn query(&self, filter: Filter, search: &str) -> impl Iterator<Item = &Task> {
        let needle = search.trim().to_lowercase();
        let mut view: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| matches_filter(t, filter))
            .filter(|t| needle.is_empty() || matches_search(t, &needle))
            .collect();
        view.sort_by(|a, b| display_order(a, b));
        view.into_iter()
    }

    /// Dashboard counters: pending, completed, overdue and important tasks.
    pub fn stats(&self, now: DateTime<Local>) -> Stats {
        Stats {
            pending: self.tasks.iter().filter(|t| !t.completed).count(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
            overdue: self
                .tasks
                .iter()
                .filter(|t| !t.completed && is_overdue(t, now))
                .count(),
            important: self
                .tasks
                .iter()
                .filter(|t| t.important && !t.completed)
                .count(),
        }
    }
}

fn matches_filter(task: &Task, filter: Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Today => task.date.contains(TODAY) && !task.completed,
        Filter::Week => {
            !task.date.contains(TODAY) && !task.date.contains(COMPLETED) && !task.completed
        }
        Filter::Important => task.important && !task.completed,
        Filter::Completed => task.completed,
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
        || task.category.to_lowercase().contains(needle)
}

fn display_order(a: &Task, b: &Task) -> Ordering {
    b.important
        .cmp(&a.important)
        .then(a.completed.cmp(&b.completed))
        .then_with(|| created_instant(b).cmp(&created_instant(a)))
}

fn created_instant(task: &Task) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&task.created_at)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
