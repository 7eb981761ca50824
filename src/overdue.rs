use chrono::{DateTime, Duration, Local};

use crate::dates::{COMPLETED, TODAY, YESTERDAY};
use crate::models::Task;

/// Heuristic check for whether a pending task is overdue.
///
/// The model has no machine-readable due date, so this approximates:
/// a task counts as overdue when its display date mentions "Ontem", or when
/// it was created more than 24 hours ago. Completed tasks and tasks
/// scheduled for today are never overdue.
///
/// `now` is injected so tests are reproducible.
pub fn is_overdue(task: &Task, now: DateTime<Local>) -> bool {
    if task.completed
        || task.date.is_empty()
        || task.date.contains(TODAY)
        || task.date.contains(COMPLETED)
    {
        return false;
    }
    if task.date.contains(YESTERDAY) {
        return true;
    }
    match DateTime::parse_from_rfc3339(&task.created_at) {
        Ok(created) => now.signed_duration_since(created) > Duration::hours(24),
        Err(_) => false,
    }
}
