use crate::dates::{COMPLETED, TODAY};
use crate::models::Task;

/// Result of a daily reset pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    /// Whether any task was reverted, i.e. the collection needs
    /// re-persisting.
    pub changed: bool,
    /// Number of tasks reverted to pending.
    pub reverted: usize,
}

/// Reverts completed tasks to pending when a new calendar day has started.
///
/// `last_reset` and `today` are day-identity strings compared only for
/// equality. When they match, the task content is untouched; the caller
/// still rewrites the last-reset marker with `today` so the marker always
/// reflects the most recent check. Otherwise every completed task goes back
/// to pending with its display date restored from `original_date`, or
/// `"Hoje"` when no original date was ever captured.
///
/// The transformation is per-task with no cross-task dependency.
pub fn reset_if_needed(tasks: &mut [Task], last_reset: Option<&str>, today: &str) -> ResetOutcome {
    if last_reset == Some(today) {
        return ResetOutcome {
            changed: false,
            reverted: 0,
        };
    }
    let mut reverted = 0;
    for task in tasks.iter_mut().filter(|t| t.completed) {
        task.completed = false;
        task.date = match task.original_date.as_deref() {
            Some(original) if original != COMPLETED => original.to_string(),
            _ => TODAY.to_string(),
        };
        reverted += 1;
    }
    ResetOutcome {
        changed: reverted > 0,
        reverted,
    }
}
