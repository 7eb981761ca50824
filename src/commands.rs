use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::dates::{day_identity, COMPLETED};
use crate::models::{Filter, Priority, TaskDraft, TaskPatch};
use crate::overdue::is_overdue;
use crate::repo::TaskRepository;
use crate::reset::reset_if_needed;
use crate::storage::{self, LAST_RESET, LAST_RESET_NOTIFICATION};

/// Loads the persisted collection and runs the daily reset pass.
///
/// Completed tasks left over from a previous day go back to pending, the
/// changed collection is persisted, and the last-reset marker is rewritten
/// with today regardless of whether anything changed. Once per day, a line
/// reporting restored tasks is printed.
pub fn open_repository(silent: bool) -> TaskRepository {
    let mut tasks = storage::load_tasks();
    let today = day_identity(Local::now().date_naive());
    let last_reset = storage::load_marker(LAST_RESET);
    let outcome = reset_if_needed(&mut tasks, last_reset.as_deref(), &today);
    if outcome.changed {
        if let Err(e) = storage::save_tasks(&tasks) {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
    if let Err(e) = storage::save_marker(LAST_RESET, &today) {
        if !silent { eprintln!("Failed to update reset marker: {}", e); }
    }
    let repo = TaskRepository::new(tasks);
    notify_reset(&repo, &today, silent);
    repo
}

/// Once-per-day reset notification, gated by its own marker.
fn notify_reset(repo: &TaskRepository, today: &str, silent: bool) {
    if storage::load_marker(LAST_RESET_NOTIFICATION).as_deref() == Some(today) {
        return;
    }
    let restored = repo
        .tasks()
        .iter()
        .filter(|t| !t.completed && t.date != COMPLETED && t.original_date.is_some())
        .count();
    if restored > 0 {
        if !silent {
            println!("{} completed task(s) from yesterday were reset for today.", restored);
        }
        if let Err(e) = storage::save_marker(LAST_RESET_NOTIFICATION, today) {
            if !silent { eprintln!("Failed to update notification marker: {}", e); }
        }
    }
}

fn parse_date(due: Option<&str>) -> Result<Option<NaiveDate>, chrono::ParseError> {
    due.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d")).transpose()
}

/// Adds a new task at the front of the collection.
///
/// An empty title is rejected with a warning and no state change.
pub fn cmd_add(
    title: String,
    description: Option<String>,
    category: Option<String>,
    priority: Priority,
    due: Option<String>,
    time: Option<String>,
    silent: bool,
) {
    let date = match parse_date(due.as_deref()) {
        Ok(date) => date,
        Err(e) => {
            if !silent { eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", due.unwrap_or_default(), e); }
            return;
        }
    };
    let mut repo = open_repository(silent);
    let now = Local::now();
    let draft = TaskDraft {
        title,
        description: description.unwrap_or_default(),
        category: category.unwrap_or_default(),
        priority,
        date,
        time,
    };
    match repo.create(draft, now.date_naive(), now) {
        Ok(id) => {
            if let Err(e) = storage::save_tasks(repo.tasks()) {
                if !silent { eprintln!("Failed to save tasks: {}", e); }
            } else {
                if !silent { println!("Task added (id = {})", id); }
            }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Lists tasks in a formatted table, filtered, searched and in display
/// order.
pub fn cmd_list(filter: Filter, search: Option<String>) {
    let repo = open_repository(false);
    let search = search.unwrap_or_default();
    let view: Vec<_> = repo.query(filter, &search).collect();
    if view.is_empty() {
        println!("No tasks found.");
        return;
    }

    let now = Local::now();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in view {
        let priority_color = match t.priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        let status = if t.completed {
            "Done"
        } else if t.important {
            "Important"
        } else {
            "Pending"
        };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };
        let date_color = if is_overdue(t, now) { Color::Red } else { Color::Reset };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(&t.category),
            Cell::new(t.priority).fg(priority_color),
            Cell::new(&t.date).fg(date_color),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Toggles completion of a task by ID, with the date bookkeeping applied.
pub fn cmd_complete(id: u64, silent: bool) {
    let mut repo = open_repository(silent);
    match repo.toggle_complete(id) {
        Some(completed) => {
            if let Err(e) = storage::save_tasks(repo.tasks()) {
                if !silent { eprintln!("Failed to save tasks: {}", e); }
            } else if !silent {
                if completed {
                    println!("Task {} marked as complete.", id);
                } else {
                    println!("Task {} back to pending.", id);
                }
            }
        }
        None => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
    }
}

/// Toggles the important flag of a task by ID.
pub fn cmd_important(id: u64, silent: bool) {
    let mut repo = open_repository(silent);
    match repo.toggle_important(id) {
        Some(important) => {
            if let Err(e) = storage::save_tasks(repo.tasks()) {
                if !silent { eprintln!("Failed to save tasks: {}", e); }
            } else if !silent {
                if important {
                    println!("Task {} marked as important.", id);
                } else {
                    println!("Task {} no longer important.", id);
                }
            }
        }
        None => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
    }
}

/// Edits an existing task's details.
pub fn cmd_edit(
    id: u64,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
    due: Option<String>,
    time: Option<String>,
    silent: bool,
) {
    let date = match parse_date(due.as_deref()) {
        Ok(date) => date,
        Err(e) => {
            if !silent { eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", due.unwrap_or_default(), e); }
            return;
        }
    };
    let mut repo = open_repository(silent);
    let patch = TaskPatch {
        title,
        description,
        category,
        priority,
        date,
        time,
    };
    match repo.update(id, patch, Local::now().date_naive()) {
        Ok(true) => {
            if let Err(e) = storage::save_tasks(repo.tasks()) {
                if !silent { eprintln!("Failed to save tasks: {}", e); }
            } else {
                if !silent { println!("Task {} updated.", id); }
            }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Removes a task from the collection by ID.
pub fn cmd_remove(id: u64, silent: bool) {
    let mut repo = open_repository(silent);
    if repo.remove(id) {
        if let Err(e) = storage::save_tasks(repo.tasks()) {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        } else {
            if !silent { println!("Task {} removed.", id); }
        }
    } else {
        if !silent { eprintln!("Task {} not found.", id); }
    }
}

/// Empties the task collection after confirmation.
pub fn cmd_clear(force: bool) {
    if !force {
        print!("Are you sure you want to remove ALL tasks? This cannot be undone. [y/N] ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    let mut repo = open_repository(false);
    repo.clear();
    if let Err(e) = storage::save_tasks(repo.tasks()) {
        eprintln!("Failed to save tasks: {}", e);
    } else {
        println!("All tasks removed.");
    }
}

/// Replaces the collection with the example tasks.
pub fn cmd_samples(silent: bool) {
    let mut repo = open_repository(silent);
    repo.replace_all(storage::default_tasks(Local::now()));
    if let Err(e) = storage::save_tasks(repo.tasks()) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
    } else {
        if !silent { println!("Example tasks restored."); }
    }
}

/// Exports the collection as pretty-printed JSON.
///
/// Without an explicit path the file lands in the current directory as
/// `taskflow-backup-<date>.json`.
pub fn cmd_export(path: Option<PathBuf>, silent: bool) {
    let path = path.unwrap_or_else(|| {
        PathBuf::from(format!("taskflow-backup-{}.json", Local::now().date_naive()))
    });
    let repo = open_repository(silent);
    match storage::export_tasks(&path, repo.tasks()) {
        Ok(()) => {
            if !silent { println!("Exported {} task(s) to {}", repo.len(), path.display()); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to export tasks: {}", e); }
        }
    }
}

/// Imports a collection from a JSON file, wholesale-replacing the current
/// one. Anything other than a JSON array is rejected with the state left
/// unchanged.
pub fn cmd_import(path: PathBuf, silent: bool) {
    let mut repo = open_repository(silent);
    match storage::import_tasks(&path) {
        Ok(tasks) => {
            repo.replace_all(tasks);
            if let Err(e) = storage::save_tasks(repo.tasks()) {
                if !silent { eprintln!("Failed to save tasks: {}", e); }
            } else {
                if !silent { println!("Imported {} task(s).", repo.len()); }
            }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to import tasks: {}", e); }
        }
    }
}

/// Shows pending/completed/overdue/important counters.
pub fn cmd_stats() {
    let repo = open_repository(false);
    let stats = repo.stats(Local::now());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("Pending").add_attribute(Attribute::Bold),
            Cell::new("Completed").add_attribute(Attribute::Bold),
            Cell::new("Overdue").add_attribute(Attribute::Bold),
            Cell::new("Important").add_attribute(Attribute::Bold),
        ]);
    table.add_row(vec![
        Cell::new(stats.pending),
        Cell::new(stats.completed).fg(Color::Green),
        Cell::new(stats.overdue).fg(if stats.overdue > 0 { Color::Red } else { Color::Reset }),
        Cell::new(stats.important).fg(Color::Yellow),
    ]);
    println!("{table}");
}
