use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Duration, Local};
use serde_json::json;
use taskflow::commands::*;
use taskflow::dates::{day_identity, COMPLETED};
use taskflow::models::Priority;
use taskflow::storage::{self, ImportError, LAST_RESET, LAST_RESET_NOTIFICATION};

// Commands locate the storage files through an environment variable, so
// tests must run serially.
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut db_path = env::temp_dir();
    db_path.push(format!("taskflow_test_{}.json", test_name));
    env::set_var("TASKFLOW_DB", db_path.to_str().unwrap());

    cleanup(&db_path);
    f(db_path.clone());
    cleanup(&db_path);

    env::remove_var("TASKFLOW_DB");
}

fn cleanup(db_path: &PathBuf) {
    if db_path.exists() {
        fs::remove_file(db_path).unwrap();
    }
    for marker in [LAST_RESET, LAST_RESET_NOTIFICATION] {
        let mut p = db_path.clone();
        p.pop();
        p.push(marker);
        if p.exists() {
            fs::remove_file(&p).unwrap();
        }
    }
}

fn add(title: &str, time: Option<&str>) {
    cmd_add(
        title.to_string(),
        None,
        None,
        Priority::Medium,
        None,
        time.map(str::to_string),
        true,
    );
}

#[test]
fn test_first_run_yields_seed_set_without_persisting() {
    with_test_db("first_run", |db_path| {
        let tasks = storage::load_tasks();
        assert_eq!(tasks.len(), 4);
        assert!(tasks[3].completed);
        assert_eq!(tasks[3].date, COMPLETED);
        // Reading alone does not create the file.
        assert!(!db_path.exists());
    });
}

#[test]
fn test_add_persists_seeds_plus_new_task() {
    with_test_db("add", |db_path| {
        add("Treino de corrida", Some("07:00"));

        assert!(db_path.exists());
        let tasks = storage::load_tasks();
        assert_eq!(tasks.len(), 5);
        let t = &tasks[0];
        assert_eq!(t.id, 5);
        assert_eq!(t.title, "Treino de corrida");
        assert_eq!(t.date, "Hoje, 07:00");
        assert_eq!(t.original_date.as_deref(), Some("Hoje, 07:00"));
        assert!(!t.completed);
    });
}

#[test]
fn test_add_blank_title_changes_nothing() {
    with_test_db("add_blank", |db_path| {
        // Keep the startup reset quiet so only the add itself could write.
        let today = day_identity(Local::now().date_naive());
        storage::save_marker(LAST_RESET, &today).unwrap();

        add("   ", None);
        // The rejected create never reaches the store.
        assert!(!db_path.exists());
    });
}

#[test]
fn test_complete_round_trip_persists_date_bookkeeping() {
    with_test_db("complete", |_db_path| {
        cmd_complete(2, true);
        let tasks = storage::load_tasks();
        let t = tasks.iter().find(|t| t.id == 2).unwrap();
        assert!(t.completed);
        assert_eq!(t.date, COMPLETED);
        assert_eq!(t.original_date.as_deref(), Some("Hoje, 18:00"));

        cmd_complete(2, true);
        let tasks = storage::load_tasks();
        let t = tasks.iter().find(|t| t.id == 2).unwrap();
        assert!(!t.completed);
        assert_eq!(t.date, "Hoje, 18:00");
    });
}

#[test]
fn test_important_toggle_persists() {
    with_test_db("important", |_db_path| {
        cmd_important(1, true);
        let tasks = storage::load_tasks();
        assert!(tasks.iter().find(|t| t.id == 1).unwrap().important);
        cmd_important(1, true);
        let tasks = storage::load_tasks();
        assert!(!tasks.iter().find(|t| t.id == 1).unwrap().important);
    });
}

#[test]
fn test_unknown_ids_are_tolerated() {
    with_test_db("unknown_id", |db_path| {
        let today = day_identity(Local::now().date_naive());
        storage::save_marker(LAST_RESET, &today).unwrap();

        cmd_complete(99, true);
        cmd_remove(99, true);
        cmd_edit(99, Some("x".to_string()), None, None, None, None, None, true);
        // Nothing was persisted for any of the no-ops.
        assert!(!db_path.exists());
    });
}

#[test]
fn test_edit_persists_merged_fields() {
    with_test_db("edit", |_db_path| {
        cmd_edit(
            1,
            Some("Reunião semanal".to_string()),
            None,
            None,
            Some(Priority::Low),
            None,
            Some("11:30".to_string()),
            true,
        );
        let tasks = storage::load_tasks();
        let t = tasks.iter().find(|t| t.id == 1).unwrap();
        assert_eq!(t.title, "Reunião semanal");
        assert_eq!(t.priority, Priority::Low);
        assert_eq!(t.date, "Hoje, 11:30");
        assert_eq!(t.original_date.as_deref(), Some("Hoje, 10:00"));
    });
}

#[test]
fn test_remove_and_clear() {
    with_test_db("remove_clear", |_db_path| {
        cmd_remove(3, true);
        let tasks = storage::load_tasks();
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| t.id != 3));

        cmd_clear(true);
        assert!(storage::load_tasks().is_empty());
    });
}

#[test]
fn test_samples_restore_the_seed_set() {
    with_test_db("samples", |_db_path| {
        cmd_clear(true);
        assert!(storage::load_tasks().is_empty());
        cmd_samples(true);
        let tasks = storage::load_tasks();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].title, "Reunião com a equipe de desenvolvimento");
    });
}

#[test]
fn test_export_import_round_trip() {
    with_test_db("export_import", |db_path| {
        add("Tarefa exportada", Some("07:00"));
        let before = storage::load_tasks();

        let mut export_path = db_path.clone();
        export_path.set_file_name("taskflow_test_backup.json");
        cmd_export(Some(export_path.clone()), true);

        cmd_clear(true);
        assert!(storage::load_tasks().is_empty());

        cmd_import(export_path.clone(), true);
        let after = storage::load_tasks();
        assert_eq!(after, before);

        fs::remove_file(export_path).unwrap();
    });
}

#[test]
fn test_import_rejects_non_array() {
    with_test_db("import_reject", |db_path| {
        add("Sobrevivente", None);
        let before = storage::load_tasks();

        let mut bad_path = db_path.clone();
        bad_path.set_file_name("taskflow_test_bad.json");
        fs::write(&bad_path, "{\"tasks\": []}").unwrap();

        assert!(matches!(
            storage::import_tasks(&bad_path),
            Err(ImportError::NotAnArray)
        ));
        cmd_import(bad_path.clone(), true);
        // State left unchanged.
        assert_eq!(storage::load_tasks(), before);

        fs::remove_file(bad_path).unwrap();
    });
}

#[test]
fn test_import_accepts_loosely_shaped_elements() {
    with_test_db("import_loose", |db_path| {
        let mut loose_path = db_path.clone();
        loose_path.set_file_name("taskflow_test_loose.json");
        // Only the array shape matters; element fields all default.
        fs::write(&loose_path, "[{\"title\": \"x\"}, {}]").unwrap();

        let imported = storage::import_tasks(&loose_path).unwrap();
        assert_eq!(imported.len(), 2);

        cmd_import(loose_path.clone(), true);
        let tasks = storage::load_tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "x");
        assert_eq!(tasks[1].id, 0);
        assert_eq!(tasks[1].title, "");
        assert!(!tasks[1].completed);

        fs::remove_file(loose_path).unwrap();
    });
}

#[test]
fn test_add_rejects_invalid_date() {
    with_test_db("add_bad_date", |db_path| {
        // Keep the startup reset quiet so only the add itself could write.
        let today = day_identity(Local::now().date_naive());
        storage::save_marker(LAST_RESET, &today).unwrap();

        cmd_add(
            "Tarefa".to_string(),
            None,
            None,
            Priority::Medium,
            Some("25-12-2025".to_string()),
            None,
            true,
        );
        assert!(!db_path.exists());
    });
}

#[test]
fn test_unknown_fields_survive_a_round_trip() {
    with_test_db("extra_fields", |db_path| {
        let stored = json!([{
            "id": 1,
            "title": "Tarefa antiga",
            "date": "Hoje, 10:00",
            "createdAt": "2024-12-24T08:00:00+00:00",
            "color": "roxo"
        }]);
        fs::write(&db_path, stored.to_string()).unwrap();

        let tasks = storage::load_tasks();
        assert_eq!(tasks[0].extra.get("color"), Some(&json!("roxo")));

        storage::save_tasks(&tasks).unwrap();
        let raw = fs::read_to_string(&db_path).unwrap();
        assert!(raw.contains("roxo"));
    });
}

#[test]
fn test_corrupt_store_falls_back_to_seed_set() {
    with_test_db("corrupt", |db_path| {
        fs::write(&db_path, "not json at all {{{").unwrap();
        let tasks = storage::load_tasks();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].id, 1);
    });
}

#[test]
fn test_open_repository_runs_daily_reset() {
    with_test_db("daily_reset", |db_path| {
        let stored = json!([{
            "id": 1,
            "title": "Estudar",
            "date": "Concluída",
            "originalDate": "Amanhã, 19:00",
            "completed": true,
            "createdAt": "2024-12-24T08:00:00+00:00"
        }]);
        fs::write(&db_path, stored.to_string()).unwrap();
        let yesterday = day_identity(Local::now().date_naive() - Duration::days(1));
        storage::save_marker(LAST_RESET, &yesterday).unwrap();

        let repo = open_repository(true);
        let t = repo.find(1).unwrap();
        assert!(!t.completed);
        assert_eq!(t.date, "Amanhã, 19:00");

        // The reverted collection was persisted and the marker refreshed.
        let tasks = storage::load_tasks();
        assert!(!tasks[0].completed);
        let today = day_identity(Local::now().date_naive());
        assert_eq!(storage::load_marker(LAST_RESET), Some(today));
    });
}

#[test]
fn test_open_repository_skips_reset_on_same_day() {
    with_test_db("same_day", |db_path| {
        let stored = json!([{
            "id": 1,
            "title": "Estudar",
            "date": "Concluída",
            "originalDate": "Amanhã, 19:00",
            "completed": true,
            "createdAt": "2024-12-24T08:00:00+00:00"
        }]);
        fs::write(&db_path, stored.to_string()).unwrap();
        let today = day_identity(Local::now().date_naive());
        storage::save_marker(LAST_RESET, &today).unwrap();

        let repo = open_repository(true);
        assert!(repo.find(1).unwrap().completed);
        assert_eq!(repo.find(1).unwrap().date, COMPLETED);
    });
}

#[test]
fn test_open_repository_always_refreshes_marker() {
    with_test_db("marker_refresh", |db_path| {
        let stored = json!([{
            "id": 1,
            "title": "Pendente",
            "date": "Hoje",
            "createdAt": "2024-12-24T08:00:00+00:00"
        }]);
        fs::write(&db_path, stored.to_string()).unwrap();
        let yesterday = day_identity(Local::now().date_naive() - Duration::days(1));
        storage::save_marker(LAST_RESET, &yesterday).unwrap();

        // No completed tasks, nothing to revert, but the marker still moves.
        open_repository(true);
        let today = day_identity(Local::now().date_naive());
        assert_eq!(storage::load_marker(LAST_RESET), Some(today));
    });
}
