use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

fn tasklist(store_path: &PathBuf) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tasklist"));
    command
        .env("TASKLIST_STORE_PATH", store_path)
        .env("TASKLIST_CONFIG_PATH", temp_path("no-config.json"));
    command
}

fn write_store(path: &PathBuf, tasks: serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(&tasks).unwrap()).unwrap();
}

fn read_store(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn seed_one_pending(path: &PathBuf) {
    write_store(
        path,
        serde_json::json!([
            {
                "id": "task-1",
                "title": "flip me",
                "description": "",
                "completed": false,
                "createdAt": "2026-08-01T00:00:00Z"
            }
        ]),
    );
}

#[test]
fn toggle_marks_task_completed() {
    let store_path = temp_path("cli-toggle.json");
    seed_one_pending(&store_path);

    let output = tasklist(&store_path)
        .args(["toggle", "task-1"])
        .output()
        .expect("failed to run toggle command");

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed task:"));
    assert_eq!(stored[0]["completed"], true);
}

#[test]
fn toggle_twice_restores_pending() {
    let store_path = temp_path("cli-toggle-twice.json");
    seed_one_pending(&store_path);

    let first = tasklist(&store_path)
        .args(["toggle", "task-1"])
        .output()
        .expect("failed to run toggle command");
    let second = tasklist(&store_path)
        .args(["toggle", "task-1"])
        .output()
        .expect("failed to run toggle command");

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(first.status.success());
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("Reopened task:"));
    assert_eq!(stored[0]["completed"], false);
}

#[test]
fn toggle_unknown_id_is_noop() {
    let store_path = temp_path("cli-toggle-missing.json");
    seed_one_pending(&store_path);

    let output = tasklist(&store_path)
        .args(["toggle", "task-404"])
        .output()
        .expect("failed to run toggle command");

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No task with id task-404"));
    assert_eq!(stored[0]["completed"], false);
}
