use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn athena(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("athena").unwrap();
    cmd.env("ATHENA_HOME", home.path())
        .env("ATHENA_API_URL", "http://127.0.0.1:9")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    athena(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("queue"));
}

#[test]
fn empty_queue_status() {
    let home = TempDir::new().unwrap();
    athena(&home)
        .args(["-o", "json", "queue", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\": 0"));
}

#[test]
fn offline_analyze_is_persisted_across_runs() {
    let home = TempDir::new().unwrap();

    athena(&home)
        .args(["--offline", "analyze", "Bananas are radioactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued"));

    athena(&home)
        .args(["-o", "json", "queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"type\": \"analyze\""))
        .stdout(predicate::str::contains("Bananas are radioactive"));

    assert!(home.path().join("athena.db").exists());
}

#[test]
fn unreachable_backend_keeps_action_queued() {
    let home = TempDir::new().unwrap();

    athena(&home)
        .args(["-o", "json", "feedback", "an-1", "--correct"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\": true"));

    athena(&home)
        .args(["-o", "json", "queue", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\": 1"))
        .stdout(predicate::str::contains("\"retrying\": 1"));
}

#[test]
fn queue_add_list_clear() {
    let home = TempDir::new().unwrap();

    athena(&home)
        .args(["queue", "add", "ping", "--payload", r#"{"n": 1}"#])
        .assert()
        .success();
    athena(&home)
        .args(["queue", "add", "ping", "--payload", r#"{"n": 2}"#])
        .assert()
        .success();

    athena(&home)
        .args(["-o", "json", "queue", "list", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"total\": 2"));

    athena(&home)
        .args(["queue", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    athena(&home)
        .args(["queue", "clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2"));

    athena(&home)
        .args(["-o", "json", "queue", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\": 0"));
}

#[test]
fn invalid_payload_is_rejected() {
    let home = TempDir::new().unwrap();
    athena(&home)
        .args(["queue", "add", "ping", "--payload", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid payload JSON"));
}

#[test]
fn offline_run_does_nothing() {
    let home = TempDir::new().unwrap();
    athena(&home)
        .args(["--offline", "-o", "json", "queue", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ran\": false"));
}

#[test]
fn config_file_sets_default_retries() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.yaml"),
        "queue:\n  default_max_retries: 9\n",
    )
    .unwrap();

    athena(&home)
        .args(["queue", "add", "ping"])
        .assert()
        .success();

    athena(&home)
        .args(["-o", "json", "queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"maxRetries\": 9"));
}

#[test]
fn backend_reads_refused_offline() {
    let home = TempDir::new().unwrap();
    athena(&home)
        .args(["--offline", "history"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Offline mode"));
}

#[test]
fn unreachable_backend_fails_show() {
    let home = TempDir::new().unwrap();
    athena(&home)
        .args(["show", "an-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));
}
