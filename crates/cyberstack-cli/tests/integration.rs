use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cyberstack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cyberstack").unwrap();
    cmd.current_dir(dir.path()).env("CYBERSTACK_ROOT", dir.path());
    cmd
}

fn init_workspace(dir: &TempDir) {
    cyberstack(dir).arg("init").assert().success();
}

/// Run a command with `--json` and parse its stdout.
fn json_output(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = cyberstack(dir)
        .arg("--json")
        .args(args)
        .output()
        .expect("command runs");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ---------------------------------------------------------------------------
// cyberstack init / seed
// ---------------------------------------------------------------------------

#[test]
fn init_creates_workspace_files() {
    let dir = TempDir::new().unwrap();
    cyberstack(&dir).arg("init").assert().success();

    assert!(dir.path().join(".cyberstack").is_dir());
    assert!(dir.path().join(".cyberstack/config.yaml").exists());
    assert!(dir.path().join(".cyberstack/store.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    cyberstack(&dir).arg("init").assert().success();
    cyberstack(&dir).arg("init").assert().success();
}

#[test]
fn seed_reports_nothing_on_second_run() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to seed."));
}

// ---------------------------------------------------------------------------
// cyberstack state
// ---------------------------------------------------------------------------

#[test]
fn state_counts_the_seeded_store() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let state = json_output(&dir, &["state"]);
    assert_eq!(state["teams"], 3);
    assert_eq!(state["channels"], 4);
    assert_eq!(state["total_tasks"], 8);
    assert_eq!(state["users"], 0);
}

// ---------------------------------------------------------------------------
// cyberstack team
// ---------------------------------------------------------------------------

#[test]
fn team_list_shows_seeded_rosters() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["team", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Red Team"))
        .stdout(predicate::str::contains("Purple Team"));
}

#[test]
fn team_add_member_rejects_duplicates() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["team", "add-member", "red-team", "u1"])
        .assert()
        .success();
    cyberstack(&dir)
        .args(["team", "add-member", "red-team", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate team member"));
}

#[test]
fn team_create_rejects_unknown_names() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["team", "create", "green"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid team name"));
}

// ---------------------------------------------------------------------------
// cyberstack board
// ---------------------------------------------------------------------------

#[test]
fn board_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["board", "add", "todo", "Rotate", "SOC", "credentials", "--priority", "High"])
        .assert()
        .success();

    cyberstack(&dir)
        .args(["board", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rotate SOC credentials"));
}

#[test]
fn board_move_within_a_column() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    // Seeded todo column holds task-1 then task-8; move task-8 to the top.
    cyberstack(&dir)
        .args(["board", "move", "task-8", "todo", "todo", "--index", "0"])
        .assert()
        .success();

    let columns = json_output(&dir, &["board", "list"]);
    let todo = columns[0]["tasks"].as_array().unwrap();
    assert_eq!(todo[0]["id"], "task-8");
    assert_eq!(todo[1]["id"], "task-1");
}

#[test]
fn board_move_across_columns() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["board", "move", "task-1", "todo", "done"])
        .assert()
        .success();

    let columns = json_output(&dir, &["board", "list"]);
    assert_eq!(columns[0]["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(columns[2]["tasks"].as_array().unwrap().len(), 5);
}

#[test]
fn board_delete_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["board", "delete", "task-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found"));
}

// ---------------------------------------------------------------------------
// cyberstack user
// ---------------------------------------------------------------------------

#[test]
fn user_list_on_fresh_workspace() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["user", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No users registered."));
}

#[test]
fn user_set_role_requires_an_existing_record() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    cyberstack(&dir)
        .args(["user", "set-role", "ghost", "admin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
