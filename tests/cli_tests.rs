use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn grid(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("budget-grid").unwrap();
    cmd.env("BUDGET_GRID_DATA_DIR", data_dir.path())
        .env_remove("BUDGET_GRID_LOG");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    grid(&dir).arg("init").assert().success();
    dir
}

#[test]
fn test_init_creates_files() {
    let dir = TempDir::new().unwrap();
    grid(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("categories.json").exists());
}

#[test]
fn test_show_lists_default_categories() {
    let dir = initialized();
    grid(&dir)
        .args(["show", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Income-Expenses"))
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Budget: Budget (2024)"));
}

#[test]
fn test_set_then_export_csv() {
    let dir = initialized();
    grid(&dir)
        .args(["set", "Groceries", "mar", "250", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set Groceries Mar to $250.00"));

    grid(&dir)
        .args(["export", "--format", "csv", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Row,Category,Depth,Kind,Editable"))
        .stdout(predicate::str::contains("250.00"))
        .stdout(predicate::str::contains("-250.00"));
}

#[test]
fn test_set_is_scoped_to_year() {
    let dir = initialized();
    grid(&dir)
        .args(["set", "Rent", "jan", "1000", "--year", "2024"])
        .assert()
        .success();

    grid(&dir)
        .args(["show", "--category", "Rent", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000.00").not());
}

#[test]
fn test_set_on_aggregate_fails() {
    let dir = initialized();
    grid(&dir)
        .args(["set", "Housing", "jan", "100", "--year", "2024"])
        .assert()
        .failure();
}

#[test]
fn test_apply_distribute_total() {
    let dir = initialized();
    grid(&dir)
        .args(["set", "Rent", "jan", "1200", "--year", "2024"])
        .assert()
        .success();

    grid(&dir)
        .args(["apply", "Rent", "total", "distribute", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$100.00"))
        .stdout(predicate::str::contains("$1200.00"));
}

#[test]
fn test_apply_without_transform_lists_menu() {
    let dir = initialized();
    grid(&dir)
        .args(["apply", "Rent", "jan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("copy-to-end"))
        .stdout(predicate::str::contains("previous").not());
}

#[test]
fn test_apply_unavailable_transform_fails() {
    let dir = initialized();
    grid(&dir)
        .args(["apply", "Rent", "jan", "rollover", "--year", "2024"])
        .assert()
        .failure();
}

#[test]
fn test_category_add_and_list() {
    let dir = initialized();
    grid(&dir)
        .args(["category", "add", "Gym", "--parent", "Transportation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created category: Gym (Expense)"));

    grid(&dir)
        .args(["category", "add", "Bonus", "--kind", "income"])
        .assert()
        .success();

    grid(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gym"))
        .stdout(predicate::str::contains("Bonus"));
}

#[test]
fn test_category_add_top_level_needs_kind() {
    let dir = initialized();
    grid(&dir)
        .args(["category", "add", "Misc"])
        .assert()
        .failure();
}

#[test]
fn test_actual_add_and_list() {
    let dir = initialized();
    grid(&dir)
        .args([
            "actual", "add", "Groceries", "42.50", "--date", "2024-02-03", "--memo", "market",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded $42.50 in Groceries on 2024-02-03"));

    grid(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("market"))
        .stdout(predicate::str::contains("$42.50"));
}

#[test]
fn test_apply_set_to_actual() {
    let dir = initialized();
    grid(&dir)
        .args(["actual", "add", "Groceries", "80", "--date", "2024-02-10"])
        .assert()
        .success();

    grid(&dir)
        .args(["apply", "Groceries", "feb", "actual", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$80.00"));
}

#[test]
fn test_config_set_budget_name() {
    let dir = initialized();
    grid(&dir)
        .args(["config", "set", "budget_name", "Household"])
        .assert()
        .success();

    grid(&dir)
        .args(["show", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget: Household (2024)"));
}
