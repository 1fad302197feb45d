use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "expense";

fn expense(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("EXPENSE_TRACKER_DATA_DIR", data_dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn add(data_dir: &Path, amount: &str, category: &str) {
    expense(data_dir)
        .args(["add", amount, "-c", category, "-d", "2024-03-15", "-p", "Person1"])
        .assert()
        .success()
        .stdout(contains("Added expense:"));
}

fn only_file_in(dir: &Path) -> PathBuf {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one file in {:?}", dir);
    entries.remove(0)
}

#[test]
fn cli_without_command_prints_hint() {
    let dir = TempDir::new().unwrap();
    expense(dir.path())
        .assert()
        .success()
        .stdout(contains("expense --help"));
}

#[test]
fn cli_add_then_list() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "12.50", "Food");
    add(dir.path(), "3", "Transport");

    expense(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Food").and(contains("Transport")))
        .stdout(contains("2 expense(s)"));

    expense(dir.path())
        .args(["ls", "-c", "food"])
        .assert()
        .success()
        .stdout(contains("1 expense(s)"));
}

#[test]
fn cli_add_rejects_bad_amount() {
    let dir = TempDir::new().unwrap();
    expense(dir.path())
        .args(["add", "twelve"])
        .assert()
        .failure();
}

#[test]
fn cli_clear_requires_force() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "10", "Food");

    expense(dir.path())
        .arg("clear")
        .assert()
        .success()
        .stdout(contains("WARNING: This will delete all 1 expense(s)!"));

    expense(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("1 expense(s)"));

    expense(dir.path())
        .args(["clear", "--force"])
        .assert()
        .success()
        .stdout(contains("Cleared 1 expense(s)."));

    expense(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No expenses found."));
}

#[test]
fn cli_every_change_creates_backup() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "10", "Food");
    add(dir.path(), "20", "Rent");

    expense(dir.path())
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(contains("#1").and(contains("#2")))
        .stdout(contains("Total: 2 backup(s)"));
}

#[test]
fn cli_restore_previous_state() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "10", "Food");
    add(dir.path(), "20", "Rent");

    // Without --force nothing changes
    expense(dir.path())
        .args(["backup", "restore", "1"])
        .assert()
        .success()
        .stdout(contains("WARNING"));

    expense(dir.path())
        .args(["backup", "restore", "#1", "--force"])
        .assert()
        .success()
        .stdout(contains("Restore complete!"))
        .stdout(contains("Restored 1 expense(s)"));

    expense(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("1 expense(s)"))
        .stdout(contains("Rent").not());
}

#[test]
fn cli_restore_unknown_backup_fails() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "10", "Food");

    expense(dir.path())
        .args(["backup", "restore", "99", "--force"])
        .assert()
        .failure();
}

#[test]
fn cli_csv_export_then_import_elsewhere() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    add(source.path(), "12.50", "Food");
    add(source.path(), "40", "Utilities");

    expense(source.path())
        .args(["export", "-f", "csv", "-o"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(contains("Exported CSV expense data"));

    let file = only_file_in(out.path());
    assert_eq!(file.extension().and_then(|e| e.to_str()), Some("csv"));

    expense(target.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Imported 2 expense(s) from CSV file"))
        .stdout(contains("Total expenses: 2"));

    expense(target.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Utilities"));
}

#[test]
fn cli_csv_import_reports_skipped_rows() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bank.csv");
    fs::write(
        &input,
        "Date,Amount,Category\n2024-01-05,9.99,Food\n2024-01-06,abc,Food\n",
    )
    .unwrap();

    let data = TempDir::new().unwrap();
    expense(data.path())
        .arg("import")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("Imported 1 expense(s)"))
        .stdout(contains("Skipped 1 invalid row(s)."))
        .stderr(contains("row 3"));
}

#[test]
fn cli_import_rejects_unknown_content() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "just some notes\n").unwrap();

    let data = TempDir::new().unwrap();
    expense(data.path())
        .arg("import")
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn cli_config_updates_settings() {
    let dir = TempDir::new().unwrap();

    expense(dir.path())
        .args(["config", "--retention", "5", "--currency", "$"])
        .assert()
        .success()
        .stdout(contains("Settings saved."));

    expense(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Backup retention:       5"))
        .stdout(contains("Currency symbol:        $"));

    expense(dir.path())
        .args(["config", "--retention", "0"])
        .assert()
        .failure();
}

#[test]
fn cli_summary_shows_totals() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "10", "Food");
    add(dir.path(), "5", "Food");

    expense(dir.path())
        .args(["summary", "--month", "2024-03", "-b", "100"])
        .assert()
        .success()
        .stdout(contains("Expense Summary"))
        .stdout(contains("15.00"));
}
