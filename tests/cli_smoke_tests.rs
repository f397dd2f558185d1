mod common;

use assert_cmd::Command;
use common::{at, equal_expense, monthly_template, registry, settlement, write_snapshot};
use predicates::prelude::*;
use predicates::str::contains;
use rust_decimal_macros::dec;
use split_ledger::{snapshot::LedgerSnapshot, utils::persistence};
use tempfile::TempDir;

fn sample() -> LedgerSnapshot {
    let mut snapshot = LedgerSnapshot::new(registry(&["A", "B", "C"]));
    snapshot.expenses.push(equal_expense(
        "Dinner",
        dec!(300),
        "A",
        &["A", "B", "C"],
        at(2025, 1, 10),
    ));
    snapshot
        .settlements
        .push(settlement("B", "A", dec!(100), at(2025, 1, 12)));
    snapshot.recurring.push(monthly_template(
        "Rent",
        dec!(900),
        "C",
        &["A", "B", "C"],
        15,
        at(2025, 1, 1),
    ));
    snapshot
}

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("split_ledger_cli").unwrap();
    cmd.env("SPLIT_LEDGER_HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn balances_prints_summary_json() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = write_snapshot(&sample());
    cli(&home)
        .arg("balances")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("\"total_expense\""))
        .stdout(contains("\"participant\": \"C\""));
}

#[test]
fn settle_lists_transfers() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = write_snapshot(&sample());
    cli(&home)
        .arg("settle")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("\"from\": \"C\""))
        .stdout(contains("\"to\": \"A\""));
}

#[test]
fn log_filters_by_participant() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = write_snapshot(&sample());
    cli(&home)
        .args(["log"])
        .arg(&path)
        .args(["--participant", "B", "--from", "2025-01-11"])
        .assert()
        .success()
        .stdout(contains("\"type\": \"settlement\""))
        .stdout(contains("Dinner").not());
}

#[test]
fn materialize_write_updates_file() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = write_snapshot(&sample());
    cli(&home)
        .arg("materialize")
        .arg(&path)
        .args(["--now", "2025-02-20T09:00:00Z", "--write"])
        .assert()
        .success()
        .stdout(contains("Rent"));

    let saved = persistence::load_snapshot_from_file(&path).unwrap();
    assert_eq!(saved.expenses.len(), 2);
    assert_eq!(saved.expenses[1].date, at(2025, 2, 15));
}

#[test]
fn snapshot_without_participants_is_seeded_with_default_names() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.json");
    let expenses = vec![equal_expense(
        "Taxi",
        dec!(70),
        "Friend 1",
        &["Friend 1", "Friend 2"],
        at(2025, 3, 4),
    )];
    // No `participants` key at all.
    let json = serde_json::json!({ "expenses": expenses });
    std::fs::write(&path, json.to_string()).unwrap();

    cli(&home)
        .arg("balances")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("\"participant\": \"Friend 1\""))
        .stdout(contains("\"participant\": \"Friend 7\""))
        .stdout(contains("\"-35\""));
}

#[test]
fn unknown_command_fails_with_usage() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = write_snapshot(&sample());
    cli(&home)
        .arg("explode")
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("Unknown command"))
        .stderr(contains("Usage"));
}

#[test]
fn missing_snapshot_fails() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["balances", "/nonexistent/ledger.json"])
        .assert()
        .failure()
        .stderr(contains("Error:"));
}
