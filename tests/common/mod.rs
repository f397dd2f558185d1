#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use split_ledger::{
    ledger::{Expense, ExpensePayload, ParticipantRegistry, Payment, RecurringTemplate, Settlement},
    snapshot::LedgerSnapshot,
    utils::persistence,
};
use tempfile::TempDir;

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn registry(names: &[&str]) -> ParticipantRegistry {
    ParticipantRegistry::from_names(names.iter().copied())
}

/// An expense fully paid by `payer` and shared equally by `splitters`.
pub fn equal_expense(
    description: &str,
    total: Decimal,
    payer: &str,
    splitters: &[&str],
    date: DateTime<Utc>,
) -> Expense {
    Expense::new(
        ExpensePayload::equally(
            description,
            total,
            vec![Payment::new(payer, total)],
            splitters.iter().copied(),
        ),
        date,
    )
}

pub fn percent_expense(
    description: &str,
    total: Decimal,
    payer: &str,
    splits: &[(&str, Decimal)],
    date: DateTime<Utc>,
) -> Expense {
    Expense::new(
        ExpensePayload::by_percentage(
            description,
            total,
            vec![Payment::new(payer, total)],
            splits.iter().copied(),
        ),
        date,
    )
}

pub fn settlement(from: &str, to: &str, amount: Decimal, date: DateTime<Utc>) -> Settlement {
    Settlement::new(from, to, amount, date)
}

pub fn monthly_template(
    description: &str,
    total: Decimal,
    payer: &str,
    splitters: &[&str],
    day_of_month: u32,
    last_posted: DateTime<Utc>,
) -> RecurringTemplate {
    RecurringTemplate::new(
        ExpensePayload::equally(
            description,
            total,
            vec![Payment::new(payer, total)],
            splitters.iter().copied(),
        ),
        day_of_month,
        last_posted,
    )
}

/// Writes `snapshot` into a fresh temp dir; keep the guard alive for the test.
pub fn write_snapshot(snapshot: &LedgerSnapshot) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("ledger.json");
    persistence::save_snapshot_to_file(snapshot, &path).expect("write snapshot");
    (dir, path)
}
