//! Read-only views over the merged expense and settlement stream.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::balance::{fold_balances, Balances};
use super::calendar::{self, MonthKey};
use super::expense::Expense;
use super::participant::ParticipantRegistry;
use super::settlement::Settlement;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEntry<'a> {
    Expense(&'a Expense),
    Settlement(&'a Settlement),
}

impl LedgerEntry<'_> {
    pub fn id(&self) -> Uuid {
        match self {
            LedgerEntry::Expense(expense) => expense.id,
            LedgerEntry::Settlement(settlement) => settlement.id,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            LedgerEntry::Expense(expense) => expense.date,
            LedgerEntry::Settlement(settlement) => settlement.date,
        }
    }

    /// Expenses involve their payers and splitters; settlements both parties.
    pub fn involves(&self, name: &str) -> bool {
        match self {
            LedgerEntry::Expense(expense) => expense.payload.involves(name),
            LedgerEntry::Settlement(settlement) => settlement.involves(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub participant: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn participant(mut self, name: impl Into<String>) -> Self {
        self.participant = Some(name.into());
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// The end bound covers its whole day.
    pub fn matches(&self, entry: &LedgerEntry<'_>) -> bool {
        if let Some(name) = &self.participant {
            if !entry.involves(name) {
                return false;
            }
        }
        let date = entry.date();
        if let Some(from) = self.from {
            if date < calendar::start_of_day(from) {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date >= calendar::end_of_day_exclusive(to) {
                return false;
            }
        }
        true
    }
}

/// Expenses and settlements merged, filtered, newest first.
///
/// Entries sharing a date keep expenses ahead of settlements, each in input order.
pub fn transaction_log<'a>(
    expenses: &'a [Expense],
    settlements: &'a [Settlement],
    filter: &EntryFilter,
) -> Vec<LedgerEntry<'a>> {
    let mut entries: Vec<LedgerEntry<'a>> = expenses
        .iter()
        .map(LedgerEntry::Expense)
        .chain(settlements.iter().map(LedgerEntry::Settlement))
        .filter(|entry| filter.matches(entry))
        .collect();
    entries.sort_by(|a, b| b.date().cmp(&a.date()));
    entries
}

pub fn expenses_by_date(expenses: &[Expense]) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total_expenditure: Decimal,
    pub categories: Vec<CategoryTotal>,
    pub balances: Balances,
}

/// Totals per trimmed, case-folded description, in first-appearance order.
pub fn category_totals(expenses: &[Expense], month: MonthKey) -> Vec<CategoryTotal> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses.iter().filter(|e| month.contains(e.date)) {
        let key = expense.payload.category_key();
        match positions.get(&key) {
            Some(&position) => totals[position].total += expense.total_amount(),
            None => {
                positions.insert(key.clone(), totals.len());
                totals.push(CategoryTotal {
                    category: key,
                    total: expense.total_amount(),
                });
            }
        }
    }
    totals
}

pub fn monthly_balances(
    registry: &ParticipantRegistry,
    expenses: &[Expense],
    settlements: &[Settlement],
    month: MonthKey,
) -> Balances {
    fold_balances(
        registry,
        expenses.iter().filter(|e| month.contains(e.date)),
        settlements.iter().filter(|s| month.contains(s.date)),
    )
}

pub fn monthly_summary(
    registry: &ParticipantRegistry,
    expenses: &[Expense],
    settlements: &[Settlement],
    month: MonthKey,
) -> MonthlySummary {
    let total_expenditure = expenses
        .iter()
        .filter(|e| month.contains(e.date))
        .map(Expense::total_amount)
        .sum();
    MonthlySummary {
        month,
        total_expenditure,
        categories: category_totals(expenses, month),
        balances: monthly_balances(registry, expenses, settlements, month),
    }
}
