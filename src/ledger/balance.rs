//! Folds expenses and settlements into a signed net balance per participant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::expense::Expense;
use super::money;
use super::participant::{Participant, ParticipantRegistry};
use super::settlement::Settlement;

/// Net position of a single participant. Positive means the group owes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantBalance {
    pub participant: Participant,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "standing", content = "amount", rename_all = "snake_case")]
pub enum Standing {
    Owed(Decimal),
    Owes(Decimal),
    Settled,
}

impl Standing {
    pub fn of(balance: Decimal) -> Self {
        if money::is_negligible(balance) {
            Standing::Settled
        } else if balance > Decimal::ZERO {
            Standing::Owed(balance)
        } else {
            Standing::Owes(balance.abs())
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Balances {
    entries: Vec<ParticipantBalance>,
}

impl Balances {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Participant, Decimal)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(participant, balance)| ParticipantBalance {
                    participant,
                    balance,
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|entry| entry.participant.name() == name)
            .map(|entry| entry.balance)
    }

    pub fn standing(&self, name: &str) -> Option<Standing> {
        self.get(name).map(Standing::of)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantBalance> {
        self.entries.iter()
    }

    /// Sum of all balances; zero within tolerance for a consistent ledger.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|entry| entry.balance).sum()
    }

    /// Number of balances outside the settlement tolerance.
    pub fn unsettled_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !money::is_negligible(entry.balance))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = &'a ParticipantBalance;
    type IntoIter = std::slice::Iter<'a, ParticipantBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSummary {
    pub total_expense: Decimal,
    pub balances: Balances,
}

/// Computes every registered participant's balance from the full entry set.
///
/// Payers are credited with what they fronted and splitters debited with their share.
/// A settlement credits its payer and debits its payee. Names that are no longer
/// registered are skipped, never reported as errors.
pub fn compute_balances(
    registry: &ParticipantRegistry,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Balances {
    fold_balances(registry, expenses, settlements)
}

pub fn fold_balances<'a, E, S>(
    registry: &ParticipantRegistry,
    expenses: E,
    settlements: S,
) -> Balances
where
    E: IntoIterator<Item = &'a Expense>,
    S: IntoIterator<Item = &'a Settlement>,
{
    let mut totals = vec![Decimal::ZERO; registry.len()];
    let mut skipped = 0usize;
    let mut folded = 0usize;

    for expense in expenses {
        let payload = &expense.payload;
        for (position, amount) in payload.credits(registry) {
            totals[position] += amount;
        }
        for (position, share) in payload.shares(registry) {
            totals[position] -= share;
        }
        skipped += payload
            .paid_by
            .iter()
            .filter(|payment| !registry.contains(&payment.participant))
            .count();
        folded += 1;
    }

    for settlement in settlements {
        match registry.index_of(&settlement.from) {
            Some(position) => totals[position] += settlement.amount,
            None => skipped += 1,
        }
        match registry.index_of(&settlement.to) {
            Some(position) => totals[position] -= settlement.amount,
            None => skipped += 1,
        }
        folded += 1;
    }

    if skipped > 0 {
        tracing::debug!(skipped, "ignored references to unregistered participants");
    }
    tracing::debug!(
        participants = registry.len(),
        entries = folded,
        "computed balances"
    );

    Balances::from_pairs(registry.iter().cloned().zip(totals))
}

pub fn summarize(
    registry: &ParticipantRegistry,
    expenses: &[Expense],
    settlements: &[Settlement],
) -> LedgerSummary {
    LedgerSummary {
        total_expense: expenses.iter().map(Expense::total_amount).sum(),
        balances: compute_balances(registry, expenses, settlements),
    }
}
