//! Turns net balances into the transfers that settle the group.
//!
//! Debtors and creditors are matched head-to-head in the order the balances were
//! given. Each transfer retires at least one side, so `n` unsettled balances need at
//! most `n - 1` transfers. Queue order is never re-sorted by magnitude, which keeps the
//! output deterministic for a given registry order.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::Balances;
use super::money;
use super::participant::Participant;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transfer {
    pub from: Participant,
    pub to: Participant,
    pub amount: Decimal,
}

/// Balance left over after one side of the matching ran dry.
///
/// Only produced when the input balances do not sum to zero, which means the
/// stored entries are inconsistent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnbalancedLedger {
    pub leftover: Vec<(Participant, Decimal)>,
}

impl UnbalancedLedger {
    pub fn total(&self) -> Decimal {
        self.leftover.iter().map(|(_, amount)| *amount).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettlementPlan {
    pub transfers: Vec<Transfer>,
    /// Set only when the input balances themselves do not sum to zero. Balances within
    /// the tolerance are never queued, so on a consistent ledger their dust stays with
    /// the last queued participant after the transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual: Option<UnbalancedLedger>,
}

impl SettlementPlan {
    pub fn owed_to<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transfer> + 'a {
        self.transfers.iter().filter(move |t| t.to.name() == name)
    }

    pub fn owed_by<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transfer> + 'a {
        self.transfers.iter().filter(move |t| t.from.name() == name)
    }

    pub fn is_balanced(&self) -> bool {
        self.residual.is_none()
    }
}

struct Position {
    participant: Participant,
    remaining: Decimal,
}

pub fn simplify(balances: &Balances) -> SettlementPlan {
    let mut debtors: VecDeque<Position> = VecDeque::new();
    let mut creditors: VecDeque<Position> = VecDeque::new();

    for entry in balances {
        if entry.balance < -money::AMOUNT_TOLERANCE {
            debtors.push_back(Position {
                participant: entry.participant.clone(),
                remaining: -entry.balance,
            });
        } else if entry.balance > money::AMOUNT_TOLERANCE {
            creditors.push_back(Position {
                participant: entry.participant.clone(),
                remaining: entry.balance,
            });
        }
    }

    let mut transfers = Vec::new();
    while let (Some(debtor), Some(creditor)) = (debtors.front_mut(), creditors.front_mut()) {
        let amount = debtor.remaining.min(creditor.remaining);
        transfers.push(Transfer {
            from: debtor.participant.clone(),
            to: creditor.participant.clone(),
            amount,
        });
        debtor.remaining -= amount;
        creditor.remaining -= amount;

        let debtor_done = money::is_negligible(debtor.remaining);
        let creditor_done = money::is_negligible(creditor.remaining);
        if debtor_done {
            debtors.pop_front();
        }
        if creditor_done {
            creditors.pop_front();
        }
    }

    let leftover: Vec<(Participant, Decimal)> = debtors
        .into_iter()
        .map(|p| (p.participant, -p.remaining))
        .chain(creditors.into_iter().map(|p| (p.participant, p.remaining)))
        .collect();

    // Leftovers from a zero-sum input are dust that was below the tolerance on entry.
    let consistent = money::amounts_match(balances.total(), Decimal::ZERO);
    let residual = if leftover.is_empty() || consistent {
        None
    } else {
        let report = UnbalancedLedger { leftover };
        tracing::warn!(
            residual = %report.total(),
            participants = report.leftover.len(),
            "balances do not sum to zero; settlement plan is incomplete"
        );
        Some(report)
    };

    SettlementPlan {
        transfers,
        residual,
    }
}
