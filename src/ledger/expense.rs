use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::{self, PERCENT_TOLERANCE};
use super::participant::ParticipantRegistry;
use crate::errors::ExpenseIssue;

/// How an expense's cost is allocated among its splitters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SplitType {
    #[serde(rename = "equally")]
    Equally,
    #[serde(rename = "percentage", alias = "byPercentage")]
    ByPercentage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    #[serde(alias = "friend")]
    pub participant: String,
    pub amount: Decimal,
}

impl Payment {
    pub fn new(participant: impl Into<String>, amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Split {
    #[serde(alias = "friend")]
    pub participant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

impl Split {
    pub fn equal(participant: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            percentage: None,
        }
    }

    pub fn percent(participant: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            participant: participant.into(),
            percentage: Some(percentage),
        }
    }
}

/// The dated-independent body of an expense, shared with recurring templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    pub description: String,
    pub total_amount: Decimal,
    pub split_type: SplitType,
    #[serde(default)]
    pub paid_by: Vec<Payment>,
    #[serde(default)]
    pub splits: Vec<Split>,
}

impl ExpensePayload {
    pub fn equally<I, S>(
        description: impl Into<String>,
        total_amount: Decimal,
        paid_by: Vec<Payment>,
        splitters: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            total_amount,
            split_type: SplitType::Equally,
            paid_by,
            splits: splitters.into_iter().map(Split::equal).collect(),
        }
    }

    pub fn by_percentage<I, S>(
        description: impl Into<String>,
        total_amount: Decimal,
        paid_by: Vec<Payment>,
        splits: I,
    ) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            total_amount,
            split_type: SplitType::ByPercentage,
            paid_by,
            splits: splits
                .into_iter()
                .map(|(participant, pct)| Split::percent(participant, pct))
                .collect(),
        }
    }

    /// Drops zero payments and zero-percentage splits, trims the description.
    pub fn normalized(mut self) -> Self {
        self.description = self.description.trim().to_string();
        self.paid_by.retain(|payment| payment.amount > Decimal::ZERO);
        if self.split_type == SplitType::ByPercentage {
            self.splits
                .retain(|split| split.percentage.map_or(true, |pct| pct > Decimal::ZERO));
        }
        self
    }

    /// Write-boundary validation. Stored entries are never re-validated.
    pub fn validate(&self, registry: &ParticipantRegistry) -> Result<(), ExpenseIssue> {
        if self.description.trim().is_empty() {
            return Err(ExpenseIssue::MissingDescription);
        }
        if self.total_amount <= Decimal::ZERO {
            return Err(ExpenseIssue::NonPositiveTotal(self.total_amount));
        }
        for payment in &self.paid_by {
            if payment.amount < Decimal::ZERO {
                return Err(ExpenseIssue::NegativePayment {
                    participant: payment.participant.clone(),
                    amount: payment.amount,
                });
            }
            if !registry.contains(&payment.participant) {
                return Err(ExpenseIssue::UnknownParticipant(payment.participant.clone()));
            }
        }
        let paid = self.paid_total();
        if !money::amounts_match(paid, self.total_amount) {
            return Err(ExpenseIssue::PaymentMismatch {
                paid,
                total: self.total_amount,
            });
        }
        if let Some(unknown) = self
            .splits
            .iter()
            .find(|split| !registry.contains(&split.participant))
        {
            return Err(ExpenseIssue::UnknownParticipant(unknown.participant.clone()));
        }
        match self.split_type {
            SplitType::Equally => {
                if self.splits.is_empty() {
                    return Err(ExpenseIssue::NoActiveSplitter);
                }
            }
            SplitType::ByPercentage => {
                let mut total = Decimal::ZERO;
                for split in &self.splits {
                    let pct = split
                        .percentage
                        .ok_or_else(|| ExpenseIssue::MissingPercentage(split.participant.clone()))?;
                    if pct < Decimal::ZERO {
                        return Err(ExpenseIssue::NegativePercentage(split.participant.clone()));
                    }
                    total += pct;
                }
                if (total - money::ONE_HUNDRED).abs() > PERCENT_TOLERANCE {
                    return Err(ExpenseIssue::PercentageMismatch(total));
                }
            }
        }
        Ok(())
    }

    pub fn paid_total(&self) -> Decimal {
        self.paid_by.iter().map(|payment| payment.amount).sum()
    }

    /// Registry positions credited with what they paid; unregistered payers are skipped.
    pub fn credits(&self, registry: &ParticipantRegistry) -> Vec<(usize, Decimal)> {
        self.paid_by
            .iter()
            .filter_map(|payment| {
                registry
                    .index_of(&payment.participant)
                    .map(|position| (position, payment.amount))
            })
            .collect()
    }

    /// Registry positions debited with their share of the cost.
    ///
    /// Equal shares divide the total among splitters that are still registered, so a
    /// removed participant neither pays a share nor changes anyone else's. Percentage
    /// shares apply each listed percentage as stored, even if they no longer sum to 100.
    pub fn shares(&self, registry: &ParticipantRegistry) -> Vec<(usize, Decimal)> {
        let active: Vec<(usize, &Split)> = self
            .splits
            .iter()
            .filter_map(|split| {
                registry
                    .index_of(&split.participant)
                    .map(|position| (position, split))
            })
            .collect();
        match self.split_type {
            SplitType::Equally => {
                if active.is_empty() {
                    return Vec::new();
                }
                let share = self.total_amount / Decimal::from(active.len());
                active.into_iter().map(|(position, _)| (position, share)).collect()
            }
            SplitType::ByPercentage => active
                .into_iter()
                .map(|(position, split)| {
                    let pct = split.percentage.unwrap_or(Decimal::ZERO);
                    (position, money::percent_of(self.total_amount, pct))
                })
                .collect(),
        }
    }

    /// Whether `name` paid toward or shares in this expense.
    pub fn involves(&self, name: &str) -> bool {
        self.paid_by.iter().any(|p| p.participant == name)
            || self.splits.iter().any(|s| s.participant == name)
    }

    /// Grouping key for categorized totals: trimmed and case-folded description.
    pub fn category_key(&self) -> String {
        self.description.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: ExpensePayload,
}

impl Expense {
    pub fn new(payload: ExpensePayload, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            payload,
        }
    }

    pub fn total_amount(&self) -> Decimal {
        self.payload.total_amount
    }

    pub fn description(&self) -> &str {
        &self.payload.description
    }

    pub fn validate(&self, registry: &ParticipantRegistry) -> Result<(), ExpenseIssue> {
        self.payload.validate(registry)
    }
}
