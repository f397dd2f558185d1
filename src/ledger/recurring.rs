use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::MonthKey;
use super::expense::{Expense, ExpensePayload};
use super::participant::ParticipantRegistry;
use crate::errors::LedgerError;

/// Upper bound on periods posted for one template in a single catch-up pass.
pub const MAX_CATCH_UP_PERIODS: usize = 120;

const MIN_DAY_OF_MONTH: u32 = 1;
const MAX_DAY_OF_MONTH: u32 = 28;

/// How many overdue periods a single materialization pass posts per template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatchUpPolicy {
    /// At most one period per pass; callers re-run to catch up.
    #[default]
    SingleStep,
    /// Every missed period up to `now`, oldest first.
    AllMissed,
}

/// A monthly obligation that becomes a concrete expense once its day arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: ExpensePayload,
    pub day_of_month: u32,
    pub last_posted: DateTime<Utc>,
}

impl RecurringTemplate {
    pub fn new(payload: ExpensePayload, day_of_month: u32, last_posted: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            day_of_month,
            last_posted,
        }
    }

    /// A template created at `now`; its first posting falls in the following month.
    pub fn starting(payload: ExpensePayload, day_of_month: u32, now: DateTime<Utc>) -> Self {
        Self::new(payload, day_of_month, now)
    }

    pub fn validate(&self, registry: &ParticipantRegistry) -> Result<(), LedgerError> {
        if !(MIN_DAY_OF_MONTH..=MAX_DAY_OF_MONTH).contains(&self.day_of_month) {
            return Err(LedgerError::InvalidTemplate(format!(
                "recurring day must be between {MIN_DAY_OF_MONTH} and {MAX_DAY_OF_MONTH}, got {}",
                self.day_of_month
            )));
        }
        self.payload.validate(registry)?;
        Ok(())
    }

    /// `day_of_month` in the month after `last_posted`, at midnight UTC.
    pub fn next_post_date(&self) -> Option<DateTime<Utc>> {
        MonthKey::of(self.last_posted)
            .next()
            .day(self.day_of_month)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_post_date().is_some_and(|next| now >= next)
    }

    fn instantiate(&self, date: DateTime<Utc>) -> Expense {
        Expense::new(self.payload.clone(), date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Materialized {
    pub new_expense: Expense,
    pub updated_template: RecurringTemplate,
}

/// Posts every due template as of `now`.
///
/// Each posted template's `last_posted` advances to `now`, the materialization
/// instant, not to the posted date. Nothing is persisted here; the caller commits the
/// returned records as one batch.
pub fn materialize_due(
    templates: &[RecurringTemplate],
    now: DateTime<Utc>,
    policy: CatchUpPolicy,
) -> Vec<Materialized> {
    let mut created = Vec::new();

    for template in templates {
        let Some(first) = template.next_post_date() else {
            tracing::warn!(
                template = %template.id,
                day_of_month = template.day_of_month,
                "skipping recurring template with an impossible posting day"
            );
            continue;
        };
        if now < first {
            continue;
        }

        let mut updated = template.clone();
        updated.last_posted = now;

        let limit = match policy {
            CatchUpPolicy::SingleStep => 1,
            CatchUpPolicy::AllMissed => MAX_CATCH_UP_PERIODS,
        };
        let mut period = MonthKey::of(first);
        let mut posted = 0usize;
        while posted < limit {
            let Some(date) = period.day(template.day_of_month) else {
                break;
            };
            if now < date {
                break;
            }
            let expense = template.instantiate(date);
            tracing::info!(
                template = %template.id,
                expense = %expense.id,
                date = %date,
                "materialized recurring expense"
            );
            created.push(Materialized {
                new_expense: expense,
                updated_template: updated.clone(),
            });
            posted += 1;
            period = period.next();
        }
        let truncated = policy == CatchUpPolicy::AllMissed
            && period_overdue(period, template.day_of_month, now);
        if truncated {
            tracing::warn!(
                template = %template.id,
                "catch-up limit reached; later missed periods were skipped"
            );
        }
    }

    created
}

fn period_overdue(period: MonthKey, day_of_month: u32, now: DateTime<Utc>) -> bool {
    period.day(day_of_month).is_some_and(|date| date <= now)
}
