//! A consistent in-memory copy of the four ledger collections.
//!
//! Writes go through the validation gate here; every computation runs on the
//! snapshot as-is and never re-validates stored history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{LedgerError, Result};
use crate::ledger::{
    self, Balances, CatchUpPolicy, EntryFilter, Expense, ExpensePayload, LedgerEntry,
    LedgerSummary, Materialized, MonthKey, MonthlySummary, ParticipantRegistry,
    RecurringTemplate, Settlement, SettlementPlan,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub participants: ParticipantRegistry,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub settlements: Vec<Settlement>,
    #[serde(default)]
    pub recurring: Vec<RecurringTemplate>,
}

/// Records produced by one materialization pass, committed together or not at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterializationBatch {
    pub items: Vec<Materialized>,
}

impl MaterializationBatch {
    pub fn expenses(&self) -> impl Iterator<Item = &Expense> {
        self.items.iter().map(|item| &item.new_expense)
    }

    /// Final template states; later entries for the same template win.
    pub fn templates(&self) -> Vec<&RecurringTemplate> {
        let mut latest: Vec<&RecurringTemplate> = Vec::new();
        for item in &self.items {
            let template = &item.updated_template;
            match latest.iter_mut().find(|t| t.id == template.id) {
                Some(slot) => *slot = template,
                None => latest.push(template),
            }
        }
        latest
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LedgerSnapshot {
    pub fn new(participants: ParticipantRegistry) -> Self {
        Self {
            participants,
            ..Self::default()
        }
    }

    /// An empty ledger whose registry is seeded from the configured names.
    pub fn seeded(config: &Config) -> Self {
        Self::new(config.seed_registry())
    }

    /// Fills an empty registry with the configured default names.
    pub fn ensure_participants(&mut self, config: &Config) -> bool {
        if !self.participants.is_empty() {
            return false;
        }
        self.participants = config.seed_registry();
        tracing::debug!(
            participants = self.participants.len(),
            "seeded participant registry from config"
        );
        true
    }

    /// Normalises and validates `payload`, then appends it as a dated expense.
    pub fn record_expense(&mut self, payload: ExpensePayload, date: DateTime<Utc>) -> Result<Uuid> {
        let payload = payload.normalized();
        payload.validate(&self.participants)?;
        let expense = Expense::new(payload, date);
        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    /// Replaces the payload and date of an existing expense after validation.
    pub fn update_expense(
        &mut self,
        id: Uuid,
        payload: ExpensePayload,
        date: DateTime<Utc>,
    ) -> Result<()> {
        let payload = payload.normalized();
        payload.validate(&self.participants)?;
        let expense = self
            .expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(LedgerError::UnknownExpense(id))?;
        expense.payload = payload;
        expense.date = date;
        Ok(())
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let position = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(position))
    }

    pub fn record_settlement(&mut self, settlement: Settlement) -> Result<Uuid> {
        settlement.validate(&self.participants)?;
        let id = settlement.id;
        self.settlements.push(settlement);
        Ok(id)
    }

    pub fn record_template(&mut self, mut template: RecurringTemplate) -> Result<Uuid> {
        template.payload = template.payload.normalized();
        template.validate(&self.participants)?;
        let id = template.id;
        self.recurring.push(template);
        Ok(id)
    }

    pub fn balances(&self) -> Balances {
        ledger::compute_balances(&self.participants, &self.expenses, &self.settlements)
    }

    pub fn summary(&self) -> LedgerSummary {
        ledger::summarize(&self.participants, &self.expenses, &self.settlements)
    }

    pub fn settlement_plan(&self) -> SettlementPlan {
        ledger::simplify(&self.balances())
    }

    pub fn log(&self, filter: &EntryFilter) -> Vec<LedgerEntry<'_>> {
        ledger::transaction_log(&self.expenses, &self.settlements, filter)
    }

    pub fn monthly_summary(&self, month: MonthKey) -> MonthlySummary {
        ledger::monthly_summary(&self.participants, &self.expenses, &self.settlements, month)
    }

    /// Computes, without applying, everything due as of `now`.
    pub fn materialize(&self, now: DateTime<Utc>, policy: CatchUpPolicy) -> MaterializationBatch {
        MaterializationBatch {
            items: ledger::materialize_due(&self.recurring, now, policy),
        }
    }

    /// Appends the batch's expenses and stores its template updates.
    ///
    /// Every referenced template must exist; otherwise nothing is applied.
    pub fn apply_batch(&mut self, batch: MaterializationBatch) -> Result<usize> {
        let templates = batch.templates();
        let mut positions = Vec::with_capacity(templates.len());
        for template in &templates {
            let position = self
                .recurring
                .iter()
                .position(|existing| existing.id == template.id)
                .ok_or(LedgerError::UnknownTemplate(template.id))?;
            positions.push(position);
        }
        for (position, template) in positions.into_iter().zip(templates) {
            self.recurring[position] = template.clone();
        }
        let created = batch.len();
        self.expenses
            .extend(batch.items.into_iter().map(|item| item.new_expense));
        tracing::info!(created, "applied materialization batch");
        Ok(created)
    }
}
