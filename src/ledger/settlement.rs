use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::participant::ParticipantRegistry;
use crate::errors::LedgerError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settlement {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl Settlement {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Decimal,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.into(),
            to: to.into(),
            amount,
            date,
        }
    }

    pub fn validate(&self, registry: &ParticipantRegistry) -> Result<(), LedgerError> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidSettlement(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if self.from == self.to {
            return Err(LedgerError::InvalidSettlement(
                "payer and payee cannot be the same person".into(),
            ));
        }
        for name in [&self.from, &self.to] {
            if !registry.contains(name) {
                return Err(LedgerError::InvalidSettlement(format!(
                    "`{name}` is not a registered participant"
                )));
            }
        }
        Ok(())
    }

    pub fn involves(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}
