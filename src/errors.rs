use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Error type that captures ledger write-boundary and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid expense: {0}")]
    InvalidExpense(#[from] ExpenseIssue),
    #[error("Invalid settlement: {0}")]
    InvalidSettlement(String),
    #[error("Invalid recurring template: {0}")]
    InvalidTemplate(String),
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),
    #[error("Recurring template {0} not found")]
    UnknownTemplate(Uuid),
    #[error("Expense {0} not found")]
    UnknownExpense(Uuid),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Reasons an expense is rejected before it enters the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseIssue {
    #[error("description is required")]
    MissingDescription,
    #[error("total amount must be positive, got {0}")]
    NonPositiveTotal(Decimal),
    #[error("payments ({paid}) must add up to the total amount ({total})")]
    PaymentMismatch { paid: Decimal, total: Decimal },
    #[error("negative payment of {amount} by `{participant}`")]
    NegativePayment { participant: String, amount: Decimal },
    #[error("percentages must add up to 100%, got {0}%")]
    PercentageMismatch(Decimal),
    #[error("split for `{0}` has no percentage")]
    MissingPercentage(String),
    #[error("negative percentage for `{0}`")]
    NegativePercentage(String),
    #[error("at least one registered participant must share the cost")]
    NoActiveSplitter,
    #[error("`{0}` is not a registered participant")]
    UnknownParticipant(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
