//! Ledger entry models and the balance, settlement, recurring and query engines.

pub mod balance;
pub mod calendar;
pub mod expense;
pub mod money;
pub mod participant;
pub mod query;
pub mod recurring;
pub mod settlement;
pub mod simplify;

pub use balance::{
    compute_balances, fold_balances, summarize, Balances, LedgerSummary, ParticipantBalance,
    Standing,
};
pub use calendar::MonthKey;
pub use expense::{Expense, ExpensePayload, Payment, Split, SplitType};
pub use participant::{Participant, ParticipantRegistry};
pub use query::{
    category_totals, expenses_by_date, monthly_balances, monthly_summary, transaction_log,
    CategoryTotal, EntryFilter, LedgerEntry, MonthlySummary,
};
pub use recurring::{materialize_due, CatchUpPolicy, Materialized, RecurringTemplate};
pub use settlement::Settlement;
pub use simplify::{simplify, SettlementPlan, Transfer, UnbalancedLedger};
