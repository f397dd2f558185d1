#![doc(test(attr(deny(warnings))))]

//! Split Ledger tracks shared expenses among a group of participants, derives
//! per-participant balances, and plans the transfers that settle the group.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod snapshot;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing with an optional extra filter directive.
pub fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::info!("Split Ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
