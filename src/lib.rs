#![doc(test(attr(deny(warnings))))]

//! Budget Tracker is an interactive shell over a personal income and spending
//! ledger persisted to a CSV file.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Budget Tracker tracing initialized.");
    });
}
