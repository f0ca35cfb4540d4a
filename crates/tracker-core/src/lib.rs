//! tracker-core
//!
//! Bookkeeping engine for the budget tracker: the ledger store, the storage
//! abstraction, the save-after-every-mutation session, and summaries.
//! Depends on tracker-domain. No CLI, no terminal I/O, no file formats.

pub mod error;
pub mod ledger_store;
pub mod session;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use error::CoreError;
pub use ledger_store::*;
pub use session::*;
pub use storage::LedgerStorage;
pub use summary_service::*;
pub use time::{Clock, SystemClock};

#[cfg(test)]
mod tests;
