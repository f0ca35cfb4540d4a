//! tracker-domain
//!
//! Pure domain models for the budget tracker (records, money, categories, snapshots).
//! No I/O, no CLI, no storage. Only data types and the rules that keep them valid.

pub mod category;
pub mod common;
pub mod error;
pub mod money;
pub mod record;
pub mod snapshot;

pub use category::*;
pub use common::*;
pub use error::DomainError;
pub use money::Money;
pub use record::*;
pub use snapshot::*;
