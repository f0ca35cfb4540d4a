//! Domain models for income and spending records.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{common::*, money::Money};

/// Stable identity of a record inside one store. Assigned from a monotonically
/// increasing counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One income or spending event as it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub category: String,
    pub amount: Money,
    #[serde(with = "crate::common::timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub comment: String,
}

impl Transaction {
    pub fn new(
        kind: RecordKind,
        category: impl Into<String>,
        amount: Money,
        timestamp: NaiveDateTime,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            timestamp,
            comment: comment.into(),
        }
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Money {
        self.amount
    }
}

/// A transaction held by a store together with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    transaction: Transaction,
}

impl Record {
    pub fn new(id: RecordId, transaction: Transaction) -> Self {
        Self { id, transaction }
    }

    pub fn kind(&self) -> RecordKind {
        self.transaction.kind
    }

    pub fn category(&self) -> &str {
        &self.transaction.category
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.transaction.timestamp
    }

    pub fn comment(&self) -> &str {
        &self.transaction.comment
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }
}

impl Identifiable for Record {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Amounted for Record {
    fn amount(&self) -> Money {
        self.transaction.amount
    }
}
