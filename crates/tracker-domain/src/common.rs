//! Shared traits, record kinds, and timestamp helpers.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{error::DomainError, money::Money, record::RecordId};

/// Canonical textual layout for record timestamps (local time, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default category label seeded into the income set.
pub const DEFAULT_INCOME_CATEGORY: &str = "Salary";

/// Default category label seeded into the spending set.
pub const DEFAULT_SPENDING_CATEGORY: &str = "Food";

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> RecordId;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> Money;
}

/// Which side of the ledger a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Spending,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Income, RecordKind::Spending];

    /// Value written to the `type` column of the data file.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Spending => "spending",
        }
    }

    pub fn default_category(self) -> &'static str {
        match self {
            RecordKind::Income => DEFAULT_INCOME_CATEGORY,
            RecordKind::Spending => DEFAULT_SPENDING_CATEGORY,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Income => "Income",
            RecordKind::Spending => "Spending",
        };
        f.write_str(label)
    }
}

impl FromStr for RecordKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(RecordKind::Income),
            "spending" => Ok(RecordKind::Spending),
            other => Err(DomainError::UnknownKind(other.to_string())),
        }
    }
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| DomainError::InvalidTimestamp(value.to_string()))
}

/// Serde adapter keeping timestamps in [`TIMESTAMP_FORMAT`].
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Income".parse::<RecordKind>(), Ok(RecordKind::Income));
        assert_eq!(" spending ".parse::<RecordKind>(), Ok(RecordKind::Spending));
        assert!("transfer".parse::<RecordKind>().is_err());
    }

    #[test]
    fn timestamp_uses_second_precision_layout() {
        let parsed = parse_timestamp("2024-03-05 07:08:09").unwrap();
        assert_eq!(format_timestamp(parsed), "2024-03-05 07:08:09");
        assert!(parse_timestamp("2024-03-05T07:08:09").is_err());
    }
}
