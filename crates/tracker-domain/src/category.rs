//! Ordered, never-empty sets of category labels.

use serde::{Deserialize, Serialize};

use crate::common::RecordKind;

/// Why a label could not be removed from a [`CategorySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRemoval {
    LastLabel,
    NotPresent,
}

/// Labels offered for new records of one kind, in insertion order.
///
/// The set always holds at least one label. Labels are compared after
/// trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl CategorySet {
    /// Set seeded with the default label for `kind`.
    pub fn seeded(kind: RecordKind) -> Self {
        Self {
            labels: vec![kind.default_category().to_string()],
        }
    }

    /// Builds a set from labels in first-observed order, falling back to the
    /// default for `kind` when no usable label is supplied.
    pub fn from_labels<I, S>(kind: RecordKind, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self { labels: Vec::new() };
        for label in labels {
            set.insert(label.as_ref());
        }
        if set.labels.is_empty() {
            Self::seeded(kind)
        } else {
            set
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        let needle = label.trim();
        self.labels.iter().any(|existing| existing == needle)
    }

    /// Appends `label` unless it is blank or already present.
    pub fn insert(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.labels.push(label.to_string());
        true
    }

    /// Removes `label` unless it is the only one left.
    pub fn try_remove(&mut self, label: &str) -> Result<(), CategoryRemoval> {
        if self.labels.len() <= 1 {
            return Err(CategoryRemoval::LastLabel);
        }
        let needle = label.trim();
        let position = self
            .labels
            .iter()
            .position(|existing| existing == needle)
            .ok_or(CategoryRemoval::NotPresent)?;
        self.labels.remove(position);
        Ok(())
    }
}
