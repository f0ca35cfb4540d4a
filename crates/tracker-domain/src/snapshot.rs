//! Full, id-free ledger state exchanged with persistence backends.

use serde::{Deserialize, Serialize};

use crate::{
    category::CategorySet, common::RecordKind, error::DomainError, money::Money,
    record::Transaction,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub income: Vec<Transaction>,
    pub spending: Vec<Transaction>,
    pub income_categories: CategorySet,
    pub spending_categories: CategorySet,
    pub total_income: Money,
    pub total_spending: Money,
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self {
            income: Vec::new(),
            spending: Vec::new(),
            income_categories: CategorySet::seeded(RecordKind::Income),
            spending_categories: CategorySet::seeded(RecordKind::Spending),
            total_income: Money::ZERO,
            total_spending: Money::ZERO,
        }
    }
}

impl LedgerSnapshot {
    /// Rebuilds a snapshot from persisted rows: records are split by kind,
    /// totals accumulated, and category sets derived from the labels in use.
    /// Fails when a kind's total leaves the representable range.
    pub fn from_transactions<I>(rows: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Transaction>,
    {
        let mut income = Vec::new();
        let mut spending = Vec::new();
        for row in rows {
            match row.kind {
                RecordKind::Income => income.push(row),
                RecordKind::Spending => spending.push(row),
            }
        }
        let total_income = total_of(RecordKind::Income, &income)?;
        let total_spending = total_of(RecordKind::Spending, &spending)?;
        let income_categories =
            CategorySet::from_labels(RecordKind::Income, income.iter().map(|txn| &txn.category));
        let spending_categories = CategorySet::from_labels(
            RecordKind::Spending,
            spending.iter().map(|txn| &txn.category),
        );
        Ok(Self {
            income,
            spending,
            income_categories,
            spending_categories,
            total_income,
            total_spending,
        })
    }

    pub fn records(&self, kind: RecordKind) -> &[Transaction] {
        match kind {
            RecordKind::Income => &self.income,
            RecordKind::Spending => &self.spending,
        }
    }

    pub fn categories(&self, kind: RecordKind) -> &CategorySet {
        match kind {
            RecordKind::Income => &self.income_categories,
            RecordKind::Spending => &self.spending_categories,
        }
    }

    /// Rows in persistence order: every income record, then every spending record.
    pub fn rows(&self) -> impl Iterator<Item = &Transaction> {
        self.income.iter().chain(self.spending.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.spending.is_empty()
    }
}

fn total_of(kind: RecordKind, rows: &[Transaction]) -> Result<Money, DomainError> {
    Money::checked_sum(rows.iter().map(|txn| txn.amount))
        .ok_or(DomainError::TotalOverflow(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::parse_timestamp;

    fn txn(kind: RecordKind, category: &str, cents: i64) -> Transaction {
        Transaction::new(
            kind,
            category,
            Money::from_cents(cents),
            parse_timestamp("2024-05-01 09:00:00").unwrap(),
            "",
        )
    }

    #[test]
    fn from_transactions_derives_totals_and_categories() {
        let snapshot = LedgerSnapshot::from_transactions(vec![
            txn(RecordKind::Spending, "Rent", 90_000),
            txn(RecordKind::Income, "Freelance", 50_000),
            txn(RecordKind::Spending, "Food", 1_250),
            txn(RecordKind::Spending, "Rent", 90_000),
        ])
        .unwrap();

        assert_eq!(snapshot.total_income, Money::from_cents(50_000));
        assert_eq!(snapshot.total_spending, Money::from_cents(181_250));
        assert_eq!(snapshot.income_categories.labels(), ["Freelance"]);
        assert_eq!(snapshot.spending_categories.labels(), ["Rent", "Food"]);
        assert_eq!(snapshot.rows().count(), 4);
        assert_eq!(snapshot.rows().next().map(|row| row.kind), Some(RecordKind::Income));
    }

    #[test]
    fn empty_rows_give_default_snapshot() {
        assert_eq!(
            LedgerSnapshot::from_transactions(Vec::new()).unwrap(),
            LedgerSnapshot::default()
        );
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let half = i64::MAX / 2 + 1;
        let err = LedgerSnapshot::from_transactions(vec![
            txn(RecordKind::Spending, "Food", 10),
            txn(RecordKind::Income, "Salary", half),
            txn(RecordKind::Income, "Salary", half),
        ])
        .unwrap_err();
        assert_eq!(err, DomainError::TotalOverflow(RecordKind::Income));
        assert_eq!(err.to_string(), "Income total exceeds the supported range");
    }
}
