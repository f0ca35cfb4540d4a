use std::sync::Arc;

use tracing::{debug, warn};
use tracker_domain::{
    Amounted, CategoryRemoval, CategorySet, DomainError, Identifiable, LedgerSnapshot, Money,
    Record, RecordId, RecordKind, Transaction,
};

use crate::{time::Clock, CoreError, SystemClock};

/// Aggregate sums over the store. `balance` is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub income: Money,
    pub spending: Money,
    pub balance: Money,
}

/// Authoritative in-memory ledger: both record collections, both category
/// sets, and the running totals.
///
/// Every mutation validates first and touches state only once validation has
/// passed, so `total_income`/`total_spending` always equal the sum of the
/// corresponding record amounts. Persistence is the caller's concern.
pub struct LedgerStore {
    income: Vec<Record>,
    spending: Vec<Record>,
    income_categories: CategorySet,
    spending_categories: CategorySet,
    total_income: Money,
    total_spending: Money,
    next_id: u64,
    clock: Arc<dyn Clock>,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl LedgerStore {
    /// Empty store with the default categories and zero totals.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let empty = LedgerSnapshot::default();
        Self {
            income: Vec::new(),
            spending: Vec::new(),
            income_categories: empty.income_categories,
            spending_categories: empty.spending_categories,
            total_income: Money::ZERO,
            total_spending: Money::ZERO,
            next_id: 1,
            clock,
        }
    }

    /// Builds a store from a persisted snapshot, numbering records in order.
    ///
    /// Totals are recomputed from the records; a sum outside the cent range
    /// is reported as a read failure.
    pub fn from_snapshot(
        snapshot: LedgerSnapshot,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CoreError> {
        let LedgerSnapshot {
            income,
            spending,
            income_categories,
            spending_categories,
            total_income,
            total_spending,
        } = snapshot;

        let mut next_id = 1;
        let mut number = |rows: Vec<Transaction>| -> Vec<Record> {
            rows.into_iter()
                .map(|txn| {
                    let record = Record::new(RecordId(next_id), txn);
                    next_id += 1;
                    record
                })
                .collect()
        };
        let income = number(income);
        let spending = number(spending);

        let store = Self {
            total_income: record_sum(RecordKind::Income, &income)?,
            total_spending: record_sum(RecordKind::Spending, &spending)?,
            income,
            spending,
            income_categories,
            spending_categories,
            next_id,
            clock,
        };
        if store.total_income != total_income || store.total_spending != total_spending {
            warn!(
                snapshot_income = %total_income,
                snapshot_spending = %total_spending,
                "snapshot totals disagree with its records; using record sums"
            );
        }
        Ok(store)
    }

    /// Copy of the full state without record ids.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let strip = |records: &[Record]| -> Vec<Transaction> {
            records.iter().map(|record| record.transaction().clone()).collect()
        };
        LedgerSnapshot {
            income: strip(&self.income),
            spending: strip(&self.spending),
            income_categories: self.income_categories.clone(),
            spending_categories: self.spending_categories.clone(),
            total_income: self.total_income,
            total_spending: self.total_spending,
        }
    }

    /// Records `amount` under `category` stamped with the current time.
    pub fn add_record(
        &mut self,
        kind: RecordKind,
        category: &str,
        amount: Money,
        comment: &str,
    ) -> Result<RecordId, CoreError> {
        if !amount.is_positive() {
            return Err(CoreError::InvalidAmount(format!(
                "{amount} must be greater than zero"
            )));
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(CoreError::InvalidCategory("category must not be blank".into()));
        }
        let total = self
            .total(kind)
            .checked_add(amount)
            .ok_or_else(|| CoreError::InvalidAmount("total would overflow".into()))?;

        let id = RecordId(self.next_id);
        self.next_id += 1;
        let txn = Transaction::new(
            kind,
            category,
            amount,
            self.clock.now_seconds(),
            comment.trim(),
        );
        self.records_mut(kind).push(Record::new(id, txn));
        *self.total_mut(kind) = total;
        debug!(%kind, %id, %amount, "record added");
        Ok(id)
    }

    /// Parses `amount_text` as entered in a form, then adds the record.
    pub fn add_record_text(
        &mut self,
        kind: RecordKind,
        category: &str,
        amount_text: &str,
        comment: &str,
    ) -> Result<RecordId, CoreError> {
        let amount: Money = amount_text.parse()?;
        self.add_record(kind, category, amount, comment)
    }

    pub fn delete_record(&mut self, kind: RecordKind, id: RecordId) -> Result<(), CoreError> {
        let records = self.records_mut(kind);
        let position = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(CoreError::RecordNotFound { kind, id })?;
        let removed = records.remove(position);
        *self.total_mut(kind) -= removed.amount();
        debug!(%kind, %id, amount = %removed.amount(), "record deleted");
        Ok(())
    }

    /// Adds a label to the kind's category set; `false` for blanks and duplicates.
    pub fn add_category(&mut self, kind: RecordKind, label: &str) -> bool {
        let added = self.categories_mut(kind).insert(label);
        if added {
            debug!(%kind, label = label.trim(), "category added");
        }
        added
    }

    /// Removes a label; `false` when it is the last label or absent.
    pub fn remove_category(&mut self, kind: RecordKind, label: &str) -> bool {
        self.try_remove_category(kind, label).is_ok()
    }

    /// Like [`remove_category`](Self::remove_category) but reports the reason.
    /// Records already using the label keep it.
    pub fn try_remove_category(&mut self, kind: RecordKind, label: &str) -> Result<(), CoreError> {
        match self.categories_mut(kind).try_remove(label) {
            Ok(()) => {
                debug!(%kind, label = label.trim(), "category removed");
                Ok(())
            }
            Err(CategoryRemoval::LastLabel) => Err(CoreError::EmptyCategorySetViolation(kind)),
            Err(CategoryRemoval::NotPresent) => Err(CoreError::CategoryNotFound {
                kind,
                label: label.trim().to_string(),
            }),
        }
    }

    pub fn totals(&self) -> Totals {
        Totals {
            income: self.total_income,
            spending: self.total_spending,
            balance: self.total_income - self.total_spending,
        }
    }

    /// Share of income kept as balance, in percent; `0.0` without income.
    pub fn savings_share(&self) -> f64 {
        if !self.total_income.is_positive() {
            return 0.0;
        }
        let balance = self.total_income - self.total_spending;
        balance.as_f64() / self.total_income.as_f64() * 100.0
    }

    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Income => &self.income,
            RecordKind::Spending => &self.spending,
        }
    }

    pub fn record(&self, kind: RecordKind, id: RecordId) -> Option<&Record> {
        self.records(kind).iter().find(|record| record.id() == id)
    }

    pub fn categories(&self, kind: RecordKind) -> &CategorySet {
        match kind {
            RecordKind::Income => &self.income_categories,
            RecordKind::Spending => &self.spending_categories,
        }
    }

    pub fn total(&self, kind: RecordKind) -> Money {
        match kind {
            RecordKind::Income => self.total_income,
            RecordKind::Spending => self.total_spending,
        }
    }

    pub fn record_count(&self) -> usize {
        self.income.len() + self.spending.len()
    }

    fn records_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Income => &mut self.income,
            RecordKind::Spending => &mut self.spending,
        }
    }

    fn categories_mut(&mut self, kind: RecordKind) -> &mut CategorySet {
        match kind {
            RecordKind::Income => &mut self.income_categories,
            RecordKind::Spending => &mut self.spending_categories,
        }
    }

    fn total_mut(&mut self, kind: RecordKind) -> &mut Money {
        match kind {
            RecordKind::Income => &mut self.total_income,
            RecordKind::Spending => &mut self.total_spending,
        }
    }
}

fn record_sum(kind: RecordKind, records: &[Record]) -> Result<Money, DomainError> {
    Money::checked_sum(records.iter().map(Amounted::amount))
        .ok_or(DomainError::TotalOverflow(kind))
}
