use tracker_domain::{Money, Record, RecordKind};

use crate::{LedgerStore, Totals};

/// One wedge of the income-vs-spending donut.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub kind: RecordKind,
    pub amount: Money,
    /// Percentage of `income + spending`.
    pub share: f64,
}

/// Data behind the "Income vs Spending" donut chart and its centre label.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutChart {
    pub slices: [ChartSlice; 2],
    pub savings: Money,
    pub savings_share: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(store: &LedgerStore) -> Totals {
        store.totals()
    }

    pub fn savings_share(store: &LedgerStore) -> f64 {
        store.savings_share()
    }

    /// Spending as a percentage of income; `0.0` without income.
    pub fn spending_share(store: &LedgerStore) -> f64 {
        let totals = store.totals();
        if !totals.income.is_positive() {
            return 0.0;
        }
        totals.spending.as_f64() / totals.income.as_f64() * 100.0
    }

    /// `None` when there is nothing to chart yet.
    pub fn donut_chart(store: &LedgerStore) -> Option<DonutChart> {
        let totals = store.totals();
        if totals.income.is_zero() && totals.spending.is_zero() {
            return None;
        }
        // Both totals may sit near `i64::MAX`; only their float sum is formed.
        let combined = totals.income.as_f64() + totals.spending.as_f64();
        let share = |amount: Money| amount.as_f64() / combined * 100.0;
        Some(DonutChart {
            slices: [
                ChartSlice {
                    kind: RecordKind::Income,
                    amount: totals.income,
                    share: share(totals.income),
                },
                ChartSlice {
                    kind: RecordKind::Spending,
                    amount: totals.spending,
                    share: share(totals.spending),
                },
            ],
            savings: totals.balance,
            savings_share: store.savings_share(),
        })
    }

    /// Records of `kind`, newest first.
    pub fn history(store: &LedgerStore, kind: RecordKind) -> Vec<&Record> {
        store.records(kind).iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donut_is_absent_for_empty_ledger() {
        let store = LedgerStore::default();
        assert!(SummaryService::donut_chart(&store).is_none());
        assert_eq!(SummaryService::spending_share(&store), 0.0);
    }

    #[test]
    fn donut_splits_combined_total() {
        let mut store = LedgerStore::default();
        store
            .add_record(RecordKind::Income, "Salary", Money::from_cents(30_000), "")
            .unwrap();
        store
            .add_record(RecordKind::Spending, "Food", Money::from_cents(10_000), "")
            .unwrap();

        let chart = SummaryService::donut_chart(&store).expect("chart data");
        assert_eq!(chart.slices[0].kind, RecordKind::Income);
        assert!((chart.slices[0].share - 75.0).abs() < 1e-9);
        assert!((chart.slices[1].share - 25.0).abs() < 1e-9);
        assert_eq!(chart.savings, Money::from_cents(20_000));
        assert!((chart.savings_share - 66.666_666_666).abs() < 1e-6);
    }

    #[test]
    fn donut_handles_totals_near_the_cent_limit() {
        let mut store = LedgerStore::default();
        let huge = Money::from_cents(9_000_000_000_000_000_000);
        store.add_record(RecordKind::Income, "Salary", huge, "").unwrap();
        store.add_record(RecordKind::Spending, "Food", huge, "").unwrap();

        let chart = SummaryService::donut_chart(&store).expect("chart data");
        assert!((chart.slices[0].share - 50.0).abs() < 1e-9);
        assert!((chart.slices[1].share - 50.0).abs() < 1e-9);
        assert_eq!(chart.savings, Money::ZERO);
        assert_eq!(chart.savings_share, 0.0);
        assert!((SummaryService::spending_share(&store) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn history_lists_newest_first() {
        let mut store = LedgerStore::default();
        let first = store
            .add_record(RecordKind::Spending, "Food", Money::from_cents(100), "first")
            .unwrap();
        let second = store
            .add_record(RecordKind::Spending, "Food", Money::from_cents(200), "second")
            .unwrap();

        let history = SummaryService::history(&store, RecordKind::Spending);
        let ids: Vec<_> = history
            .iter()
            .map(|record| tracker_domain::Identifiable::id(*record))
            .collect();
        assert_eq!(ids, vec![second, first]);
    }
}
