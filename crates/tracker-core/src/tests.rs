use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{Clock, CoreError, LedgerSession, LedgerStorage, LedgerStore, Totals};
use tracker_domain::{
    Amounted, Identifiable, LedgerSnapshot, Money, RecordId, RecordKind, Transaction,
};

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

fn clock() -> Arc<dyn Clock> {
    let at = NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_milli_opt(9, 26, 53, 589)
        .unwrap();
    Arc::new(FixedClock(at))
}

fn cents(value: i64) -> Money {
    Money::from_cents(value)
}

fn totals(income: i64, spending: i64, balance: i64) -> Totals {
    Totals {
        income: cents(income),
        spending: cents(spending),
        balance: cents(balance),
    }
}

#[derive(Default)]
struct MemoryStorage {
    saved: Mutex<Option<LedgerSnapshot>>,
    fail_writes: AtomicBool,
    fail_reads: bool,
    path: PathBuf,
}

impl LedgerStorage for Arc<MemoryStorage> {
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::PersistenceWrite("disk full".into()));
        }
        *self.saved.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<LedgerSnapshot, CoreError> {
        if self.fail_reads {
            return Err(CoreError::PersistenceRead("line 2: bad amount".into()));
        }
        Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

fn assert_totals_match_records(store: &LedgerStore) {
    for kind in RecordKind::ALL {
        let sum = Money::checked_sum(store.records(kind).iter().map(Amounted::amount));
        assert_eq!(Some(store.total(kind)), sum, "{kind} total drifted from records");
    }
}

#[test]
fn store_starts_with_default_categories_and_zero_totals() {
    let store = LedgerStore::new(clock());
    assert_eq!(store.totals(), totals(0, 0, 0));
    assert_eq!(store.categories(RecordKind::Income).labels(), ["Salary"]);
    assert_eq!(store.categories(RecordKind::Spending).labels(), ["Food"]);
}

#[test]
fn add_and_delete_scenario_keeps_totals_exact() {
    let mut store = LedgerStore::new(clock());

    store
        .add_record(RecordKind::Income, "Salary", cents(100_000), "paycheck")
        .expect("add income");
    assert_eq!(store.totals(), totals(100_000, 0, 100_000));

    let lunch = store
        .add_record(RecordKind::Spending, "Food", cents(4_550), "")
        .expect("add spending");
    assert_eq!(store.totals(), totals(100_000, 4_550, 95_450));

    store
        .delete_record(RecordKind::Spending, lunch)
        .expect("delete spending");
    assert_eq!(store.totals(), totals(100_000, 0, 100_000));
    assert!(store.records(RecordKind::Spending).is_empty());
}

#[test]
fn totals_match_records_after_every_mutation() {
    let mut store = LedgerStore::new(clock());
    let mut ids = Vec::new();
    for (i, amount) in ["0.10", "0.20", "19.99", "1000", "3,33"].iter().enumerate() {
        let kind = if i % 2 == 0 {
            RecordKind::Spending
        } else {
            RecordKind::Income
        };
        let id = store
            .add_record_text(kind, kind.default_category(), amount, "")
            .expect("valid amount");
        ids.push((kind, id));
        assert_totals_match_records(&store);
    }
    for (kind, id) in ids.into_iter().rev() {
        store.delete_record(kind, id).expect("delete");
        assert_totals_match_records(&store);
    }
    assert_eq!(store.totals(), totals(0, 0, 0));
}

#[test]
fn record_ids_are_monotonic_and_never_reused() {
    let mut store = LedgerStore::new(clock());
    let a = store
        .add_record(RecordKind::Income, "Salary", cents(1), "")
        .unwrap();
    let b = store
        .add_record(RecordKind::Spending, "Food", cents(1), "")
        .unwrap();
    store.delete_record(RecordKind::Spending, b).unwrap();
    let c = store
        .add_record(RecordKind::Spending, "Food", cents(1), "")
        .unwrap();
    assert!(a < b && b < c);
}

#[test]
fn records_are_stamped_to_the_second_and_trimmed() {
    let mut store = LedgerStore::new(clock());
    let id = store
        .add_record(RecordKind::Income, "  Bonus ", cents(500), "  quarterly  ")
        .unwrap();
    let record = store.record(RecordKind::Income, id).expect("stored");
    assert_eq!(record.category(), "Bonus");
    assert_eq!(record.comment(), "quarterly");
    assert_eq!(
        tracker_domain::format_timestamp(record.timestamp()),
        "2025-03-14 09:26:53"
    );
}

#[test]
fn invalid_amounts_are_rejected_without_mutation() {
    let mut store = LedgerStore::new(clock());
    for bad in ["0", "-5", "abc", "", "1.005"] {
        let err = store
            .add_record_text(RecordKind::Spending, "Food", bad, "")
            .expect_err("amount should be rejected");
        assert!(matches!(err, CoreError::InvalidAmount(_)), "{bad}: {err:?}");
    }
    assert!(matches!(
        store.add_record(RecordKind::Income, "Salary", cents(-1), ""),
        Err(CoreError::InvalidAmount(_))
    ));
    assert_eq!(store.record_count(), 0);
    assert_eq!(store.totals(), totals(0, 0, 0));
}

#[test]
fn add_past_the_cent_limit_leaves_store_unchanged() {
    let mut store = LedgerStore::new(clock());
    let id = store
        .add_record(RecordKind::Income, "Salary", cents(i64::MAX - 10), "")
        .expect("fits");

    let err = store
        .add_record(RecordKind::Income, "Salary", cents(11), "")
        .expect_err("total would overflow");
    assert!(matches!(err, CoreError::InvalidAmount(_)), "{err:?}");
    assert_eq!(store.records(RecordKind::Income).len(), 1);
    assert_eq!(store.totals(), totals(i64::MAX - 10, 0, i64::MAX - 10));

    store
        .add_record(RecordKind::Income, "Salary", cents(10), "")
        .expect("exactly at the limit");
    store
        .add_record(RecordKind::Spending, "Food", cents(i64::MAX), "")
        .expect("spending has its own total");
    assert_eq!(store.totals(), totals(i64::MAX, i64::MAX, 0));
    assert_totals_match_records(&store);

    let next = store
        .add_record(RecordKind::Spending, "Food", cents(1), "")
        .expect_err("spending total would overflow");
    assert!(matches!(next, CoreError::InvalidAmount(_)));
    store.delete_record(RecordKind::Income, id).unwrap();
    assert_eq!(store.totals(), totals(10, i64::MAX, 10 - i64::MAX));
}

fn overflowing_snapshot() -> LedgerSnapshot {
    let at = clock().now();
    let row = |value: i64| Transaction::new(RecordKind::Income, "Salary", cents(value), at, "");
    LedgerSnapshot {
        income: vec![row(i64::MAX / 2 + 1), row(i64::MAX / 2 + 1)],
        ..LedgerSnapshot::default()
    }
}

#[test]
fn snapshot_with_overflowing_totals_is_rejected() {
    let result = LedgerStore::from_snapshot(overflowing_snapshot(), clock());
    match result {
        Err(CoreError::PersistenceRead(message)) => {
            assert!(message.contains("Income total exceeds"), "{message}")
        }
        Err(other) => panic!("unexpected error {other:?}"),
        Ok(_) => panic!("overflowing snapshot was accepted"),
    }
}

#[test]
fn open_rejects_overflowing_snapshot() {
    let storage = Arc::new(MemoryStorage::default());
    *storage.saved.lock().unwrap() = Some(overflowing_snapshot());
    let result = LedgerSession::open(Box::new(storage), clock());
    assert!(matches!(result, Err(CoreError::PersistenceRead(_))));
}

#[test]
fn blank_category_is_rejected() {
    let mut store = LedgerStore::new(clock());
    let err = store
        .add_record(RecordKind::Income, "   ", cents(100), "")
        .expect_err("blank category");
    assert!(matches!(err, CoreError::InvalidCategory(_)));
    assert_eq!(store.record_count(), 0);
}

#[test]
fn deleting_unknown_record_reports_not_found() {
    let mut store = LedgerStore::new(clock());
    let id = store
        .add_record(RecordKind::Income, "Salary", cents(2_500), "")
        .unwrap();

    let missing = store.delete_record(RecordKind::Income, RecordId(99));
    assert!(matches!(
        missing,
        Err(CoreError::RecordNotFound { kind: RecordKind::Income, id: RecordId(99) })
    ));

    let wrong_kind = store.delete_record(RecordKind::Spending, id);
    assert!(matches!(wrong_kind, Err(CoreError::RecordNotFound { .. })));
    assert_eq!(store.totals(), totals(2_500, 0, 2_500));
}

#[test]
fn category_scenario_matches_expected_results() {
    let mut store = LedgerStore::new(clock());
    assert!(!store.remove_category(RecordKind::Income, "Salary"));
    assert!(!store.add_category(RecordKind::Income, "Salary"));
    assert!(!store.add_category(RecordKind::Income, " Salary "));
    assert!(store.add_category(RecordKind::Income, "Freelance"));
    assert_eq!(
        store.categories(RecordKind::Income).labels(),
        ["Salary", "Freelance"]
    );
}

#[test]
fn removing_last_category_is_refused_regardless_of_label() {
    let mut store = LedgerStore::new(clock());
    for label in ["Food", "Rent", ""] {
        assert!(!store.remove_category(RecordKind::Spending, label));
        assert_eq!(store.categories(RecordKind::Spending).labels(), ["Food"]);
    }
    assert!(matches!(
        store.try_remove_category(RecordKind::Spending, "Food"),
        Err(CoreError::EmptyCategorySetViolation(RecordKind::Spending))
    ));
}

#[test]
fn removing_category_keeps_history_labels() {
    let mut store = LedgerStore::new(clock());
    store.add_category(RecordKind::Spending, "Travel");
    let id = store
        .add_record(RecordKind::Spending, "Travel", cents(12_000), "train")
        .unwrap();
    assert!(store.remove_category(RecordKind::Spending, "Travel"));
    assert!(matches!(
        store.try_remove_category(RecordKind::Spending, "Travel"),
        Err(CoreError::EmptyCategorySetViolation(_))
    ));
    assert_eq!(
        store.record(RecordKind::Spending, id).map(|r| r.category()),
        Some("Travel")
    );
}

#[test]
fn missing_category_reports_not_found() {
    let mut store = LedgerStore::new(clock());
    store.add_category(RecordKind::Income, "Gifts");
    assert!(matches!(
        store.try_remove_category(RecordKind::Income, "Lottery"),
        Err(CoreError::CategoryNotFound { .. })
    ));
}

#[test]
fn savings_share_is_zero_without_income() {
    let mut store = LedgerStore::new(clock());
    assert_eq!(store.savings_share(), 0.0);
    store
        .add_record(RecordKind::Spending, "Food", cents(1_000), "")
        .unwrap();
    assert_eq!(store.savings_share(), 0.0);
    store
        .add_record(RecordKind::Income, "Salary", cents(4_000), "")
        .unwrap();
    assert!((store.savings_share() - 75.0).abs() < 1e-9);
}

#[test]
fn snapshot_roundtrip_renumbers_records() {
    let mut store = LedgerStore::new(clock());
    let first = store
        .add_record(RecordKind::Income, "Salary", cents(1_000), "")
        .unwrap();
    store
        .add_record(RecordKind::Income, "Salary", cents(2_000), "")
        .unwrap();
    store.delete_record(RecordKind::Income, first).unwrap();

    let snapshot = store.snapshot();
    let reloaded = LedgerStore::from_snapshot(snapshot.clone(), clock()).unwrap();
    assert_eq!(reloaded.snapshot(), snapshot);
    assert_eq!(reloaded.records(RecordKind::Income)[0].id(), RecordId(1));
    assert_eq!(reloaded.totals(), store.totals());
}

#[test]
fn session_saves_after_each_mutation() {
    let storage = Arc::new(MemoryStorage::default());
    let mut session = LedgerSession::empty(Box::new(storage.clone()), clock());

    let commit = session
        .add_record(RecordKind::Income, "Salary", cents(100_000), "paycheck")
        .expect("valid record");
    assert!(commit.is_saved());
    let saved = storage.saved.lock().unwrap().clone().expect("snapshot written");
    assert_eq!(saved, session.store().snapshot());

    let added = session.add_category(RecordKind::Income, "Freelance");
    assert!(added.value && added.is_saved());
    let saved = storage.saved.lock().unwrap().clone().unwrap();
    assert_eq!(saved.income_categories.labels(), ["Salary", "Freelance"]);
}

#[test]
fn session_validation_errors_do_not_touch_storage() {
    let storage = Arc::new(MemoryStorage::default());
    let mut session = LedgerSession::empty(Box::new(storage.clone()), clock());

    assert!(session
        .add_record_text(RecordKind::Spending, "Food", "twelve", "")
        .is_err());
    assert!(!session.remove_category(RecordKind::Spending, "Food").value);
    assert!(storage.saved.lock().unwrap().is_none());
    assert!(!session.is_dirty());
}

#[test]
fn failed_save_keeps_mutation_and_marks_dirty() {
    let storage = Arc::new(MemoryStorage::default());
    let mut session = LedgerSession::empty(Box::new(storage.clone()), clock());
    storage.fail_writes.store(true, Ordering::SeqCst);

    let commit = session
        .add_record(RecordKind::Spending, "Food", cents(4_550), "")
        .expect("mutation applies");
    assert!(matches!(
        commit.save_error(),
        Some(CoreError::PersistenceWrite(_))
    ));
    assert!(session.is_dirty());
    assert_eq!(session.store().totals(), totals(0, 4_550, -4_550));
    assert!(session.store().record(RecordKind::Spending, commit.value).is_some());

    storage.fail_writes.store(false, Ordering::SeqCst);
    session.save().expect("retry succeeds");
    assert!(!session.is_dirty());
    assert_eq!(
        storage.saved.lock().unwrap().clone().unwrap(),
        session.store().snapshot()
    );
}

#[test]
fn open_restores_previous_state() {
    let storage = Arc::new(MemoryStorage::default());
    let mut session = LedgerSession::empty(Box::new(storage.clone()), clock());
    session
        .add_record(RecordKind::Income, "Salary", cents(100_000), "")
        .unwrap();
    session
        .add_record(RecordKind::Spending, "Food", cents(4_550), "")
        .unwrap();

    let reopened = LedgerSession::open(Box::new(storage.clone()), clock()).expect("open");
    assert_eq!(reopened.store().snapshot(), session.store().snapshot());
    assert_eq!(reopened.store().totals(), totals(100_000, 4_550, 95_450));
}

#[test]
fn open_propagates_read_errors() {
    let storage = Arc::new(MemoryStorage {
        fail_reads: true,
        ..MemoryStorage::default()
    });
    let result = LedgerSession::open(Box::new(storage), clock());
    assert!(matches!(result, Err(CoreError::PersistenceRead(_))));
}
