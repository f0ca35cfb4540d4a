use std::{path::Path, sync::Arc};

use tracing::{info, warn};
use tracker_domain::{Money, RecordId, RecordKind};

use crate::{storage::LedgerStorage, time::Clock, CoreError, LedgerStore};

/// Result of a mutation that was applied in memory.
///
/// `saved` carries the outcome of the follow-up full save. A failed save does
/// not undo the mutation; the session is left dirty instead.
#[derive(Debug)]
pub struct Commit<T> {
    pub value: T,
    pub saved: Result<(), CoreError>,
}

impl<T> Commit<T> {
    pub fn is_saved(&self) -> bool {
        self.saved.is_ok()
    }

    pub fn save_error(&self) -> Option<&CoreError> {
        self.saved.as_ref().err()
    }
}

/// A [`LedgerStore`] bound to a storage backend. Every successful mutating
/// command is followed by a full save of the store.
pub struct LedgerSession {
    store: LedgerStore,
    storage: Box<dyn LedgerStorage>,
    dirty: bool,
}

impl LedgerSession {
    /// Loads the ledger from `storage`. Read failures are returned as-is so the
    /// caller decides whether to start empty or abort.
    pub fn open(storage: Box<dyn LedgerStorage>, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        let snapshot = storage.load()?;
        info!(
            path = %storage.location().display(),
            income = snapshot.income.len(),
            spending = snapshot.spending.len(),
            "ledger loaded"
        );
        Ok(Self {
            store: LedgerStore::from_snapshot(snapshot, clock)?,
            storage,
            dirty: false,
        })
    }

    /// Session over an empty ledger. Nothing is written until the first mutation.
    pub fn empty(storage: Box<dyn LedgerStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: LedgerStore::new(clock),
            storage,
            dirty: false,
        }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn location(&self) -> &Path {
        self.storage.location()
    }

    /// `true` when the last save failed and memory is ahead of the file.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the full snapshot, clearing the dirty flag on success.
    pub fn save(&mut self) -> Result<(), CoreError> {
        match self.storage.save(&self.store.snapshot()) {
            Ok(()) => {
                self.dirty = false;
                info!(path = %self.storage.location().display(), "ledger saved");
                Ok(())
            }
            Err(err) => {
                self.dirty = true;
                warn!(error = %err, "ledger save failed; in-memory state is unsaved");
                Err(err)
            }
        }
    }

    pub fn add_record(
        &mut self,
        kind: RecordKind,
        category: &str,
        amount: Money,
        comment: &str,
    ) -> Result<Commit<RecordId>, CoreError> {
        let id = self.store.add_record(kind, category, amount, comment)?;
        Ok(self.commit(id))
    }

    pub fn add_record_text(
        &mut self,
        kind: RecordKind,
        category: &str,
        amount_text: &str,
        comment: &str,
    ) -> Result<Commit<RecordId>, CoreError> {
        let id = self
            .store
            .add_record_text(kind, category, amount_text, comment)?;
        Ok(self.commit(id))
    }

    pub fn delete_record(
        &mut self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Commit<()>, CoreError> {
        self.store.delete_record(kind, id)?;
        Ok(self.commit(()))
    }

    /// Saves only when the label was actually added.
    pub fn add_category(&mut self, kind: RecordKind, label: &str) -> Commit<bool> {
        if self.store.add_category(kind, label) {
            self.commit(true)
        } else {
            Commit {
                value: false,
                saved: Ok(()),
            }
        }
    }

    /// Saves only when the label was actually removed.
    pub fn remove_category(&mut self, kind: RecordKind, label: &str) -> Commit<bool> {
        if self.store.remove_category(kind, label) {
            self.commit(true)
        } else {
            Commit {
                value: false,
                saved: Ok(()),
            }
        }
    }

    pub fn try_remove_category(
        &mut self,
        kind: RecordKind,
        label: &str,
    ) -> Result<Commit<()>, CoreError> {
        self.store.try_remove_category(kind, label)?;
        Ok(self.commit(()))
    }

    fn commit<T>(&mut self, value: T) -> Commit<T> {
        let saved = self.save();
        Commit { value, saved }
    }
}
