use std::path::Path;

use tracker_domain::LedgerSnapshot;

use crate::CoreError;

/// Abstraction over persistence backends that hold one full ledger snapshot.
///
/// `save` always overwrites the destination with the complete snapshot; there
/// is no append or incremental format. `load` on a missing destination yields
/// [`LedgerSnapshot::default`].
pub trait LedgerStorage: Send + Sync {
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), CoreError>;
    fn load(&self) -> Result<LedgerSnapshot, CoreError>;
    fn location(&self) -> &Path;
}
