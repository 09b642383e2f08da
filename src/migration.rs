use crate::constants::{
    CURRENT_DATA_VERSION, DATA_VERSION_KEY, PROGRESS_KEY, UNVERSIONED_DATA_VERSION,
};
use crate::db::KeyValueStore;
use crate::error::PersistenceError;
use log::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    /// `stored` is the recorded tag, or the unversioned tag when none is recorded.
    Stale { stored: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    UpToDate,
    ClearedLegacyProgress { from: String },
    NoOp { from: String },
}

/// Brings persisted data up to the running data version. Runs once at
/// startup, before any progress is loaded.
pub struct MigrationManager {
    kv: KeyValueStore,
}

impl MigrationManager {
    pub fn new(kv: KeyValueStore) -> Self {
        Self { kv }
    }

    pub fn state(&self) -> Result<SchemaState, PersistenceError> {
        let stored = self
            .kv
            .get(DATA_VERSION_KEY)?
            .unwrap_or_else(|| UNVERSIONED_DATA_VERSION.to_string());
        if stored == CURRENT_DATA_VERSION {
            Ok(SchemaState::Current)
        } else {
            Ok(SchemaState::Stale { stored })
        }
    }

    /// Migrate when the stored tag differs from the current one, then record
    /// the current tag. Does nothing when the tags already match.
    pub fn migrate_if_needed(&self) -> Result<MigrationOutcome, PersistenceError> {
        let SchemaState::Stale { stored } = self.state()? else {
            return Ok(MigrationOutcome::UpToDate);
        };

        let outcome = self.migrate_from(stored)?;
        self.kv.set(DATA_VERSION_KEY, CURRENT_DATA_VERSION)?;
        info!("Data version set to {CURRENT_DATA_VERSION} ({outcome:?})");
        Ok(outcome)
    }

    fn migrate_from(&self, stored: String) -> Result<MigrationOutcome, PersistenceError> {
        if stored == UNVERSIONED_DATA_VERSION {
            if self.kv.remove(PROGRESS_KEY)? {
                info!("Discarded progress written before data versioning");
            }
            return Ok(MigrationOutcome::ClearedLegacyProgress { from: stored });
        }

        // No transform is defined yet between versioned releases
        Ok(MigrationOutcome::NoOp { from: stored })
    }
}
