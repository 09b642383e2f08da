use crate::constants::PROGRESS_KEY;
use crate::content::Catalog;
use crate::db::KeyValueStore;
use crate::error::PersistenceError;
use crate::models::UserProgress;
use log::{info, warn};

/// Durable storage for the single local user's progress.
#[derive(Clone)]
pub struct ProgressStore {
    kv: KeyValueStore,
}

impl ProgressStore {
    pub fn new(kv: KeyValueStore) -> Self {
        Self { kv }
    }

    /// Read persisted progress, seeding a fresh value when nothing usable is
    /// stored. Entries for content added since the last save are filled in.
    pub fn load(&self, catalog: &Catalog) -> UserProgress {
        let layouts = catalog.layout();

        let raw = match self.kv.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("No stored progress, seeding a fresh record");
                return UserProgress::seeded(&layouts);
            }
            Err(e) => {
                warn!("Could not read stored progress, seeding a fresh record: {e}");
                return UserProgress::seeded(&layouts);
            }
        };

        match serde_json::from_str::<UserProgress>(&raw) {
            Ok(mut progress) => {
                let added = progress.reconcile(&layouts);
                if added > 0 {
                    info!("Added {added} progress entries for new content");
                }
                progress
            }
            Err(e) => {
                warn!("Stored progress is unreadable, seeding a fresh record: {e}");
                UserProgress::seeded(&layouts)
            }
        }
    }

    /// Serialize and write the whole aggregate. No retry is attempted.
    pub fn save(&self, progress: &UserProgress) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(progress)?;
        self.kv.set(PROGRESS_KEY, &raw)
    }

    #[cfg(test)]
    pub(crate) fn kv(&self) -> &KeyValueStore {
        &self.kv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_catalog, setup_test_store};

    fn setup() -> (ProgressStore, tempfile::TempDir) {
        let (kv, dir) = setup_test_store();
        (ProgressStore::new(kv), dir)
    }

    #[test]
    fn test_fresh_install_seeds_first_subcategory_per_category() {
        let (store, _dir) = setup();
        let catalog = sample_catalog();

        let progress = store.load(&catalog);

        assert_eq!(progress.category_progress.len(), 5);
        for layout in catalog.layout() {
            for (index, id) in layout.subcategory_ids.iter().enumerate() {
                let entry = &progress.subcategory_progress[id];
                assert_eq!(entry.is_unlocked, index == 0, "{id}");
                assert_eq!(entry.progress, 0.0);
            }
        }
        assert!(progress
            .category_progress
            .values()
            .all(|c| c.overall_progress == 0.0));
    }

    #[test]
    fn test_load_is_idempotent() {
        let (store, _dir) = setup();
        let catalog = sample_catalog();

        assert_eq!(store.load(&catalog), store.load(&catalog));

        let mut progress = store.load(&catalog);
        progress.record_item_study("core-1", 1_700_000_000);
        store.save(&progress).unwrap();
        assert_eq!(store.load(&catalog), store.load(&catalog));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (store, _dir) = setup();
        let catalog = sample_catalog();
        let mut progress = store.load(&catalog);
        progress.record_item_study("core-1", 1_700_000_000);
        progress.recompute_subcategory(
            "core-words",
            &["core-1", "core-2", "core-3", "core-4"],
            1_700_000_000,
        );

        store.save(&progress).unwrap();

        assert_eq!(store.load(&catalog), progress);
    }

    #[test]
    fn test_save_is_idempotent() {
        let (store, _dir) = setup();
        let catalog = sample_catalog();
        let mut progress = store.load(&catalog);
        progress.record_item_study("core-2", 1_700_000_000);

        store.save(&progress).unwrap();
        let first = store.kv().get(PROGRESS_KEY).unwrap();
        store.save(&progress).unwrap();
        let second = store.kv().get(PROGRESS_KEY).unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unparsable_progress_is_reseeded() {
        let (store, _dir) = setup();
        let catalog = sample_catalog();
        store.kv().set(PROGRESS_KEY, "{\"userId\": 42").unwrap();

        let progress = store.load(&catalog);

        assert_eq!(progress, UserProgress::seeded(&catalog.layout()));
    }

    #[test]
    fn test_load_adds_entries_for_new_content() {
        let (store, _dir) = setup();
        let catalog = sample_catalog();
        let mut progress = store.load(&catalog);
        progress.subcategory_progress.remove("idioms-transport-by-car");
        store.save(&progress).unwrap();

        let loaded = store.load(&catalog);

        let restored = &loaded.subcategory_progress["idioms-transport-by-car"];
        assert!(!restored.is_unlocked);
        assert_eq!(restored.progress, 0.0);
    }

    #[test]
    fn test_save_fails_without_schema() {
        let (store, _dir) = setup();
        let catalog = sample_catalog();
        let progress = store.load(&catalog);
        store
            .kv()
            .database()
            .lock()
            .unwrap()
            .connection()
            .execute_batch("DROP TABLE kv_store")
            .unwrap();

        assert!(matches!(
            store.save(&progress),
            Err(PersistenceError::Database(_))
        ));
        // Reads degrade to a seeded value
        assert_eq!(store.load(&catalog), UserProgress::seeded(&catalog.layout()));
    }
}
