//! Read/write facade over content and progress.
//!
//! [`CatalogService`] is the single owner of the in-memory [`UserProgress`].
//! Reads never fail: unknown ids produce empty results. The only fallible
//! operation is the persistence write inside [`CatalogService::mark_item_completed`],
//! and the in-memory update survives a failed write.

pub mod views;

pub use views::{CategoryView, ItemView, SubcategoryView};

use crate::constants::SAMPLE_ANSWERS_CATEGORY_ID;
use crate::content::Catalog;
use crate::error::PersistenceError;
use crate::models::{CefrLevel, ItemContent, ItemProgress, UserProgress};
use crate::progress::ProgressStore;
use crate::validation::{validate_catalog, ValidationIssue};
use log::{debug, error, warn};
use std::collections::BTreeSet;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// Sent to subscribers after progress changes, so derived views can refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    ProgressChanged {
        category_id: String,
        subcategory_id: String,
        item_id: String,
    },
}

/// Optional narrowing applied to the supplemental vocabulary list.
/// Topic, sub-topic and level match exactly; `search` is a
/// case-insensitive substring match on the word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyFilter {
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
    pub level: Option<CefrLevel>,
    pub search: Option<String>,
}

pub struct CatalogService {
    catalog: Catalog,
    store: ProgressStore,
    progress: Mutex<UserProgress>,
    subscribers: Mutex<Vec<Sender<CatalogEvent>>>,
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

impl CatalogService {
    /// Build the service, loading (or seeding) progress for `catalog`.
    pub fn new(catalog: Catalog, store: ProgressStore) -> Self {
        let progress = store.load(&catalog);
        Self {
            catalog,
            store,
            progress: Mutex::new(progress),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lock_progress(&self) -> MutexGuard<'_, UserProgress> {
        match self.progress.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("CatalogService: progress mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Sender<CatalogEvent>>> {
        match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("CatalogService: subscriber mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    pub fn get_categories(&self) -> Vec<CategoryView> {
        let progress = self.lock_progress();
        self.catalog
            .categories()
            .iter()
            .map(|category| CategoryView::new(category, &progress))
            .collect()
    }

    pub fn get_subcategories(&self, category_id: &str) -> Vec<SubcategoryView> {
        let progress = self.lock_progress();
        self.catalog
            .subcategories_of(category_id)
            .into_iter()
            .enumerate()
            .map(|(index, subcategory)| SubcategoryView::new(subcategory, &progress, index == 0))
            .collect()
    }

    /// Sample-answer topics that have no authored subcategory, in topic order.
    pub fn get_sample_answer_topics(&self) -> Vec<SubcategoryView> {
        self.get_subcategories(SAMPLE_ANSWERS_CATEGORY_ID)
            .into_iter()
            .filter(|view| {
                self.catalog
                    .sample_answer_topics()
                    .iter()
                    .any(|topic| topic.id == view.id)
            })
            .collect()
    }

    pub fn get_items(&self, subcategory_id: &str) -> Vec<ItemView> {
        let progress = self.lock_progress();
        self.catalog
            .items_of(subcategory_id)
            .into_iter()
            .map(|item| ItemView::new(item, &progress))
            .collect()
    }

    /// Supplemental vocabulary narrowed by `filter`, sorted by word.
    pub fn get_filtered_vocabulary(&self, filter: &VocabularyFilter) -> Vec<ItemView> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let progress = self.lock_progress();
        let mut views: Vec<ItemView> = self
            .catalog
            .topic_vocabulary()
            .filter(|item| {
                let ItemContent::TopicVocabulary(record) = &item.content else {
                    return false;
                };
                filter.topic.as_ref().map_or(true, |t| &record.topic == t)
                    && filter
                        .sub_topic
                        .as_ref()
                        .map_or(true, |s| &record.sub_topic == s)
                    && filter.level.map_or(true, |l| record.cefr_level == Some(l))
                    && search
                        .as_ref()
                        .map_or(true, |s| record.word.to_lowercase().contains(s.as_str()))
            })
            .map(|item| ItemView::new(item, &progress))
            .collect();

        views.sort_by(|a, b| {
            a.headword()
                .to_lowercase()
                .cmp(&b.headword().to_lowercase())
                .then_with(|| a.headword().cmp(b.headword()))
        });
        views
    }

    /// Distinct vocabulary topics, sorted.
    pub fn get_vocabulary_topics(&self) -> Vec<String> {
        self.catalog
            .supplemental()
            .vocabulary
            .iter()
            .map(|record| record.topic.clone())
            .filter(|topic| !topic.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct sub-topics, optionally within one topic, sorted.
    pub fn get_vocabulary_sub_topics(&self, topic: Option<&str>) -> Vec<String> {
        self.catalog
            .supplemental()
            .vocabulary
            .iter()
            .filter(|record| topic.map_or(true, |t| record.topic == t))
            .map(|record| record.sub_topic.clone())
            .filter(|sub_topic| !sub_topic.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Record one completed study of an item and persist the result.
    ///
    /// On a write failure the in-memory progress keeps the update and the
    /// error is returned for the caller to log; the next successful save
    /// carries it to disk.
    pub fn mark_item_completed(
        &self,
        item_id: &str,
        subcategory_id: &str,
        category_id: &str,
    ) -> Result<(), PersistenceError> {
        self.mark_item_completed_at(item_id, subcategory_id, category_id, unix_now())
    }

    pub(crate) fn mark_item_completed_at(
        &self,
        item_id: &str,
        subcategory_id: &str,
        category_id: &str,
        now: i64,
    ) -> Result<(), PersistenceError> {
        if self.catalog.item(item_id).is_none() {
            warn!("Recording progress for unknown item {item_id}");
        }

        let item_ids: Vec<&str> = self
            .catalog
            .items_of(subcategory_id)
            .into_iter()
            .map(|item| item.id.as_str())
            .collect();
        let subcategory_ids: Vec<&str> = self
            .catalog
            .subcategories_of(category_id)
            .into_iter()
            .map(|subcategory| subcategory.id.as_str())
            .collect();

        let saved = {
            let mut progress = self.lock_progress();
            progress.record_item_study(item_id, now);
            let subcategory_ratio = progress.recompute_subcategory(subcategory_id, &item_ids, now);
            let category_ratio = progress.recompute_category(category_id, &subcategory_ids, now);
            debug!("Completed {item_id}: {subcategory_id} at {subcategory_ratio:.2}");
            debug!("{category_id} overall progress now {category_ratio:.2}");
            self.store.save(&progress)
        };

        if let Err(e) = &saved {
            error!("Failed to save progress after completing {item_id}: {e}");
        }

        self.notify(&CatalogEvent::ProgressChanged {
            category_id: category_id.to_string(),
            subcategory_id: subcategory_id.to_string(),
            item_id: item_id.to_string(),
        });

        saved
    }

    /// Receive a [`CatalogEvent`] after every progress change.
    pub fn subscribe(&self) -> Receiver<CatalogEvent> {
        let (tx, rx) = channel();
        self.lock_subscribers().push(tx);
        rx
    }

    fn notify(&self, event: &CatalogEvent) {
        self.lock_subscribers()
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn validation_report(&self) -> Vec<ValidationIssue> {
        validate_catalog(&self.catalog)
    }

    pub fn progress_snapshot(&self) -> UserProgress {
        self.lock_progress().clone()
    }

    pub fn item_progress(&self, item_id: &str) -> Option<ItemProgress> {
        self.lock_progress().item_progress.get(item_id).cloned()
    }
}
