use crate::constants::{DEFAULT_USER_ID, MAX_MASTERY_LEVEL, SECS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProgress {
    pub item_id: String,
    pub is_completed: bool,
    pub last_studied_date: Option<i64>,
    pub study_count: u32,
    /// 0-5 scale
    pub mastery_level: u8,
}

impl ItemProgress {
    fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            is_completed: false,
            last_studied_date: None,
            study_count: 0,
            mastery_level: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryProgress {
    pub subcategory_id: String,
    /// 0.0 to 1.0
    pub progress: f64,
    pub completed_items: Vec<String>,
    pub is_unlocked: bool,
    pub last_studied_date: Option<i64>,
}

impl SubcategoryProgress {
    pub fn new(subcategory_id: &str, is_unlocked: bool) -> Self {
        Self {
            subcategory_id: subcategory_id.to_string(),
            progress: 0.0,
            completed_items: Vec::new(),
            is_unlocked,
            last_studied_date: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    pub category_id: String,
    /// Unweighted mean of the category's subcategory progress, 0.0 to 1.0
    pub overall_progress: f64,
    pub completed_subcategories: Vec<String>,
    pub current_streak: u32,
    pub last_studied_date: Option<i64>,
}

impl CategoryProgress {
    pub fn new(category_id: &str) -> Self {
        Self {
            category_id: category_id.to_string(),
            overall_progress: 0.0,
            completed_subcategories: Vec::new(),
            current_streak: 0,
            last_studied_date: None,
        }
    }
}

/// Subcategory ids of one category, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLayout {
    pub category_id: String,
    pub subcategory_ids: Vec<String>,
}

/// Everything the app remembers about the local user's study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub category_progress: BTreeMap<String, CategoryProgress>,
    pub subcategory_progress: BTreeMap<String, SubcategoryProgress>,
    pub item_progress: BTreeMap<String, ItemProgress>,
    pub streaks: BTreeMap<String, u32>,
    pub last_updated: Option<i64>,
}

/// completed / total, 0.0 for an empty set.
#[allow(
    clippy::cast_precision_loss,
    clippy::as_conversions,
    reason = "item counts stay far below 2^52"
)]
pub fn ratio(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64).clamp(0.0, 1.0)
}

/// Unweighted mean, 0.0 for no values.
#[allow(
    clippy::cast_precision_loss,
    clippy::as_conversions,
    reason = "subcategory counts stay far below 2^52"
)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

impl UserProgress {
    /// Fresh progress: every category and subcategory at zero, with the
    /// first subcategory of each category unlocked.
    pub fn seeded(layouts: &[CategoryLayout]) -> Self {
        let mut progress = Self {
            user_id: DEFAULT_USER_ID.to_string(),
            category_progress: BTreeMap::new(),
            subcategory_progress: BTreeMap::new(),
            item_progress: BTreeMap::new(),
            streaks: BTreeMap::new(),
            last_updated: None,
        };
        progress.reconcile(layouts);
        progress
    }

    /// Add entries for categories and subcategories that have none.
    /// Returns the number of entries added.
    pub fn reconcile(&mut self, layouts: &[CategoryLayout]) -> usize {
        let mut added = 0;
        for layout in layouts {
            if !self.category_progress.contains_key(&layout.category_id) {
                self.category_progress.insert(
                    layout.category_id.clone(),
                    CategoryProgress::new(&layout.category_id),
                );
                added += 1;
            }

            for (index, subcategory_id) in layout.subcategory_ids.iter().enumerate() {
                if !self.subcategory_progress.contains_key(subcategory_id) {
                    self.subcategory_progress.insert(
                        subcategory_id.clone(),
                        SubcategoryProgress::new(subcategory_id, index == 0),
                    );
                    added += 1;
                }
            }
        }
        added
    }

    /// Whether a subcategory is open to study. Subcategories without an entry
    /// are open only when they come first in their category.
    pub fn is_unlocked(&self, subcategory_id: &str, is_first: bool) -> bool {
        self.subcategory_progress
            .get(subcategory_id)
            .map_or(is_first, |p| p.is_unlocked)
    }

    pub fn subcategory_ratio(&self, subcategory_id: &str) -> f64 {
        self.subcategory_progress
            .get(subcategory_id)
            .map_or(0.0, |p| p.progress)
    }

    pub fn category_ratio(&self, category_id: &str) -> f64 {
        self.category_progress
            .get(category_id)
            .map_or(0.0, |p| p.overall_progress)
    }

    pub fn streak(&self, category_id: &str) -> u32 {
        self.streaks.get(category_id).copied().unwrap_or(0)
    }

    pub fn is_item_completed(&self, item_id: &str) -> bool {
        self.item_progress
            .get(item_id)
            .is_some_and(|p| p.is_completed)
    }

    /// Upsert an item's progress for one completed study event.
    pub fn record_item_study(&mut self, item_id: &str, now: i64) -> &ItemProgress {
        let entry = self
            .item_progress
            .entry(item_id.to_string())
            .or_insert_with(|| ItemProgress::new(item_id));
        entry.is_completed = true;
        entry.last_studied_date = Some(now);
        entry.study_count = entry.study_count.saturating_add(1);
        entry.mastery_level = entry.mastery_level.saturating_add(1).min(MAX_MASTERY_LEVEL);
        self.last_updated = Some(now);
        entry
    }

    /// Recompute a subcategory from the ids of every item it contains.
    /// Returns the new progress ratio.
    pub fn recompute_subcategory(
        &mut self,
        subcategory_id: &str,
        item_ids: &[&str],
        now: i64,
    ) -> f64 {
        let mut completed: Vec<String> = item_ids
            .iter()
            .filter(|id| self.is_item_completed(id))
            .map(|id| (*id).to_string())
            .collect();
        completed.sort();
        completed.dedup();

        let progress = ratio(completed.len(), item_ids.len());
        let entry = self
            .subcategory_progress
            .entry(subcategory_id.to_string())
            .or_insert_with(|| SubcategoryProgress::new(subcategory_id, true));
        entry.progress = progress;
        entry.completed_items = completed;
        entry.last_studied_date = Some(now);
        progress
    }

    /// Recompute a category from its subcategories (in display order), update
    /// its streak and unlock the subcategory following any completed one.
    /// Returns the new overall progress.
    pub fn recompute_category(
        &mut self,
        category_id: &str,
        subcategory_ids: &[&str],
        now: i64,
    ) -> f64 {
        let values: Vec<f64> = subcategory_ids
            .iter()
            .map(|id| self.subcategory_ratio(id))
            .collect();
        let overall = mean(&values);

        let completed: Vec<String> = subcategory_ids
            .iter()
            .filter(|id| {
                self.subcategory_progress
                    .get(**id)
                    .is_some_and(SubcategoryProgress::is_complete)
            })
            .map(|id| (*id).to_string())
            .collect();

        for pair in subcategory_ids.windows(2) {
            if let [current, next] = pair {
                if completed.iter().any(|id| id.as_str() == *current) {
                    self.subcategory_progress
                        .entry((*next).to_string())
                        .or_insert_with(|| SubcategoryProgress::new(next, false))
                        .is_unlocked = true;
                }
            }
        }

        let entry = self
            .category_progress
            .entry(category_id.to_string())
            .or_insert_with(|| CategoryProgress::new(category_id));
        entry.current_streak = next_streak(entry.current_streak, entry.last_studied_date, now);
        entry.overall_progress = overall;
        entry.completed_subcategories = completed;
        entry.last_studied_date = Some(now);
        let streak = entry.current_streak;

        self.streaks.insert(category_id.to_string(), streak);
        self.last_updated = Some(now);
        overall
    }
}

/// Consecutive-day streak after a study event at `now`.
fn next_streak(current: u32, last_studied: Option<i64>, now: i64) -> u32 {
    let today = now.div_euclid(SECS_PER_DAY);
    match last_studied.map(|ts| ts.div_euclid(SECS_PER_DAY)) {
        Some(day) if day == today => current.max(1),
        Some(day) if day + 1 == today => current.saturating_add(1),
        Some(_) | None => 1,
    }
}
