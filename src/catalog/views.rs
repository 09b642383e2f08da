// src/catalog/views.rs

use crate::models::{Category, Item, ItemContent, Subcategory, UserProgress};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub lesson_count: i64,
    pub illustration: String,
    pub progress: f64,
    pub current_streak: u32,
}

impl CategoryView {
    pub fn new(category: &Category, progress: &UserProgress) -> Self {
        Self {
            id: category.id.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
            icon: category.icon.clone(),
            color: category.color_hex.clone(),
            lesson_count: category.lesson_count,
            illustration: category.illustration.clone(),
            progress: progress.category_ratio(&category.id),
            current_streak: progress.streak(&category.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryView {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub description: String,
    /// Declared count for authored subcategories, computed for derived ones
    pub item_count: i64,
    pub color: String,
    pub order: i64,
    pub progress: f64,
    pub is_unlocked: bool,
}

impl SubcategoryView {
    pub fn new(subcategory: &Subcategory, progress: &UserProgress, is_first: bool) -> Self {
        Self {
            id: subcategory.id.clone(),
            category_id: subcategory.category_id.clone(),
            title: subcategory.title.clone(),
            description: subcategory.description.clone(),
            item_count: subcategory.item_count,
            color: subcategory.color_hex.clone(),
            order: subcategory.order,
            progress: progress.subcategory_ratio(&subcategory.id),
            is_unlocked: progress.is_unlocked(&subcategory.id, is_first),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: String,
    pub subcategory_id: String,
    pub order: i64,
    pub difficulty: String,
    pub content: ItemContent,
    pub is_completed: bool,
    pub mastery_level: u8,
    pub study_count: u32,
}

impl ItemView {
    pub fn new(item: &Item, progress: &UserProgress) -> Self {
        let item_progress = progress.item_progress.get(&item.id);
        Self {
            id: item.id.clone(),
            subcategory_id: item.subcategory_id.clone(),
            order: item.order,
            difficulty: item.difficulty.clone(),
            content: item.content.clone(),
            is_completed: item_progress.is_some_and(|p| p.is_completed),
            mastery_level: item_progress.map_or(0, |p| p.mastery_level),
            study_count: item_progress.map_or(0, |p| p.study_count),
        }
    }

    /// Text the item is listed under.
    pub fn headword(&self) -> &str {
        self.content.headword()
    }
}
