use crate::content::Catalog;
use crate::models::{Item, ItemKind, LessonData, SupplementalSource};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Category,
    Subcategory,
    Item(ItemKind),
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Category => f.write_str("Category"),
            EntityKind::Subcategory => f.write_str("Subcategory"),
            EntityKind::Item(kind) => f.write_str(kind.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    EmptyTitle,
    InvalidCount,
    MissingReference,
    EmptyContent,
}

/// One structural defect found in loaded content. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub kind: IssueKind,
    pub reason: String,
}

impl ValidationIssue {
    fn new(entity_kind: EntityKind, entity_id: &str, kind: IssueKind, reason: String) -> Self {
        Self {
            entity_kind,
            entity_id: entity_id.to_string(),
            kind,
            reason,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.entity_kind, self.entity_id, self.reason)
    }
}

fn empty_content(item: &Item) -> Option<ValidationIssue> {
    let empty: Vec<&str> = item
        .content
        .required_fields()
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
    if empty.is_empty() {
        return None;
    }
    Some(ValidationIssue::new(
        EntityKind::Item(item.kind()),
        &item.id,
        IssueKind::EmptyContent,
        format!("has empty content in {}", empty.join(", ")),
    ))
}

/// Check the primary lesson data for empty titles, bad counts, empty
/// required text and dangling references. Never fails; an empty list means clean.
///
/// A sample answer may name a topic with no authored subcategory; the topic
/// is listed on its own, so only an empty topic is reported.
pub fn validate_lesson_data(data: &LessonData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let category_ids: HashSet<&str> = data.categories.iter().map(|c| c.id.as_str()).collect();
    let subcategory_ids: HashSet<&str> = data.subcategories.iter().map(|s| s.id.as_str()).collect();

    for category in &data.categories {
        if category.title.trim().is_empty() {
            issues.push(ValidationIssue::new(
                EntityKind::Category,
                &category.id,
                IssueKind::EmptyTitle,
                "has empty title".into(),
            ));
        }
        if category.lesson_count <= 0 {
            issues.push(ValidationIssue::new(
                EntityKind::Category,
                &category.id,
                IssueKind::InvalidCount,
                format!("has invalid lesson count {}", category.lesson_count),
            ));
        }
    }

    for subcategory in &data.subcategories {
        if subcategory.title.trim().is_empty() {
            issues.push(ValidationIssue::new(
                EntityKind::Subcategory,
                &subcategory.id,
                IssueKind::EmptyTitle,
                "has empty title".into(),
            ));
        }
        if !category_ids.contains(subcategory.category_id.as_str()) {
            issues.push(ValidationIssue::new(
                EntityKind::Subcategory,
                &subcategory.id,
                IssueKind::MissingReference,
                format!("references missing category {}", subcategory.category_id),
            ));
        }
    }

    for item in data.items() {
        issues.extend(empty_content(item));
        if item.kind() == ItemKind::SampleAnswer {
            if item.subcategory_id.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    EntityKind::Item(item.kind()),
                    &item.id,
                    IssueKind::MissingReference,
                    "has no topic".into(),
                ));
            }
        } else if !subcategory_ids.contains(item.subcategory_id.as_str()) {
            issues.push(ValidationIssue::new(
                EntityKind::Item(item.kind()),
                &item.id,
                IssueKind::MissingReference,
                format!("references missing subcategory {}", item.subcategory_id),
            ));
        }
    }

    issues
}

/// Lesson data checks plus empty-content checks on derived supplemental items.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationIssue> {
    let mut issues = validate_lesson_data(catalog.lesson());

    for source in SupplementalSource::ALL {
        for subcategory in catalog.subcategories_of(source.category_id()) {
            issues.extend(
                catalog
                    .items_of(&subcategory.id)
                    .into_iter()
                    .filter_map(empty_content),
            );
        }
    }

    issues
}
