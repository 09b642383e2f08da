use crate::constants::{DEFAULT_COLOR, SAMPLE_ANSWERS_CATEGORY_ID, SUBCATEGORY_PALETTE};
use crate::models::{
    Category, CategoryLayout, Item, ItemContent, LessonData, PhraseRecord, Subcategory,
    SupplementalContent, SupplementalSource, VocabularyRecord,
};
use std::collections::{BTreeMap, BTreeSet};

/// Words kept lowercase inside derived titles.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "of", "on", "or", "the", "to", "with",
];

/// A subcategory synthesized from one grouping of supplemental records.
#[derive(Debug, Clone, PartialEq)]
struct DerivedGroup {
    subcategory: Subcategory,
    items: Vec<Item>,
}

/// Immutable content index: the primary lesson data, the subcategories
/// derived from supplemental collections and the sample-answer topics.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    lesson: LessonData,
    supplemental: SupplementalContent,
    derived: BTreeMap<SupplementalSource, Vec<DerivedGroup>>,
    sample_answer_topics: Vec<Subcategory>,
}

impl Catalog {
    pub fn new(lesson: LessonData, supplemental: SupplementalContent) -> Self {
        let mut derived = BTreeMap::new();
        derived.insert(
            SupplementalSource::Vocabulary,
            derive_vocabulary(&supplemental.vocabulary),
        );
        derived.insert(
            SupplementalSource::Idioms,
            derive_phrases(
                SupplementalSource::Idioms.category_id(),
                "Idioms",
                ItemContent::IdiomPhrase,
                &supplemental.idioms,
            ),
        );
        derived.insert(
            SupplementalSource::PhrasalVerbs,
            derive_phrases(
                SupplementalSource::PhrasalVerbs.category_id(),
                "Phrasal verbs",
                ItemContent::PhrasalVerbPhrase,
                &supplemental.phrasal_verbs,
            ),
        );
        let sample_answer_topics = derive_sample_answer_topics(&lesson);

        Self {
            lesson,
            supplemental,
            derived,
            sample_answer_topics,
        }
    }

    pub fn lesson(&self) -> &LessonData {
        &self.lesson
    }

    pub fn supplemental(&self) -> &SupplementalContent {
        &self.supplemental
    }

    pub fn categories(&self) -> &[Category] {
        &self.lesson.categories
    }

    fn derived_groups(&self) -> impl Iterator<Item = &DerivedGroup> {
        self.derived.values().flatten()
    }

    /// Subcategories of a category in display order. Vocabulary, idioms and
    /// phrasal verbs come from supplemental groupings; everything else from
    /// the authored table sorted by `order`. Sample-answer topics without an
    /// authored row follow the authored sample-answer subcategories.
    pub fn subcategories_of(&self, category_id: &str) -> Vec<&Subcategory> {
        if let Some(source) = SupplementalSource::from_category_id(category_id) {
            return self
                .derived
                .get(&source)
                .map(|groups| groups.iter().map(|g| &g.subcategory).collect())
                .unwrap_or_default();
        }

        let mut subcategories: Vec<&Subcategory> = self
            .lesson
            .subcategories
            .iter()
            .filter(|s| s.category_id == category_id)
            .collect();
        subcategories.sort_by_key(|s| s.order);
        if category_id == SAMPLE_ANSWERS_CATEGORY_ID {
            subcategories.extend(&self.sample_answer_topics);
        }
        subcategories
    }

    /// Topics grouping sample answers that no authored subcategory covers.
    pub fn sample_answer_topics(&self) -> &[Subcategory] {
        &self.sample_answer_topics
    }

    /// Items of a subcategory sorted by `order`.
    pub fn items_of(&self, subcategory_id: &str) -> Vec<&Item> {
        if let Some(group) = self
            .derived_groups()
            .find(|g| g.subcategory.id == subcategory_id)
        {
            return group.items.iter().collect();
        }

        let mut items: Vec<&Item> = self
            .lesson
            .items()
            .filter(|item| item.subcategory_id == subcategory_id)
            .collect();
        items.sort_by_key(|item| item.order);
        items
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.derived_groups()
            .flat_map(|g| &g.items)
            .chain(self.lesson.items())
            .find(|item| item.id == item_id)
    }

    /// Every item derived from the supplemental vocabulary file.
    pub fn topic_vocabulary(&self) -> impl Iterator<Item = &Item> {
        self.derived
            .get(&SupplementalSource::Vocabulary)
            .into_iter()
            .flatten()
            .flat_map(|g| &g.items)
    }

    /// Ordered subcategory ids for every category.
    pub fn layout(&self) -> Vec<CategoryLayout> {
        self.lesson
            .categories
            .iter()
            .map(|category| CategoryLayout {
                category_id: category.id.clone(),
                subcategory_ids: self
                    .subcategories_of(&category.id)
                    .into_iter()
                    .map(|s| s.id.clone())
                    .collect(),
            })
            .collect()
    }
}

/// `transport-by-car` -> `Transport by Car`
pub fn title_case(raw: &str) -> String {
    raw.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(index, word)| {
            let lower = word.to_lowercase();
            if index > 0 && MINOR_WORDS.contains(&lower.as_str()) {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Palette color for the group at `index`, repeating once the palette runs out.
pub fn palette_color(index: usize) -> &'static str {
    SUBCATEGORY_PALETTE
        .get(index % SUBCATEGORY_PALETTE.len().max(1))
        .copied()
        .unwrap_or(DEFAULT_COLOR)
}

fn to_order(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

fn build_group(
    category_id: &str,
    index: usize,
    key: &str,
    noun: &str,
    entries: Vec<(String, ItemContent)>,
) -> DerivedGroup {
    let subcategory_id = format!("{category_id}-{key}");
    let title = title_case(key);

    let items: Vec<Item> = entries
        .into_iter()
        .enumerate()
        .map(|(position, (difficulty, content))| Item {
            id: format!("{subcategory_id}-{position}"),
            subcategory_id: subcategory_id.clone(),
            order: to_order(position),
            difficulty,
            content,
        })
        .collect();

    DerivedGroup {
        subcategory: Subcategory {
            id: subcategory_id,
            category_id: category_id.to_string(),
            description: format!("{noun} about {title}"),
            title,
            item_count: to_order(items.len()),
            color_hex: palette_color(index).to_string(),
            order: to_order(index),
        },
        items,
    }
}

fn derive_vocabulary(records: &[VocabularyRecord]) -> Vec<DerivedGroup> {
    let mut by_topic: BTreeMap<&str, Vec<&VocabularyRecord>> = BTreeMap::new();
    for record in records {
        by_topic.entry(record.topic.as_str()).or_default().push(record);
    }

    by_topic
        .into_iter()
        .enumerate()
        .map(|(index, (topic, records))| {
            let entries = records
                .into_iter()
                .map(|record| {
                    let difficulty = record
                        .cefr_level
                        .map(|level| level.as_str().to_string())
                        .unwrap_or_default();
                    (difficulty, ItemContent::TopicVocabulary(record.clone()))
                })
                .collect();
            build_group(
                SupplementalSource::Vocabulary.category_id(),
                index,
                topic,
                "Words",
                entries,
            )
        })
        .collect()
}

fn derive_phrases(
    category_id: &str,
    noun: &str,
    make_content: fn(PhraseRecord) -> ItemContent,
    groups: &BTreeMap<String, Vec<PhraseRecord>>,
) -> Vec<DerivedGroup> {
    groups
        .iter()
        .enumerate()
        .map(|(index, (key, records))| {
            let entries = records
                .iter()
                .map(|record| (String::new(), make_content(record.clone())))
                .collect();
            build_group(category_id, index, key, noun, entries)
        })
        .collect()
}

// Items keep their authored ids; the topic id is the subcategory id they
// already reference.
fn derive_sample_answer_topics(lesson: &LessonData) -> Vec<Subcategory> {
    let authored: BTreeSet<&str> = lesson.subcategories.iter().map(|s| s.id.as_str()).collect();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for answer in &lesson.sample_answers {
        let topic = answer.subcategory_id.as_str();
        if !topic.trim().is_empty() && !authored.contains(topic) {
            *counts.entry(topic).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, (topic, count))| {
            let title = title_case(topic);
            Subcategory {
                id: topic.to_string(),
                category_id: SAMPLE_ANSWERS_CATEGORY_ID.to_string(),
                description: format!("Sample answers for {title}"),
                title,
                item_count: to_order(count),
                color_hex: palette_color(index).to_string(),
                order: to_order(index),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use crate::test_utils::sample_catalog;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("transport-by-car"), "Transport by Car");
        assert_eq!(title_case("the_weather"), "The Weather");
        assert_eq!(title_case("food and drink"), "Food and Drink");
        assert_eq!(title_case("TRAVEL"), "Travel");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_palette_cycles() {
        let len = SUBCATEGORY_PALETTE.len();
        assert_eq!(palette_color(0), SUBCATEGORY_PALETTE[0]);
        assert_eq!(palette_color(len), SUBCATEGORY_PALETTE[0]);
        assert_eq!(palette_color(len + 1), SUBCATEGORY_PALETTE[1]);
    }

    #[test]
    fn test_explicit_subcategories_sorted_by_order() {
        let catalog = sample_catalog();
        let ids: Vec<&str> = catalog
            .subcategories_of("speaking")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["part1-hometown", "core-words", "linking-words"]);
    }

    #[test]
    fn test_derived_idiom_subcategories() {
        let catalog = sample_catalog();
        let subcategories = catalog.subcategories_of("idioms");

        assert_eq!(subcategories.len(), 2);
        let transport = subcategories[1];
        assert_eq!(transport.id, "idioms-transport-by-car");
        assert_eq!(transport.title, "Transport by Car");
        assert_eq!(transport.item_count, 2);
        assert_eq!(transport.color_hex, SUBCATEGORY_PALETTE[1]);
        assert_eq!(transport.category_id, "idioms");
    }

    #[test]
    fn test_derivation_is_repeatable() {
        assert_eq!(sample_catalog(), sample_catalog());
    }

    #[test]
    fn test_derived_items_have_stable_ids() {
        let catalog = sample_catalog();
        let items = catalog.items_of("idioms-transport-by-car");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "idioms-transport-by-car-0");
        assert_eq!(items[1].order, 1);
        assert_eq!(items[0].kind(), ItemKind::IdiomPhrase);
        assert!(catalog.item("idioms-transport-by-car-1").is_some());
    }

    #[test]
    fn test_vocabulary_grouped_by_topic() {
        let catalog = sample_catalog();
        let subcategories = catalog.subcategories_of("vocabulary");
        let titles: Vec<&str> = subcategories.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, vec!["Travel", "Work"]);
        assert_eq!(subcategories[0].item_count, 3);
        assert_eq!(catalog.topic_vocabulary().count(), 5);
    }

    #[test]
    fn test_items_of_sorted_by_order() {
        let catalog = sample_catalog();
        let orders: Vec<i64> = catalog.items_of("core-words").iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unknown_ids_yield_nothing() {
        let catalog = sample_catalog();
        assert!(catalog.subcategories_of("unknown").is_empty());
        assert!(catalog.items_of("unknown").is_empty());
        assert!(Catalog::new(LessonData::default(), SupplementalContent::default())
            .subcategories_of("phrasal_verbs")
            .is_empty());
    }

    #[test]
    fn test_derived_phrasal_verb_subcategories() {
        let catalog = sample_catalog();
        let subcategories = catalog.subcategories_of("phrasal_verbs");

        let ids: Vec<&str> = subcategories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["phrasal_verbs-feelings", "phrasal_verbs-work"]);
        assert_eq!(subcategories[1].description, "Phrasal verbs about Work");
        assert_eq!(subcategories[1].item_count, 2);

        let items = catalog.items_of("phrasal_verbs-work");
        assert_eq!(items[0].kind(), ItemKind::PhrasalVerbPhrase);
        assert_eq!(items[0].content.headword(), "carry out");
    }

    #[test]
    fn test_idiom_groups_are_not_labelled_as_vocabulary() {
        let catalog = sample_catalog();
        let feelings = catalog.subcategories_of("idioms")[0];
        assert_eq!(feelings.description, "Idioms about Feelings");
        assert_eq!(catalog.subcategories_of("vocabulary")[0].description, "Words about Travel");
    }

    #[test]
    fn test_sample_answer_topics_without_authored_row() {
        let catalog = sample_catalog();
        let topics = catalog.subcategories_of("sample_answers");

        let ids: Vec<&str> = topics.iter().map(|s| s.id.as_str()).collect();
        // part1-hometown has an authored row under speaking
        assert_eq!(ids, vec!["hometown", "work-or-study"]);
        assert_eq!(topics[1].title, "Work or Study");
        assert_eq!(topics[1].description, "Sample answers for Work or Study");
        assert_eq!(topics[0].item_count, 1);
        assert_eq!(topics[0].category_id, "sample_answers");
        assert_eq!(catalog.sample_answer_topics().len(), 2);

        let items = catalog.items_of("hometown");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "hometown-2");
    }

    #[test]
    fn test_authored_sample_answer_rows_come_first() {
        let mut lesson = sample_catalog().lesson().clone();
        lesson.subcategories.push(Subcategory {
            id: "part2-describe".into(),
            category_id: "sample_answers".into(),
            title: "Part 2".into(),
            description: String::new(),
            item_count: 0,
            color_hex: DEFAULT_COLOR.into(),
            order: 0,
        });
        let catalog = Catalog::new(lesson, SupplementalContent::default());

        let ids: Vec<&str> = catalog
            .subcategories_of("sample_answers")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["part2-describe", "hometown", "work-or-study"]);
    }

    #[test]
    fn test_layout_follows_display_order() {
        let catalog = sample_catalog();
        let layout = catalog.layout();

        assert_eq!(layout.len(), 5);
        let speaking = layout.iter().find(|l| l.category_id == "speaking").unwrap();
        assert_eq!(speaking.subcategory_ids[0], "part1-hometown");
        let idioms = layout.iter().find(|l| l.category_id == "idioms").unwrap();
        assert_eq!(idioms.subcategory_ids, vec!["idioms-feelings", "idioms-transport-by-car"]);
        let answers = layout.iter().find(|l| l.category_id == "sample_answers").unwrap();
        assert_eq!(answers.subcategory_ids, vec!["hometown", "work-or-study"]);
    }
}
