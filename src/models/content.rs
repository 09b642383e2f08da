use crate::constants::{
    IDIOMS_CATEGORY_ID, IDIOMS_DATA_FILE, PHRASAL_VERBS_CATEGORY_ID, PHRASAL_VERBS_DATA_FILE,
    VOCABULARY_CATEGORY_ID, VOCABULARY_DATA_FILE,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color_hex: String,
    pub lesson_count: i64,
    pub illustration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub description: String,
    /// Declared count for authored subcategories, computed count for derived ones.
    pub item_count: i64,
    pub color_hex: String,
    pub order: i64,
}

/// Common European Framework reference level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    /// Case-insensitive parse of "a1".."C2".
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record from the supplemental vocabulary file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRecord {
    pub topic: String,
    pub sub_topic: String,
    pub word: String,
    pub part_of_speech: String,
    pub cefr_level: Option<CefrLevel>,
    pub examples: Vec<String>,
}

/// Record from the supplemental idioms and phrasal-verbs files
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseRecord {
    pub phrase: String,
    pub meaning: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Vocabulary,
    Idiom,
    PhrasalVerb,
    SampleAnswer,
    Pronunciation,
    TopicVocabulary,
    IdiomPhrase,
    PhrasalVerbPhrase,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Vocabulary => "Vocabulary",
            ItemKind::Idiom => "Idiom",
            ItemKind::PhrasalVerb => "PhrasalVerb",
            ItemKind::SampleAnswer => "SampleAnswer",
            ItemKind::Pronunciation => "Pronunciation",
            ItemKind::TopicVocabulary => "TopicVocabulary",
            ItemKind::IdiomPhrase => "IdiomPhrase",
            ItemKind::PhrasalVerbPhrase => "PhrasalVerbPhrase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ItemContent {
    Vocabulary {
        word: String,
        definition: String,
        example: String,
        audio_file_name: Option<String>,
    },
    Idiom {
        idiom: String,
        meaning: String,
        example: String,
    },
    PhrasalVerb {
        verb: String,
        meaning: String,
        example: String,
    },
    SampleAnswer {
        question: String,
        answer: String,
        key_vocabulary: Vec<String>,
        tips: Vec<String>,
        band_score: String,
    },
    Pronunciation {
        word: String,
        ipa: String,
        common_mistakes: Vec<String>,
        example: String,
        audio_file_name: Option<String>,
    },
    TopicVocabulary(VocabularyRecord),
    IdiomPhrase(PhraseRecord),
    PhrasalVerbPhrase(PhraseRecord),
}

impl ItemContent {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemContent::Vocabulary { .. } => ItemKind::Vocabulary,
            ItemContent::Idiom { .. } => ItemKind::Idiom,
            ItemContent::PhrasalVerb { .. } => ItemKind::PhrasalVerb,
            ItemContent::SampleAnswer { .. } => ItemKind::SampleAnswer,
            ItemContent::Pronunciation { .. } => ItemKind::Pronunciation,
            ItemContent::TopicVocabulary(_) => ItemKind::TopicVocabulary,
            ItemContent::IdiomPhrase(_) => ItemKind::IdiomPhrase,
            ItemContent::PhrasalVerbPhrase(_) => ItemKind::PhrasalVerbPhrase,
        }
    }

    /// The text an item is listed and searched by.
    pub fn headword(&self) -> &str {
        match self {
            ItemContent::Vocabulary { word, .. } | ItemContent::Pronunciation { word, .. } => word,
            ItemContent::Idiom { idiom, .. } => idiom,
            ItemContent::PhrasalVerb { verb, .. } => verb,
            ItemContent::SampleAnswer { question, .. } => question,
            ItemContent::TopicVocabulary(record) => &record.word,
            ItemContent::IdiomPhrase(record) | ItemContent::PhrasalVerbPhrase(record) => {
                &record.phrase
            }
        }
    }

    /// Text fields that must be non-empty, as (field name, value) pairs.
    pub fn required_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            ItemContent::Vocabulary {
                word, definition, ..
            } => vec![("word", word.as_str()), ("definition", definition.as_str())],
            ItemContent::Idiom { idiom, meaning, .. } => {
                vec![("idiom", idiom.as_str()), ("meaning", meaning.as_str())]
            }
            ItemContent::PhrasalVerb { verb, meaning, .. } => {
                vec![("verb", verb.as_str()), ("meaning", meaning.as_str())]
            }
            ItemContent::SampleAnswer {
                question, answer, ..
            } => vec![("question", question.as_str()), ("answer", answer.as_str())],
            ItemContent::Pronunciation { word, ipa, .. } => {
                vec![("word", word.as_str()), ("ipa", ipa.as_str())]
            }
            ItemContent::TopicVocabulary(record) => {
                vec![("topic", record.topic.as_str()), ("word", record.word.as_str())]
            }
            ItemContent::IdiomPhrase(record) | ItemContent::PhrasalVerbPhrase(record) => {
                vec![("phrase", record.phrase.as_str()), ("meaning", record.meaning.as_str())]
            }
        }
    }
}

/// A single learnable unit belonging to one subcategory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub subcategory_id: String,
    pub order: i64,
    pub difficulty: String,
    pub content: ItemContent,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        self.content.kind()
    }
}

/// Contents of the primary lesson file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonData {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub vocabulary_items: Vec<Item>,
    pub idiom_items: Vec<Item>,
    pub phrasal_verb_items: Vec<Item>,
    pub sample_answers: Vec<Item>,
    pub pronunciation_items: Vec<Item>,
}

impl LessonData {
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.vocabulary_items
            .iter()
            .chain(&self.idiom_items)
            .chain(&self.phrasal_verb_items)
            .chain(&self.sample_answers)
            .chain(&self.pronunciation_items)
    }
}

/// Optional content files, each loaded independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupplementalSource {
    Vocabulary,
    Idioms,
    PhrasalVerbs,
}

impl SupplementalSource {
    pub const ALL: [SupplementalSource; 3] = [
        SupplementalSource::Vocabulary,
        SupplementalSource::Idioms,
        SupplementalSource::PhrasalVerbs,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SupplementalSource::Vocabulary => VOCABULARY_DATA_FILE,
            SupplementalSource::Idioms => IDIOMS_DATA_FILE,
            SupplementalSource::PhrasalVerbs => PHRASAL_VERBS_DATA_FILE,
        }
    }

    /// Category whose subcategories are derived from this source.
    pub fn category_id(self) -> &'static str {
        match self {
            SupplementalSource::Vocabulary => VOCABULARY_CATEGORY_ID,
            SupplementalSource::Idioms => IDIOMS_CATEGORY_ID,
            SupplementalSource::PhrasalVerbs => PHRASAL_VERBS_CATEGORY_ID,
        }
    }

    pub fn from_category_id(category_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|source| source.category_id() == category_id)
    }
}

/// One decoded supplemental file.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemCollection {
    Vocabulary(Vec<VocabularyRecord>),
    Idioms(BTreeMap<String, Vec<PhraseRecord>>),
    PhrasalVerbs(BTreeMap<String, Vec<PhraseRecord>>),
}

impl ItemCollection {
    pub fn empty(source: SupplementalSource) -> Self {
        match source {
            SupplementalSource::Vocabulary => ItemCollection::Vocabulary(Vec::new()),
            SupplementalSource::Idioms => ItemCollection::Idioms(BTreeMap::new()),
            SupplementalSource::PhrasalVerbs => ItemCollection::PhrasalVerbs(BTreeMap::new()),
        }
    }

    pub fn source(&self) -> SupplementalSource {
        match self {
            ItemCollection::Vocabulary(_) => SupplementalSource::Vocabulary,
            ItemCollection::Idioms(_) => SupplementalSource::Idioms,
            ItemCollection::PhrasalVerbs(_) => SupplementalSource::PhrasalVerbs,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ItemCollection::Vocabulary(records) => records.len(),
            ItemCollection::Idioms(groups) | ItemCollection::PhrasalVerbs(groups) => {
                groups.values().map(Vec::len).sum()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All supplemental collections, empty where a source failed to load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplementalContent {
    pub vocabulary: Vec<VocabularyRecord>,
    pub idioms: BTreeMap<String, Vec<PhraseRecord>>,
    pub phrasal_verbs: BTreeMap<String, Vec<PhraseRecord>>,
}

impl SupplementalContent {
    pub fn insert(&mut self, collection: ItemCollection) {
        match collection {
            ItemCollection::Vocabulary(records) => self.vocabulary = records,
            ItemCollection::Idioms(groups) => self.idioms = groups,
            ItemCollection::PhrasalVerbs(groups) => self.phrasal_verbs = groups,
        }
    }
}
