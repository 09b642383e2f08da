//! Lenient decoding of bundled content files.
//!
//! Every field goes through an explicit read step that either yields the
//! value or a [`FieldDefect`]. Defects fall back to a default and are recorded
//! as a [`ContentWarning`], so bad content never aborts a load. Only input
//! that is not JSON, or whose top level has the wrong shape, is an error.

use crate::constants::DEFAULT_COLOR;
use crate::error::ContentLoadError;
use crate::models::{
    Category, CefrLevel, Item, ItemContent, LessonData, PhraseRecord, Subcategory,
    VocabularyRecord,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A default applied while decoding content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentWarning {
    pub entity: &'static str,
    pub entity_id: String,
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} field '{}': {}",
            self.entity, self.entity_id, self.field, self.reason
        )
    }
}

/// Decoded content together with the defaults applied to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub content: T,
    pub warnings: Vec<ContentWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefect {
    Missing,
    WrongType(&'static str),
}

impl fmt::Display for FieldDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefect::Missing => f.write_str("missing"),
            FieldDefect::WrongType(expected) => write!(f, "expected {expected}"),
        }
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value, FieldDefect> {
    match object.get(field) {
        None | Some(Value::Null) => Err(FieldDefect::Missing),
        Some(value) => Ok(value),
    }
}

pub fn read_str<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a str, FieldDefect> {
    lookup(object, field)?
        .as_str()
        .ok_or(FieldDefect::WrongType("a string"))
}

pub fn read_i64(object: &Map<String, Value>, field: &str) -> Result<i64, FieldDefect> {
    lookup(object, field)?
        .as_i64()
        .ok_or(FieldDefect::WrongType("an integer"))
}

/// Reads an array of strings; non-string entries are reported by index.
pub fn read_str_list(
    object: &Map<String, Value>,
    field: &str,
) -> Result<(Vec<String>, Vec<usize>), FieldDefect> {
    let values = lookup(object, field)?
        .as_array()
        .ok_or(FieldDefect::WrongType("an array of strings"))?;

    let mut strings = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();
    for (index, value) in values.iter().enumerate() {
        match value.as_str() {
            Some(s) => strings.push(s.to_string()),
            None => rejected.push(index),
        }
    }
    Ok((strings, rejected))
}

/// Reads fields of one entity, applying defaults and recording warnings.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    entity: &'static str,
    entity_id: String,
    warnings: &'a mut Vec<ContentWarning>,
}

impl<'a> FieldReader<'a> {
    /// Entity identified by its own `id` field. Entities without a usable id
    /// are skipped.
    pub fn identified(
        value: &'a Value,
        entity: &'static str,
        position: usize,
        warnings: &'a mut Vec<ContentWarning>,
    ) -> Option<Self> {
        let Some(object) = value.as_object() else {
            warnings.push(ContentWarning {
                entity,
                entity_id: format!("#{position}"),
                field: "id",
                reason: "entry is not an object, skipped".into(),
            });
            return None;
        };

        match read_str(object, "id") {
            Ok(id) if !id.trim().is_empty() => Some(Self {
                object,
                entity,
                entity_id: id.to_string(),
                warnings,
            }),
            Ok(_) => {
                warnings.push(ContentWarning {
                    entity,
                    entity_id: format!("#{position}"),
                    field: "id",
                    reason: "empty, skipped".into(),
                });
                None
            }
            Err(defect) => {
                warnings.push(ContentWarning {
                    entity,
                    entity_id: format!("#{position}"),
                    field: "id",
                    reason: format!("{defect}, skipped"),
                });
                None
            }
        }
    }

    /// Entity without an id of its own, labelled by its location.
    pub fn labelled(
        value: &'a Value,
        entity: &'static str,
        label: String,
        warnings: &'a mut Vec<ContentWarning>,
    ) -> Option<Self> {
        if let Some(object) = value.as_object() {
            Some(Self {
                object,
                entity,
                entity_id: label,
                warnings,
            })
        } else {
            warnings.push(ContentWarning {
                entity,
                entity_id: label,
                field: "*",
                reason: "entry is not an object, skipped".into(),
            });
            None
        }
    }

    pub fn id(&self) -> &str {
        &self.entity_id
    }

    fn warn(&mut self, field: &'static str, reason: String) {
        self.warnings.push(ContentWarning {
            entity: self.entity,
            entity_id: self.entity_id.clone(),
            field,
            reason,
        });
    }

    pub fn text(&mut self, field: &'static str) -> String {
        match read_str(self.object, field) {
            Ok(value) => value.to_string(),
            Err(defect) => {
                self.warn(field, format!("{defect}, defaulted to empty text"));
                String::new()
            }
        }
    }

    /// First present field among `fields`, for keys that go by more than one name.
    pub fn text_any(&mut self, fields: &[&'static str]) -> String {
        for field in fields {
            if let Ok(value) = read_str(self.object, field) {
                return value.to_string();
            }
        }
        let field = fields.first().copied().unwrap_or("*");
        self.warn(field, "missing, defaulted to empty text".into());
        String::new()
    }

    pub fn text_or(&mut self, field: &'static str, default: &str) -> String {
        match read_str(self.object, field) {
            Ok(value) => value.to_string(),
            Err(defect) => {
                self.warn(field, format!("{defect}, defaulted to '{default}'"));
                default.to_string()
            }
        }
    }

    /// Absence is normal; a value of the wrong type is reported.
    pub fn optional_text(&mut self, field: &'static str) -> Option<String> {
        match read_str(self.object, field) {
            Ok(value) => Some(value.to_string()),
            Err(FieldDefect::Missing) => None,
            Err(defect) => {
                self.warn(field, format!("{defect}, ignored"));
                None
            }
        }
    }

    pub fn integer(&mut self, field: &'static str) -> i64 {
        match read_i64(self.object, field) {
            Ok(value) => value,
            Err(defect) => {
                self.warn(field, format!("{defect}, defaulted to 0"));
                0
            }
        }
    }

    /// Absence is normal; a value of the wrong type is reported.
    pub fn optional_integer(&mut self, field: &'static str) -> Option<i64> {
        match read_i64(self.object, field) {
            Ok(value) => Some(value),
            Err(FieldDefect::Missing) => None,
            Err(defect) => {
                self.warn(field, format!("{defect}, ignored"));
                None
            }
        }
    }

    pub fn text_list(&mut self, field: &'static str) -> Vec<String> {
        match read_str_list(self.object, field) {
            Ok((values, rejected)) => {
                if !rejected.is_empty() {
                    self.warn(
                        field,
                        format!("dropped non-text entries at {rejected:?}"),
                    );
                }
                values
            }
            Err(defect) => {
                self.warn(field, format!("{defect}, defaulted to empty list"));
                Vec::new()
            }
        }
    }
}

fn top_level_object<'a>(
    name: &str,
    root: &'a Value,
) -> Result<&'a Map<String, Value>, ContentLoadError> {
    root.as_object()
        .ok_or_else(|| ContentLoadError::parse(name, "expected a top-level object"))
}

fn decode(name: &str, raw: &str) -> Result<Value, ContentLoadError> {
    serde_json::from_str(raw).map_err(|e| ContentLoadError::parse(name, e.to_string()))
}

/// Decode each element of `root[key]`, skipping entries the decoder rejects.
fn entries<T>(
    root: &Map<String, Value>,
    key: &'static str,
    warnings: &mut Vec<ContentWarning>,
    decode_entry: impl Fn(&Value, usize, &mut Vec<ContentWarning>) -> Option<T>,
) -> Vec<T> {
    let values = match lookup(root, key)
        .and_then(|v| v.as_array().ok_or(FieldDefect::WrongType("an array")))
    {
        Ok(values) => values,
        Err(defect) => {
            warnings.push(ContentWarning {
                entity: "catalog",
                entity_id: String::new(),
                field: key,
                reason: format!("{defect}, defaulted to empty list"),
            });
            return Vec::new();
        }
    };

    values
        .iter()
        .enumerate()
        .filter_map(|(position, value)| decode_entry(value, position, warnings))
        .collect()
}

fn category(
    value: &Value,
    position: usize,
    warnings: &mut Vec<ContentWarning>,
) -> Option<Category> {
    let mut r = FieldReader::identified(value, "Category", position, warnings)?;
    Some(Category {
        id: r.id().to_string(),
        title: r.text("title"),
        description: r.text("description"),
        icon: r.text("icon"),
        color_hex: r.text_or("colorHex", DEFAULT_COLOR),
        lesson_count: r.integer("lessonCount"),
        illustration: r.text("illustration"),
    })
}

fn subcategory(
    value: &Value,
    position: usize,
    warnings: &mut Vec<ContentWarning>,
) -> Option<Subcategory> {
    let mut r = FieldReader::identified(value, "Subcategory", position, warnings)?;
    Some(Subcategory {
        id: r.id().to_string(),
        category_id: r.text("categoryId"),
        title: r.text("title"),
        description: r.text("description"),
        item_count: r.integer("itemCount"),
        color_hex: r.text_or("colorHex", DEFAULT_COLOR),
        order: r.integer("order"),
    })
}

fn vocabulary_item(
    value: &Value,
    position: usize,
    warnings: &mut Vec<ContentWarning>,
) -> Option<Item> {
    let mut r = FieldReader::identified(value, "Vocabulary", position, warnings)?;
    let subcategory_id = r.text("subcategoryId");
    let content = ItemContent::Vocabulary {
        word: r.text("word"),
        definition: r.text("definition"),
        example: r.text("example"),
        audio_file_name: r.optional_text("audioFileName"),
    };
    Some(Item {
        id: r.id().to_string(),
        subcategory_id,
        order: r.integer("order"),
        difficulty: r.text("difficulty"),
        content,
    })
}

fn idiom_item(value: &Value, position: usize, warnings: &mut Vec<ContentWarning>) -> Option<Item> {
    let mut r = FieldReader::identified(value, "Idiom", position, warnings)?;
    let subcategory_id = r.text("subcategoryId");
    let content = ItemContent::Idiom {
        idiom: r.text("idiom"),
        meaning: r.text("meaning"),
        example: r.text("example"),
    };
    Some(Item {
        id: r.id().to_string(),
        subcategory_id,
        order: r.integer("order"),
        difficulty: r.text("difficulty"),
        content,
    })
}

fn phrasal_verb_item(
    value: &Value,
    position: usize,
    warnings: &mut Vec<ContentWarning>,
) -> Option<Item> {
    let mut r = FieldReader::identified(value, "PhrasalVerb", position, warnings)?;
    let subcategory_id = r.text("subcategoryId");
    let content = ItemContent::PhrasalVerb {
        verb: r.text("verb"),
        meaning: r.text("meaning"),
        example: r.text("example"),
    };
    Some(Item {
        id: r.id().to_string(),
        subcategory_id,
        order: r.integer("order"),
        difficulty: r.text("difficulty"),
        content,
    })
}

// Sample answers are keyed by topicId and carry no order of their own.
fn sample_answer(
    value: &Value,
    position: usize,
    warnings: &mut Vec<ContentWarning>,
) -> Option<Item> {
    let mut r = FieldReader::identified(value, "SampleAnswer", position, warnings)?;
    let subcategory_id = r.text_any(&["subcategoryId", "topicId"]);
    let content = ItemContent::SampleAnswer {
        question: r.text("question"),
        answer: r.text("answer"),
        key_vocabulary: r.text_list("keyVocabulary"),
        tips: r.text_list("tips"),
        band_score: r.text("bandScore"),
    };
    let order = r.optional_integer("order").unwrap_or(0);
    let difficulty = r.optional_text("difficulty").unwrap_or_default();
    Some(Item {
        id: r.id().to_string(),
        subcategory_id,
        order,
        difficulty,
        content,
    })
}

fn pronunciation_item(
    value: &Value,
    position: usize,
    warnings: &mut Vec<ContentWarning>,
) -> Option<Item> {
    let mut r = FieldReader::identified(value, "Pronunciation", position, warnings)?;
    let subcategory_id = r.text_any(&["subcategoryId", "topicId"]);
    let content = ItemContent::Pronunciation {
        word: r.text("word"),
        ipa: r.text("ipa"),
        common_mistakes: r.text_list("commonMistakes"),
        example: r.text("example"),
        audio_file_name: r.optional_text("audioFileName"),
    };
    Some(Item {
        id: r.id().to_string(),
        subcategory_id,
        order: r.integer("order"),
        difficulty: r.text("difficulty"),
        content,
    })
}

/// Decode the primary lesson file.
pub fn lesson_data(name: &str, raw: &str) -> Result<Parsed<LessonData>, ContentLoadError> {
    let root = decode(name, raw)?;
    let root = top_level_object(name, &root)?;
    let mut warnings = Vec::new();

    let content = LessonData {
        categories: entries(root, "categories", &mut warnings, category),
        subcategories: entries(root, "subcategories", &mut warnings, subcategory),
        vocabulary_items: entries(root, "vocabularyItems", &mut warnings, vocabulary_item),
        idiom_items: entries(root, "idiomItems", &mut warnings, idiom_item),
        phrasal_verb_items: entries(root, "phrasalVerbItems", &mut warnings, phrasal_verb_item),
        sample_answers: entries(root, "sampleAnswers", &mut warnings, sample_answer),
        pronunciation_items: entries(root, "pronunciationItems", &mut warnings, pronunciation_item),
    };

    Ok(Parsed { content, warnings })
}

/// Decode the flat supplemental vocabulary array.
pub fn vocabulary_records(
    name: &str,
    raw: &str,
) -> Result<Parsed<Vec<VocabularyRecord>>, ContentLoadError> {
    let root = decode(name, raw)?;
    let values = root
        .as_array()
        .ok_or_else(|| ContentLoadError::parse(name, "expected a top-level array"))?;
    let mut warnings = Vec::new();

    let content = values
        .iter()
        .enumerate()
        .filter_map(|(position, value)| {
            let mut r = FieldReader::labelled(
                value,
                "VocabularyRecord",
                format!("#{position}"),
                &mut warnings,
            )?;
            let topic = r.text("topic");
            let sub_topic = r.text("subTopic");
            let word = r.text("word");
            let part_of_speech = r.text("partOfSpeech");
            let raw_level = r.text("cefrLevel");
            let cefr_level = CefrLevel::parse(&raw_level);
            if cefr_level.is_none() && !raw_level.is_empty() {
                r.warn("cefrLevel", format!("unknown level '{raw_level}', ignored"));
            }
            let examples = r.text_list("examples");
            Some(VocabularyRecord {
                topic,
                sub_topic,
                word,
                part_of_speech,
                cefr_level,
                examples,
            })
        })
        .collect();

    Ok(Parsed { content, warnings })
}

/// Decode a supplemental file of phrase groups keyed by group name.
/// Idioms and phrasal verbs share this shape.
pub fn phrase_groups(
    name: &str,
    raw: &str,
) -> Result<Parsed<BTreeMap<String, Vec<PhraseRecord>>>, ContentLoadError> {
    let root = decode(name, raw)?;
    let root = top_level_object(name, &root)?;
    let mut warnings = Vec::new();
    let mut content = BTreeMap::new();

    for (group, value) in root {
        let Some(values) = value.as_array() else {
            warnings.push(ContentWarning {
                entity: "PhraseGroup",
                entity_id: group.clone(),
                field: "*",
                reason: "expected an array, group skipped".into(),
            });
            continue;
        };

        let records: Vec<PhraseRecord> = values
            .iter()
            .enumerate()
            .filter_map(|(position, value)| {
                let mut r = FieldReader::labelled(
                    value,
                    "PhraseRecord",
                    format!("{group}#{position}"),
                    &mut warnings,
                )?;
                Some(PhraseRecord {
                    phrase: r.text_any(&["phrase", "idiom", "verb"]),
                    meaning: r.text("meaning"),
                    examples: r.text_list("examples"),
                })
            })
            .collect();

        content.insert(group.clone(), records);
    }

    Ok(Parsed { content, warnings })
}
