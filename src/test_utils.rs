//! Shared test utilities and content fixtures.

#![cfg(test)]

use crate::constants::LESSON_DATA_FILE;
use crate::content::{parse, Catalog};
use crate::db::{migrations, Database, KeyValueStore};
use crate::models::{SupplementalContent, SupplementalSource};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Primary lesson file: five categories, one authored category with three
/// subcategories, and sample answers for two topics without an authored row.
/// Every field is present so decoding applies no defaults.
pub const LESSON_JSON: &str = r##"{
  "categories": [
    {"id": "vocabulary", "title": "Vocabulary", "description": "Topic words", "icon": "book",
     "colorHex": "#4A90E2", "lessonCount": 5, "illustration": "vocabulary.png"},
    {"id": "idioms", "title": "Idioms", "description": "Natural expressions", "icon": "quote",
     "colorHex": "#50C878", "lessonCount": 3, "illustration": "idioms.png"},
    {"id": "phrasal_verbs", "title": "Phrasal Verbs", "description": "Verbs with particles",
     "icon": "link", "colorHex": "#9B59B6", "lessonCount": 2, "illustration": "phrasal.png"},
    {"id": "speaking", "title": "Speaking", "description": "Speaking practice", "icon": "mic",
     "colorHex": "#F5A623", "lessonCount": 4, "illustration": "speaking.png"},
    {"id": "sample_answers", "title": "Sample Answers", "description": "Model answers",
     "icon": "star", "colorHex": "#E74C3C", "lessonCount": 2, "illustration": "answers.png"}
  ],
  "subcategories": [
    {"id": "linking-words", "categoryId": "speaking", "title": "Linking Words",
     "description": "Connect your ideas", "itemCount": 0, "colorHex": "#9B59B6", "order": 2},
    {"id": "part1-hometown", "categoryId": "speaking", "title": "Part 1: Hometown",
     "description": "Talk about where you live", "itemCount": 1, "colorHex": "#E74C3C", "order": 0},
    {"id": "core-words", "categoryId": "speaking", "title": "Core Words",
     "description": "Words for every answer", "itemCount": 4, "colorHex": "#1ABC9C", "order": 1}
  ],
  "vocabularyItems": [
    {"id": "core-4", "subcategoryId": "core-words", "word": "moreover",
     "definition": "in addition", "example": "Moreover, it is cheap.", "order": 3,
     "difficulty": "medium"},
    {"id": "core-2", "subcategoryId": "core-words", "word": "bustling",
     "definition": "full of activity", "example": "A bustling market.", "order": 1,
     "difficulty": "easy", "audioFileName": "bustling.mp3"},
    {"id": "core-3", "subcategoryId": "core-words", "word": "commute",
     "definition": "travel to work", "example": "My commute is short.", "order": 2,
     "difficulty": "easy"},
    {"id": "core-1", "subcategoryId": "core-words", "word": "abundant",
     "definition": "existing in large amounts", "example": "Abundant green spaces.", "order": 0,
     "difficulty": "hard"}
  ],
  "idiomItems": [],
  "phrasalVerbItems": [],
  "sampleAnswers": [
    {"id": "hometown-1", "topicId": "part1-hometown", "question": "Where is your hometown?",
     "answer": "I come from a bustling coastal city.", "keyVocabulary": ["bustling", "coastal"],
     "tips": ["Extend your answer"], "bandScore": "7.0"},
    {"id": "study-1", "topicId": "work-or-study", "question": "Do you work or study?",
     "answer": "I am a full-time student of engineering.", "keyVocabulary": ["full-time"],
     "tips": ["Give a reason"], "bandScore": "6.5"},
    {"id": "hometown-2", "topicId": "hometown", "question": "What do you like about it?",
     "answer": "The abundant parks and friendly people.", "keyVocabulary": ["abundant"],
     "tips": ["Use examples"], "bandScore": "7.5"}
  ],
  "pronunciationItems": []
}"##;

pub const VOCABULARY_JSON: &str = r#"[
  {"topic": "travel", "subTopic": "documents", "word": "passport", "partOfSpeech": "noun",
   "cefrLevel": "B1", "examples": ["Check your passport."]},
  {"topic": "travel", "subTopic": "places", "word": "airport", "partOfSpeech": "noun",
   "cefrLevel": "B1", "examples": ["The airport was crowded."]},
  {"topic": "travel", "subTopic": "planning", "word": "itinerary", "partOfSpeech": "noun",
   "cefrLevel": "B2", "examples": ["Our itinerary is flexible."]},
  {"topic": "work", "subTopic": "planning", "word": "deadline", "partOfSpeech": "noun",
   "cefrLevel": "B1", "examples": ["The deadline is Friday."]},
  {"topic": "work", "subTopic": "people", "word": "colleague", "partOfSpeech": "noun",
   "cefrLevel": "A2", "examples": ["My colleague helped me."]}
]"#;

pub const IDIOMS_JSON: &str = r#"{
  "transport-by-car": [
    {"phrase": "in the driver's seat", "meaning": "in control",
     "examples": ["She is in the driver's seat now."]},
    {"phrase": "hit the road", "meaning": "leave", "examples": ["Time to hit the road."]}
  ],
  "feelings": [
    {"phrase": "over the moon", "meaning": "very happy", "examples": ["I was over the moon."]}
  ]
}"#;

pub const PHRASAL_VERBS_JSON: &str = r#"{
  "work": [
    {"verb": "carry out", "meaning": "perform a task", "examples": ["We carried out a survey."]},
    {"phrase": "take on", "meaning": "accept work", "examples": ["She took on a new project."]}
  ],
  "feelings": [
    {"phrase": "cheer up", "meaning": "become happier", "examples": ["Cheer up, it's Friday."]}
  ]
}"#;

/// Create a temporary test database with migrations applied.
///
/// Returns a tuple of (Database, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_db() -> (Database, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection()).expect("Failed to run migrations on test DB");
    (db, dir)
}

/// Key-value store over a fresh test database.
pub fn setup_test_store() -> (KeyValueStore, TempDir) {
    let (db, dir) = setup_test_db();
    (KeyValueStore::new(Arc::new(Mutex::new(db))), dir)
}

/// Catalog built from every fixture.
pub fn sample_catalog() -> Catalog {
    let lesson = parse::lesson_data(LESSON_DATA_FILE, LESSON_JSON)
        .expect("Failed to parse lesson fixture")
        .content;
    let supplemental = SupplementalContent {
        vocabulary: parse::vocabulary_records("vocabulary", VOCABULARY_JSON)
            .expect("Failed to parse vocabulary fixture")
            .content,
        idioms: parse::phrase_groups("idioms", IDIOMS_JSON)
            .expect("Failed to parse idioms fixture")
            .content,
        phrasal_verbs: parse::phrase_groups("phrasal_verbs", PHRASAL_VERBS_JSON)
            .expect("Failed to parse phrasal verbs fixture")
            .content,
    };
    Catalog::new(lesson, supplemental)
}

/// Directory holding the lesson, vocabulary and idioms fixtures. No phrasal
/// verbs file is written.
pub fn write_content_dir() -> TempDir {
    let dir = tempdir().expect("Failed to create temp content directory");
    let files = [
        (LESSON_DATA_FILE, LESSON_JSON),
        (SupplementalSource::Vocabulary.file_name(), VOCABULARY_JSON),
        (SupplementalSource::Idioms.file_name(), IDIOMS_JSON),
    ];
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("Failed to write content fixture");
    }
    dir
}
