// src/constants.rs

/// Seconds in one day (24 * 60 * 60)
pub const SECS_PER_DAY: i64 = 86400;

/// Highest mastery level an item can reach
pub const MAX_MASTERY_LEVEL: u8 = 5;

/// Primary lesson content file
pub const LESSON_DATA_FILE: &str = "lesson_data.json";

/// Supplemental content files
pub const VOCABULARY_DATA_FILE: &str = "vocabulary_data.json";
pub const IDIOMS_DATA_FILE: &str = "idioms_data.json";
pub const PHRASAL_VERBS_DATA_FILE: &str = "phrasal_verbs_data.json";

/// Key holding the serialized `UserProgress` aggregate
pub const PROGRESS_KEY: &str = "userProgress";

/// Key holding the data version tag
pub const DATA_VERSION_KEY: &str = "dataVersion";

/// Data version the running code expects
pub const CURRENT_DATA_VERSION: &str = "1.0";

/// Version assumed when no tag has been recorded (fresh or pre-versioning installs)
pub const UNVERSIONED_DATA_VERSION: &str = "0.0";

/// Categories whose subcategories are derived from supplemental item groupings
pub const VOCABULARY_CATEGORY_ID: &str = "vocabulary";
pub const IDIOMS_CATEGORY_ID: &str = "idioms";
pub const PHRASAL_VERBS_CATEGORY_ID: &str = "phrasal_verbs";

/// Category listing sample-answer topics that have no authored subcategory
pub const SAMPLE_ANSWERS_CATEGORY_ID: &str = "sample_answers";

/// Single local user
pub const DEFAULT_USER_ID: &str = "default_user";

/// Colors assigned to derived subcategories, cycled by group index
pub const SUBCATEGORY_PALETTE: &[&str] = &[
    "#4A90E2", "#50C878", "#F5A623", "#9B59B6", "#E74C3C", "#1ABC9C", "#F39C12", "#34495E",
];

/// Fallback color when a content entry carries none
pub const DEFAULT_COLOR: &str = "#4A90E2";
