pub mod catalog;
pub mod parse;

pub use catalog::Catalog;
pub use parse::{ContentWarning, Parsed};

use crate::constants::LESSON_DATA_FILE;
use crate::error::ContentLoadError;
use crate::models::{ItemCollection, LessonData, SupplementalContent, SupplementalSource};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Reads the bundled content files from one directory.
pub struct ContentStore {
    content_dir: PathBuf,
}

impl ContentStore {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    fn read(&self, file_name: &str) -> Result<String, ContentLoadError> {
        let path = self.content_dir.join(file_name);
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ContentLoadError::FileNotFound { path }
            } else {
                ContentLoadError::Io { path, source }
            }
        })
    }

    /// Load the primary lesson file. There is no fallback content.
    pub fn load_catalog(&self) -> Result<Parsed<LessonData>, ContentLoadError> {
        let raw = self.read(LESSON_DATA_FILE)?;
        let parsed = parse::lesson_data(LESSON_DATA_FILE, &raw)?;
        info!(
            "Loaded {} categories, {} subcategories and {} items from {LESSON_DATA_FILE}",
            parsed.content.categories.len(),
            parsed.content.subcategories.len(),
            parsed.content.items().count()
        );
        log_warnings(LESSON_DATA_FILE, &parsed.warnings);
        Ok(parsed)
    }

    pub fn load_supplemental_collection(
        &self,
        source: SupplementalSource,
    ) -> Result<Parsed<ItemCollection>, ContentLoadError> {
        let name = source.file_name();
        let raw = self.read(name)?;
        let parsed = match source {
            SupplementalSource::Vocabulary => {
                let Parsed { content, warnings } = parse::vocabulary_records(name, &raw)?;
                Parsed {
                    content: ItemCollection::Vocabulary(content),
                    warnings,
                }
            }
            SupplementalSource::Idioms => {
                let Parsed { content, warnings } = parse::phrase_groups(name, &raw)?;
                Parsed {
                    content: ItemCollection::Idioms(content),
                    warnings,
                }
            }
            SupplementalSource::PhrasalVerbs => {
                let Parsed { content, warnings } = parse::phrase_groups(name, &raw)?;
                Parsed {
                    content: ItemCollection::PhrasalVerbs(content),
                    warnings,
                }
            }
        };
        info!("Loaded {} records from {name}", parsed.content.len());
        log_warnings(name, &parsed.warnings);
        Ok(parsed)
    }

    /// Load one supplemental collection, continuing with an empty one on failure.
    pub fn load_supplemental_or_empty(&self, source: SupplementalSource) -> ItemCollection {
        match self.load_supplemental_collection(source) {
            Ok(parsed) => parsed.content,
            Err(e) => {
                warn!("Skipping supplemental content: {e}");
                ItemCollection::empty(source)
            }
        }
    }

    /// Load every supplemental collection independently.
    pub fn load_all_supplemental(&self) -> SupplementalContent {
        let mut content = SupplementalContent::default();
        for source in SupplementalSource::ALL {
            content.insert(self.load_supplemental_or_empty(source));
        }
        content
    }
}

fn log_warnings(name: &str, warnings: &[ContentWarning]) {
    if warnings.is_empty() {
        return;
    }
    warn!("{name}: {} content defaults applied", warnings.len());
    for warning in warnings {
        log::debug!("{name}: {warning}");
    }
}
