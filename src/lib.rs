pub mod catalog;
pub mod constants;
pub mod content;
pub mod db;
pub mod error;
pub mod migration;
pub mod models;
pub mod progress;
#[cfg(test)]
mod test_utils;
pub mod validation;

pub use catalog::{CatalogEvent, CatalogService, VocabularyFilter};
pub use content::{Catalog, ContentStore};
pub use error::{ContentLoadError, PersistenceError};
pub use migration::{MigrationManager, MigrationOutcome, SchemaState};
pub use progress::ProgressStore;

use crate::db::{migrations, Database, KeyValueStore};
use crate::validation::validate_catalog;
use directories::ProjectDirs;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Error type for startup failures
#[derive(Debug)]
pub enum InitError {
    NoProjectDirs,
    DataDirCreation(std::io::Error),
    DatabaseOpen(rusqlite::Error),
    Schema(rusqlite::Error),
    Migration(PersistenceError),
    Content(ContentLoadError),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::NoProjectDirs => write!(f, "Could not determine project directories"),
            InitError::DataDirCreation(e) => write!(f, "Could not create data directory: {e}"),
            InitError::DatabaseOpen(e) => write!(f, "Failed to open database: {e}"),
            InitError::Schema(e) => write!(f, "Failed to create database schema: {e}"),
            InitError::Migration(e) => write!(f, "Failed to migrate stored data: {e}"),
            InitError::Content(e) => write!(f, "Failed to load lesson content: {e}"),
        }
    }
}

impl std::error::Error for InitError {}

/// Where content is read from and progress is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub content_dir: PathBuf,
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Content from `content_dir`, database under the platform data directory.
    pub fn new(content_dir: impl Into<PathBuf>) -> Result<Self, InitError> {
        let proj_dirs =
            ProjectDirs::from("com", "ieltspeak", "IELTSpeak").ok_or(InitError::NoProjectDirs)?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
        Ok(Self::with_db_path(content_dir, data_dir.join("ieltspeak.db")))
    }

    pub fn with_db_path(content_dir: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            db_path: db_path.into(),
        }
    }
}

fn open_store(db_path: &Path) -> Result<KeyValueStore, InitError> {
    let db = Database::open(db_path).map_err(InitError::DatabaseOpen)?;
    migrations::run(db.connection()).map_err(InitError::Schema)?;
    Ok(KeyValueStore::new(Arc::new(Mutex::new(db))))
}

/// Open storage, migrate it, load and check content, then load progress.
/// Must finish before any catalog access.
pub fn bootstrap(config: &AppConfig) -> Result<CatalogService, InitError> {
    let kv = open_store(&config.db_path)?;

    let outcome = MigrationManager::new(kv.clone())
        .migrate_if_needed()
        .map_err(InitError::Migration)?;
    debug!("Data migration: {outcome:?}");

    let content = ContentStore::new(&config.content_dir);
    let lesson = content.load_catalog().map_err(InitError::Content)?.content;
    let catalog = Catalog::new(lesson, content.load_all_supplemental());

    let issues = validate_catalog(&catalog);
    if !issues.is_empty() {
        warn!("Lesson content has {} validation issues", issues.len());
        for issue in &issues {
            debug!("{issue}");
        }
    }

    let service = CatalogService::new(catalog, ProgressStore::new(kv));
    info!(
        "Catalog ready with {} categories from {}",
        service.catalog().categories().len(),
        content.content_dir().display()
    );
    Ok(service)
}

/// Run [`bootstrap`] on a background thread.
pub fn spawn_bootstrap(config: AppConfig) -> JoinHandle<Result<CatalogService, InitError>> {
    thread::spawn(move || {
        bootstrap(&config).inspect_err(|e| error!("Startup failed: {e}"))
    })
}
