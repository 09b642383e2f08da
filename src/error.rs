use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a bundled content file
#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("Content file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {name}: {reason}")]
    ParseError { name: String, reason: String },
}

impl ContentLoadError {
    pub(crate) fn parse(name: &str, reason: impl Into<String>) -> Self {
        Self::ParseError {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure to read or write the local key-value store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_message_includes_path() {
        let err = ContentLoadError::FileNotFound {
            path: PathBuf::from("/content/lesson_data.json"),
        };
        assert!(err.to_string().contains("lesson_data.json"));
    }

    #[test]
    fn test_parse_error_message() {
        let err = ContentLoadError::parse("idioms_data.json", "expected an object");
        assert_eq!(err.to_string(), "Failed to parse idioms_data.json: expected an object");
    }
}
