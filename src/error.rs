// Error type shared by the parsers and the generator.
// main() boxes these, so every variant's Display is the user-facing message.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON whose shape does not match the permission document
    /// (missing `groups`/`permissions`, a record without `name`/`groups`, wrong types).
    #[error("{path} has an unexpected structure: {detail}")]
    Structure { path: PathBuf, detail: String },

    #[error("{path} has no header row")]
    EmptyMatrix { path: PathBuf },

    #[error("strict mode rejected the document: {}", .problems.join("; "))]
    Validation { problems: Vec<String> },
}

impl SeedError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeedError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeedError::Write {
            path: path.into(),
            source,
        }
    }

    // serde_json reports shape mismatches as Category::Data; those are structural
    // problems with the document rather than broken JSON.
    pub fn from_json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        let path = path.into();
        match source.classify() {
            serde_json::error::Category::Data => SeedError::Structure {
                path,
                detail: source.to_string(),
            },
            _ => SeedError::Json { path, source },
        }
    }
}
