use std::path::PathBuf;

use thiserror::Error;

/// Why a question record was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("question {0}: no question text")]
    MissingText(i64),
    #[error("question {0}: no options")]
    MissingOptions(i64),
    #[error("question {0}: no correct answer")]
    MissingAnswer(i64),
    #[error("question {number}: answer '{answer}' is not a set of option letters")]
    InvalidAnswer { number: i64, answer: String },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid question file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
