//! Error type shared by the import/export, review and quiz layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),

    #[error("Question not found: {0}")]
    QuestionNotFound(i64),

    #[error("No questions available")]
    NoQuestions,

    #[error("Cannot determine home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, Error>;
