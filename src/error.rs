use thiserror::Error;

use crate::types::SEPARATOR;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("malformed labels: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no arguments passed in")]
    NoArguments,

    #[error("form '{0}' does not exist")]
    FormNotFound(String),

    #[error("label '{label}' for form '{form}' not found")]
    LabelNotFound { form: String, label: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("'{value}' must be between {min} - {max} characters long")]
    InvalidLength {
        value: String,
        min: usize,
        max: usize,
    },

    #[error("'{0}' must contain only letters")]
    InvalidCharset(String),

    #[error("flag '{0}' contains the separator '{SEPARATOR}' while not being repeatable")]
    SeparatorMisuse(String),

    #[error("name '{0}' was used in at least two separate labels")]
    DuplicateLabel(String),

    #[error("name '{0}' is reserved")]
    ReservedName(String),

    #[error("position has to be in range between: 1 - {max}, got {position}")]
    InvalidPosition { position: i64, max: i64 },

    #[error("form '{0}' is built in and cannot be modified")]
    Protected(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
