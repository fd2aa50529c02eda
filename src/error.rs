//! Error types surfaced by the library layer.
//!
//! Malformed quoting and ragged rows are never errors: the tokenizer degrades
//! gracefully and the reader pads or truncates silently. Only failures to
//! reach the underlying source/sink and registry lookups are reported.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialectError {
    #[error("Failed to open {path:?}: {source}")]
    IoOpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Dialect '{0}' not found")]
    UnknownDialect(String),
    #[error("Invalid dialect: {0}")]
    InvalidDialect(String),
    #[error("Failed to load dialects from {path:?}: {message}")]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DialectError>;
