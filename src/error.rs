//! Error types for the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input root not found: {0:?}")]
    InputRootNotFound(PathBuf),

    #[error("Missing '{field}' field in {file:?}")]
    MissingField { file: PathBuf, field: &'static str },

    #[error("Invalid timestamp '{value}' in {file:?}")]
    InvalidTimestamp { file: PathBuf, value: String },

    #[error("Note has no categories: {0:?}")]
    NoCategories(PathBuf),

    #[error("No matching folder for segment '{segment}' while resolving '{path}'")]
    Unresolved { path: String, segment: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
