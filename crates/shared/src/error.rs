use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed dataset json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dataset contains no pages")]
    Empty,
    #[error("invalid page number '{raw}': page numbers must be positive integers")]
    InvalidPageNumber { raw: String },
    #[error("page {missing} is missing; pages must be numbered 1..={page_count} without gaps")]
    MissingPage { missing: usize, page_count: usize },
    #[error("page {page} has no image pairs")]
    EmptyPage { page: usize },
    #[error("page {page} lists key '{key}' more than once")]
    DuplicateKey { page: usize, key: String },
    #[error("page {page} maps more than one key to value '{value}'")]
    DuplicateValue { page: usize, value: String },
}
