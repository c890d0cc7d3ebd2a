use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no deck named '{0}'")]
    NotFound(String),
    #[error("a deck named '{0}' already exists")]
    DuplicateName(String),
    #[error("cannot read or write file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid JSON document: {0}")]
    Malformed(String),
}
