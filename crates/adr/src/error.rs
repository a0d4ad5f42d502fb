//! Errors raised by ADR operations

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort an ADR operation
#[derive(Error, Debug)]
pub enum AdrError {
    #[error("ADR index not found: {0}")]
    IndexMissing(PathBuf),

    #[error("Failed to parse ADR index {path}: {message}")]
    IndexParse { path: PathBuf, message: String },

    #[error("ADR already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("File not found: {0}")]
    SourceMissing(PathBuf),

    #[error("{id} references a missing file: {path}")]
    ReferencedFileMissing { id: String, path: PathBuf },

    #[error("Title '{0}' does not contain any letters or digits")]
    EmptySlug(String),

    #[error("Permission denied for {label} ({key})")]
    PermissionDenied { label: String, key: String },

    #[error("'{0}' not found on PATH")]
    MissingBinary(String),

    #[error("{program} exited with {}", describe_code(.code))]
    CommandFailed { program: String, code: Option<i32> },

    #[error("No index record references {0}")]
    UnregisteredFile(PathBuf),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}
