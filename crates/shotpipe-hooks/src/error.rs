//! Error types for the hook layer

use thiserror::Error;

/// Hook-level errors
///
/// A hook error aborts the single publish action in progress. The host
/// application keeps running; the orchestration layer reports the failure
/// to the user and lets sibling tasks continue.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("template error: {0}")]
    Template(#[from] shotpipe::TemplateError),

    #[error("file '{path}' is not a valid work path, unable to publish")]
    InvalidWorkPath { path: String },

    #[error("the published file '{path}' already exists")]
    PublishExists { path: String },

    #[error("scene error: {0}")]
    Scene(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("configuration error: {setting} - {reason}")]
    Config { setting: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hook operations
pub type Result<T> = std::result::Result<T, HookError>;
