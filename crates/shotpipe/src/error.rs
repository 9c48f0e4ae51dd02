//! Error types for the shotpipe core
//!
//! Every failure here is fatal to the single publish operation in
//! progress; the surrounding hooks are responsible for reporting it
//! without taking the host process down.

use thiserror::Error;

/// Errors raised by the template engine and the publish computations
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A path does not match the template grammar
    #[error("path '{path}' does not match template '{template}'")]
    Format { template: String, path: String },

    /// A template definition string could not be parsed
    #[error("invalid definition for template '{template}': {reason}")]
    InvalidDefinition { template: String, reason: String },

    /// A definition references a field with no declared key
    #[error("template '{template}' references unknown field '{field}'")]
    UnknownKey { template: String, field: String },

    /// A required field was absent when rendering a path
    #[error("missing required field '{field}' for template '{template}'")]
    MissingField { template: String, field: String },

    /// A value does not fit the declared type of its field
    #[error("value '{value}' is not valid for field '{field}'")]
    InvalidValue { field: String, value: String },

    /// The maximum of an empty version set was requested
    #[error("no versions found for template '{template}'")]
    EmptyVersionSet { template: String },
}

/// Shorthand result type for shotpipe operations
pub type Result<T> = std::result::Result<T, TemplateError>;
