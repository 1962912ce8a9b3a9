//! Shared error types for the synthesis pipeline.
//!
//! Error codes are assigned by category:
//! - E001-E009: I/O and filesystem errors
//! - E010-E019: Parse errors
//! - E020-E029: Configuration errors
//! - E030-E039: Schema errors
//! - E040-E049: Conversion errors
//! - E050-E059: Collaborator (fetch/store) errors

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Parse error - unsupported file type
    pub const PARSE_UNSUPPORTED: ErrorCode = ErrorCode("E011");
    /// Parse error - content does not match its declared structure
    pub const PARSE_MALFORMED: ErrorCode = ErrorCode("E012");

    /// Config error - generic
    pub const CONFIG_GENERIC: ErrorCode = ErrorCode("E029");

    /// Schema error - module content violates its field descriptors
    pub const SCHEMA_VIOLATION: ErrorCode = ErrorCode("E030");

    /// Conversion error - value of unexpected shape
    pub const CONVERSION_SHAPE: ErrorCode = ErrorCode("E040");
    /// Conversion error - format pair not supported
    pub const CONVERSION_UNSUPPORTED: ErrorCode = ErrorCode("E041");
    /// Conversion error - capability not granted to caller
    pub const CONVERSION_NOT_ENTITLED: ErrorCode = ErrorCode("E042");
    /// Conversion error - renderer failure
    pub const CONVERSION_RENDER: ErrorCode = ErrorCode("E043");

    /// Fetch error
    pub const FETCH_GENERIC: ErrorCode = ErrorCode("E050");
    /// Store error
    pub const STORE_GENERIC: ErrorCode = ErrorCode("E051");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-file parse failures. These never abort a batch; the mapper records
/// them as a module diagnostic.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum ParseError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Malformed content in {path}: {reason}")]
    MalformedContent { path: String, reason: String },
}

impl ParseError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedType(_) => ErrorCode::PARSE_UNSUPPORTED,
            Self::MalformedContent { .. } => ErrorCode::PARSE_MALFORMED,
        }
    }
}

/// A module whose content breaks its schema. Fatal to assembly.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("Schema violation in module {module_id}, field `{field}`: {reason}")]
pub struct SchemaViolation {
    pub module_id: u32,
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(module_id: u32, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            module_id,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a single conversion call.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Expected {expected} at `{at}`, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
        at: String,
    },

    #[error("Conversion from {from} to {to} is not supported")]
    Unsupported { from: String, to: String },

    #[error("{0} output is not available for this caller")]
    NotEntitled(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConversionError {
    pub fn shape(expected: &'static str, found: &serde_json::Value, at: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            expected,
            found: value_kind(found),
            at: at.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedShape { .. } | Self::Json(_) => ErrorCode::CONVERSION_SHAPE,
            Self::Unsupported { .. } => ErrorCode::CONVERSION_UNSUPPORTED,
            Self::NotEntitled(_) => ErrorCode::CONVERSION_NOT_ENTITLED,
            Self::Render(_) => ErrorCode::CONVERSION_RENDER,
        }
    }
}

/// Human name of a JSON value's type, for error messages and schema checks.
pub fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Main error type for designmap operations
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Content fetcher errors
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Key-value store errors
    #[error("Store error: {message}")]
    Store {
        message: String,
        path: Option<PathBuf>,
    },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    pub fn store(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Store {
            message: message.into(),
            path,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(e) => e.code(),
            Self::Schema(_) => ErrorCode::SCHEMA_VIOLATION,
            Self::Conversion(e) => e.code(),
            Self::Configuration(_) | Self::Pattern(_) => ErrorCode::CONFIG_GENERIC,
            Self::Fetch(_) => ErrorCode::FETCH_GENERIC,
            Self::Store { .. } => ErrorCode::STORE_GENERIC,
            Self::WithContext { .. } | Self::Io(_) => ErrorCode::IO_GENERIC,
            Self::Json(_) => ErrorCode::CONVERSION_SHAPE,
        }
    }

    /// Process exit code for the CLI.
    ///
    /// - 2: caller input problems (config, conversion request, schema)
    /// - 3: source problems (parse, fetch)
    /// - 1: everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_)
            | Self::Pattern(_)
            | Self::Conversion(_)
            | Self::Schema(_) => 2,
            Self::Parse(_) | Self::Fetch(_) => 3,
            _ => 1,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_violation_message_names_field() {
        let err = SchemaViolation::new(10, "lng", "required field is missing");
        assert_eq!(
            err.to_string(),
            "Schema violation in module 10, field `lng`: required field is missing"
        );
    }

    #[test]
    fn test_parse_error_codes() {
        assert_eq!(
            ParseError::UnsupportedType("yaml".into()).code(),
            ErrorCode::PARSE_UNSUPPORTED
        );
        assert_eq!(
            ParseError::malformed("a.json", "eof").code(),
            ErrorCode::PARSE_MALFORMED
        );
    }

    #[test]
    fn test_conversion_shape_reports_found_kind() {
        let err = ConversionError::shape("object", &json!([1, 2]), "modules[0].content");
        assert!(err.to_string().contains("found array"));
        assert_eq!(err.code(), ErrorCode::CONVERSION_SHAPE);
    }

    #[test]
    fn test_error_exit_codes() {
        let schema: Error = SchemaViolation::new(1, "p_s", "bad").into();
        assert_eq!(schema.exit_code(), 2);
        assert_eq!(schema.code(), ErrorCode::SCHEMA_VIOLATION);

        let fetch = Error::Fetch("gone".into());
        assert_eq!(fetch.exit_code(), 3);
    }

    #[test]
    fn test_with_context_keeps_message() {
        let result: Result<()> = Err(Error::Configuration("bad toml".into()));
        let err = result.context("loading config").unwrap_err();
        assert_eq!(
            err.to_string(),
            "loading config: Configuration error: bad toml"
        );
    }
}
