//! Validation error model.

use thiserror::Error;

/// Result type used across the parsing layer.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Failure to narrow an untyped JSON value into the expected shape.
///
/// Every variant is recoverable: callers either reject the response or log and
/// move on. Nothing here is process-fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("validation for string failed: {0}")]
    NotString(String),

    #[error("validation for number failed: {0}")]
    NotNumber(String),

    #[error("validation for boolean failed: {0}")]
    NotBoolean(String),

    #[error("validation for array failed: {0}")]
    NotArray(String),

    /// The value is not a string, or not a member of the accepted universe.
    #[error("validation for enum({value}) failed: expected one of {}", .accepted.join(", "))]
    InvalidEnum {
        value: String,
        accepted: Vec<&'static str>,
    },

    /// A structural check failed; lists every key the record requires.
    #[error("missing keys {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),

    #[error("validation for unix timestamp failed: {0}")]
    InvalidTimestamp(String),

    #[error("validation for date time failed: {0}")]
    InvalidDateTime(String),

    /// A field-level failure, tagged with the key that failed.
    #[error("{field}: {source}")]
    Field {
        field: &'static str,
        source: Box<ValidationError>,
    },

    /// A well-typed string that does not match the expected input pattern.
    #[error("{field} has an invalid format")]
    Format { field: &'static str },

    /// Aggregate failure of a profile list; only the first failing element is kept.
    #[error("failed to parse profiles{}: {source}", element_suffix(.index))]
    Profiles {
        /// Failing element, or `None` when the list itself was malformed.
        index: Option<usize>,
        source: Box<ValidationError>,
    },
}

fn element_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(": element {i}")).unwrap_or_default()
}

impl ValidationError {
    /// Tag this error with the field it occurred on.
    pub fn at(self, field: &'static str) -> Self {
        Self::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping field and aggregate wrappers.
    pub fn root_cause(&self) -> &ValidationError {
        match self {
            Self::Field { source, .. } | Self::Profiles { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Short, log-friendly rendering of an offending JSON value.
pub(crate) fn describe(value: &serde_json::Value) -> String {
    const MAX: usize = 64;
    let rendered = value.to_string();
    if rendered.len() <= MAX {
        return rendered;
    }
    let mut end = MAX;
    while !rendered.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &rendered[..end])
}
