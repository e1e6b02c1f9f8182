//! Crate error types

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// A fixed filter attribute could not be coerced from its raw parameter value
///
/// Carries both the attribute name and the external parameter name so callers
/// can report the offending field back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error setting field {field}: {reason}")]
pub struct FieldConversionError {
    /// Attribute name on [`FilterOptions`](crate::filter::FilterOptions)
    pub field: &'static str,
    /// External query parameter name
    pub param: &'static str,
    /// Why the value was rejected
    pub reason: String,
}

impl FieldConversionError {
    /// Create a new conversion error
    pub fn new(field: &'static str, param: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            param,
            reason: reason.into(),
        }
    }
}

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// A fixed filter parameter had a malformed value
    #[error(transparent)]
    FieldConversion(#[from] FieldConversionError),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
