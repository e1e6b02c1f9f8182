//! Error categories and the concrete error types callers hand to the translator

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

/// Category assigned to a failure by [`classify`](super::classify)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// One or more field-level rule violations
    Validation,
    /// A decode step received a value of the wrong type
    TypeConversion,
    /// The requested row does not exist
    NotFound,
    /// The database connection is gone
    Connection,
    /// A unique, foreign-key or not-null constraint rejected the write
    ConstraintViolation,
    /// Any other persistence failure
    UnknownDatabase,
    /// Everything else
    General,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::TypeConversion => write!(f, "type_conversion"),
            Self::NotFound => write!(f, "not_found"),
            Self::Connection => write!(f, "connection"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::UnknownDatabase => write!(f, "unknown_database"),
            Self::General => write!(f, "general"),
        }
    }
}

impl ErrorKind {
    /// Whether the failure came from the persistence layer
    #[must_use]
    pub const fn is_database(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::Connection | Self::ConstraintViolation | Self::UnknownDatabase
        )
    }

    /// Suggested HTTP status for this kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TypeConversion => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ConstraintViolation => StatusCode::CONFLICT,
            Self::Connection | Self::UnknownDatabase | Self::General => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Sentinel failures reported by a database driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseErrorKind {
    /// A single-row query matched nothing
    NoRows,
    /// The connection was already closed
    ConnectionClosed,
    /// Anything else; the message is matched against known patterns
    Other,
}

/// A persistence-layer failure
///
/// Drivers differ, so adapters map their errors onto this shape before handing
/// them to [`StandardErrorResponse::add_error`](super::StandardErrorResponse::add_error).
///
/// ```rust
/// use api_envelope::errors::{classify, DatabaseError, ErrorKind};
///
/// let err = DatabaseError::other("duplicate key value violates unique constraint \"users_email_key\"");
/// assert_eq!(classify(&err), ErrorKind::ConstraintViolation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DatabaseError {
    pub kind: DatabaseErrorKind,
    pub message: String,
}

impl DatabaseError {
    pub fn new(kind: DatabaseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn no_rows() -> Self {
        Self::new(DatabaseErrorKind::NoRows, "no rows in result set")
    }

    pub fn connection_closed() -> Self {
        Self::new(
            DatabaseErrorKind::ConnectionClosed,
            "connection is already closed",
        )
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(DatabaseErrorKind::Other, message)
    }
}

/// One failed rule on one field, as reported by a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name as declared, usually camel case
    pub field: String,
    /// Constraint tag, e.g. `required` or `min`
    pub tag: String,
    /// Constraint parameter, e.g. `8` for `min=8`
    pub param: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
            param: String::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }
}

/// Every rule violation found while validating one value
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed on {} field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation
    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }
}

impl FromIterator<FieldViolation> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = FieldViolation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A decoded value had the wrong type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {field}: expected {expected}")]
pub struct TypeConversionError {
    /// Offending field, as named in the payload
    pub field: String,
    /// Name of the expected type
    pub expected: String,
}

impl TypeConversionError {
    pub fn new(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
        }
    }
}
