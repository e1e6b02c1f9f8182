//! Error taxonomy, translation and the standard error envelope
//!
//! Any failure can be turned into a `{code, message, errors, request_id?}`
//! envelope. [`classify`] picks the category, the translators produce the
//! user-facing text, and [`StandardErrorResponse`] collects the entries.
//!
//! # Example
//!
//! ```rust
//! use api_envelope::errors::{FieldViolation, StandardErrorResponse, ValidationErrors};
//! use axum::http::StatusCode;
//!
//! let violations = ValidationErrors(vec![
//!     FieldViolation::new("EmailAddress", "email"),
//! ]);
//!
//! let mut response = StandardErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY);
//! response.add_error(&violations);
//!
//! assert_eq!(response.errors[0].field, "email_address");
//! assert_eq!(
//!     response.errors[0].message,
//!     "Please enter a valid email address for email address"
//! );
//! ```

mod classify;
mod kind;
mod response;
mod translate;

pub use classify::classify;
pub use kind::{
    DatabaseError, DatabaseErrorKind, ErrorKind, FieldViolation, TypeConversionError,
    ValidationErrors,
};
pub use response::{
    handle_error, ErrorEntry, HttpError, StandardErrorResponse, DATABASE_FIELD, ERROR_FIELD,
    GENERAL_FIELD,
};
pub use translate::{
    database_error_message, default_message_for_status, humanize_field_name, to_snake_case,
    translate_persistence, translate_type_conversion, translate_validation,
};
