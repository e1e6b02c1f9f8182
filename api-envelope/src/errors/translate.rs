//! Human-readable messages for validation, persistence and status failures

use std::error::Error as StdError;

use axum::http::StatusCode;

use super::classify::{find_in_chain, CONSTRAINT_PATTERNS, INVALID_SYNTAX_PATTERN};
use super::kind::{DatabaseError, DatabaseErrorKind};

const NOT_FOUND_MESSAGE: &str = "We couldn't find what you're looking for";
const CONNECTION_MESSAGE: &str = "We're having trouble connecting to our database. Please try again";
const ALREADY_EXISTS_MESSAGE: &str = "This information already exists in our system";
pub(crate) const UNKNOWN_DATABASE_MESSAGE: &str = "An unexpected database error occurred";

/// Message for one failed validation rule
///
/// `field` is humanized (`FirstName` becomes `first name`) before it is
/// placed in the sentence.
///
/// ```rust
/// use api_envelope::errors::translate_validation;
///
/// assert_eq!(translate_validation("Email", "required", ""), "Please provide email");
/// assert_eq!(
///     translate_validation("Password", "min", "8"),
///     "password must be at least 8 characters"
/// );
/// ```
pub fn translate_validation(field: &str, tag: &str, param: &str) -> String {
    let field = humanize_field_name(field);
    match tag {
        "required" => format!("Please provide {field}"),
        "email" => format!("Please enter a valid email address for {field}"),
        "min" => format!("{field} must be at least {param} characters"),
        "max" => format!("{field} cannot be longer than {param} characters"),
        "gte" => format!("{field} must be {param} or greater"),
        "lte" => format!("{field} must be {param} or less"),
        "url" => format!("Please enter a valid URL for {field}"),
        "datetime" => format!("Please enter a valid date and time for {field}"),
        _ => format!("{field} has an invalid value"),
    }
}

/// Message for a value of the wrong type
pub fn translate_type_conversion(field: &str, expected: &str) -> String {
    format!("Invalid value for {field}. Expected {expected}")
}

/// `camelCase` or `PascalCase` to `snake_case`
///
/// An underscore goes before every ASCII uppercase letter except the first
/// character, then everything is lowercased. Runs of capitals are not merged,
/// so `ID` becomes `i_d`.
pub fn to_snake_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, ch) in field.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(ch);
    }
    out.to_lowercase()
}

/// Space-separated lowercase words
pub fn humanize_field_name(field: &str) -> String {
    to_snake_case(field).split('_').collect::<Vec<_>>().join(" ")
}

/// User-facing message for a persistence failure, `None` if `err` is not one
///
/// Sentinels are checked before message patterns. A [`DatabaseError`] that
/// matches no pattern still gets a generic database message.
pub fn database_error_message(err: &(dyn StdError + 'static)) -> Option<&'static str> {
    match find_in_chain::<DatabaseError>(err) {
        Some(db) => Some(match db.kind {
            DatabaseErrorKind::NoRows => NOT_FOUND_MESSAGE,
            DatabaseErrorKind::ConnectionClosed => CONNECTION_MESSAGE,
            DatabaseErrorKind::Other => {
                pattern_message(&db.message).unwrap_or(UNKNOWN_DATABASE_MESSAGE)
            }
        }),
        None => pattern_message(&err.to_string()),
    }
}

fn pattern_message(message: &str) -> Option<&'static str> {
    let [unique, foreign_key, not_null] = CONSTRAINT_PATTERNS;
    if message.contains(unique) {
        Some(ALREADY_EXISTS_MESSAGE)
    } else if message.contains(foreign_key) {
        Some("This operation references invalid or non-existent data")
    } else if message.contains(not_null) {
        Some("Required information is missing")
    } else if message.contains(INVALID_SYNTAX_PATTERN) {
        Some("The provided data format is invalid")
    } else {
        None
    }
}

/// HTTP status and message for a persistence failure
///
/// | failure                         | status |
/// |---------------------------------|--------|
/// | no matching row                 | 404    |
/// | connection closed               | 500    |
/// | message has `unique constraint` | 409    |
/// | anything else                   | 500    |
pub fn translate_persistence(err: &(dyn StdError + 'static)) -> (StatusCode, &'static str) {
    let message = match find_in_chain::<DatabaseError>(err) {
        Some(db) => match db.kind {
            DatabaseErrorKind::NoRows => return (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            DatabaseErrorKind::ConnectionClosed => {
                return (StatusCode::INTERNAL_SERVER_ERROR, CONNECTION_MESSAGE)
            }
            DatabaseErrorKind::Other => db.message.clone(),
        },
        None => err.to_string(),
    };

    if message.contains(CONSTRAINT_PATTERNS[0]) {
        (StatusCode::CONFLICT, ALREADY_EXISTS_MESSAGE)
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN_DATABASE_MESSAGE)
    }
}

/// Friendly default message for a status code
///
/// Codes without a tailored message fall back to the canonical reason phrase,
/// or an empty string if there is none.
pub fn default_message_for_status(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "We couldn't process your request due to invalid input",
        401 => "Please authenticate to access this resource",
        403 => "You don't have permission to access this resource",
        404 => "The requested resource couldn't be found",
        409 => "This operation conflicts with an existing resource",
        422 => "The submitted data failed validation",
        429 => "You've exceeded the allowed number of requests. Please try again later",
        500 => "An unexpected error occurred. Our team has been notified",
        503 => "The service is temporarily unavailable. Please try again later",
        _ => status.canonical_reason().unwrap_or_default(),
    }
    .to_string()
}
