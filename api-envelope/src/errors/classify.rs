//! Mapping arbitrary errors onto an [`ErrorKind`]

use std::error::Error as StdError;

use super::kind::{DatabaseError, DatabaseErrorKind, ErrorKind, TypeConversionError, ValidationErrors};

/// Message fragments that mark a constraint violation
pub(crate) const CONSTRAINT_PATTERNS: [&str; 3] = [
    "unique constraint",
    "foreign key constraint",
    "not-null constraint",
];

/// Message fragment for malformed values rejected by the database
pub(crate) const INVALID_SYNTAX_PATTERN: &str = "invalid input syntax";

/// Classify an error
///
/// The error and its `source()` chain are searched once per category, in
/// priority order: validation errors, type conversion errors, persistence
/// errors, general. The first category that matches wins.
///
/// Persistence errors are recognized either as a [`DatabaseError`] or, for
/// errors from any other source, by a known constraint message.
///
/// ```rust
/// use api_envelope::errors::{classify, DatabaseError, ErrorKind};
///
/// assert_eq!(classify(&DatabaseError::no_rows()), ErrorKind::NotFound);
///
/// let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
/// assert_eq!(classify(&io), ErrorKind::General);
/// ```
pub fn classify(err: &(dyn StdError + 'static)) -> ErrorKind {
    if find_in_chain::<ValidationErrors>(err).is_some() {
        return ErrorKind::Validation;
    }
    if type_conversion(err).is_some() {
        return ErrorKind::TypeConversion;
    }
    if let Some(db) = find_in_chain::<DatabaseError>(err) {
        return classify_database(db);
    }
    classify_message(&err.to_string()).unwrap_or(ErrorKind::General)
}

fn classify_database(err: &DatabaseError) -> ErrorKind {
    match err.kind {
        DatabaseErrorKind::NoRows => ErrorKind::NotFound,
        DatabaseErrorKind::ConnectionClosed => ErrorKind::Connection,
        DatabaseErrorKind::Other => {
            classify_message(&err.message).unwrap_or(ErrorKind::UnknownDatabase)
        }
    }
}

fn classify_message(message: &str) -> Option<ErrorKind> {
    if CONSTRAINT_PATTERNS.iter().any(|p| message.contains(p)) {
        Some(ErrorKind::ConstraintViolation)
    } else if message.contains(INVALID_SYNTAX_PATTERN) {
        Some(ErrorKind::UnknownDatabase)
    } else {
        None
    }
}

/// First error of type `T` in `err` or its sources
pub(crate) fn find_in_chain<'a, T: StdError + 'static>(
    err: &'a (dyn StdError + 'static),
) -> Option<&'a T> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<T>() {
            return Some(found);
        }
        current = err.source();
    }
    None
}

/// Field and expected type of a type conversion failure anywhere in the chain
///
/// Covers [`TypeConversionError`] and `serde_json` data errors. The latter do
/// not expose the field, so it is reported as `body`.
pub(crate) fn type_conversion(err: &(dyn StdError + 'static)) -> Option<TypeConversionError> {
    if let Some(found) = find_in_chain::<TypeConversionError>(err) {
        return Some(found.clone());
    }
    find_in_chain::<serde_json::Error>(err)
        .filter(|json| json.classify() == serde_json::error::Category::Data)
        .map(|json| TypeConversionError::new("body", expected_from_json(json)))
}

fn expected_from_json(err: &serde_json::Error) -> String {
    let message = err.to_string();
    message
        .split_once(", expected ")
        .map(|(_, rest)| rest.split(" at line ").next().unwrap_or(rest).to_string())
        .unwrap_or_else(|| "a different type".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldViolation;

    #[derive(Debug, thiserror::Error)]
    #[error("while saving user")]
    struct Wrapped(#[source] Box<dyn StdError + Send + Sync>);

    #[test]
    fn test_classify_validation() {
        let err = ValidationErrors(vec![FieldViolation::new("Email", "required")]);
        assert_eq!(classify(&err), ErrorKind::Validation);
    }

    #[test]
    fn test_classify_type_conversion() {
        assert_eq!(
            classify(&TypeConversionError::new("Age", "int")),
            ErrorKind::TypeConversion
        );

        let json = serde_json::from_str::<u32>("\"old\"").unwrap_err();
        assert_eq!(classify(&json), ErrorKind::TypeConversion);
    }

    #[test]
    fn test_json_syntax_error_is_general() {
        let json = serde_json::from_str::<u32>("1 x").unwrap_err();
        assert_eq!(json.classify(), serde_json::error::Category::Syntax);
        assert_eq!(classify(&json), ErrorKind::General);

        let json = serde_json::from_str::<u32>("{").unwrap_err();
        assert_eq!(classify(&json), ErrorKind::TypeConversion);
    }

    #[test]
    fn test_classify_database_sentinels() {
        assert_eq!(classify(&DatabaseError::no_rows()), ErrorKind::NotFound);
        assert_eq!(classify(&DatabaseError::connection_closed()), ErrorKind::Connection);
        assert_eq!(
            classify(&DatabaseError::other("insert violates foreign key constraint \"fk\"")),
            ErrorKind::ConstraintViolation
        );
        assert_eq!(
            classify(&DatabaseError::other("invalid input syntax for type uuid")),
            ErrorKind::UnknownDatabase
        );
        assert_eq!(
            classify(&DatabaseError::other("deadlock detected")),
            ErrorKind::UnknownDatabase
        );
    }

    #[test]
    fn test_classify_by_message_pattern() {
        let err = std::io::Error::new(
            std::io::ErrorKind::Other,
            "null value violates not-null constraint",
        );
        assert_eq!(classify(&err), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_classify_walks_source_chain() {
        let err = Wrapped(Box::new(DatabaseError::no_rows()));
        assert_eq!(classify(&err), ErrorKind::NotFound);

        let err = Wrapped(Box::new(ValidationErrors::new()));
        assert_eq!(classify(&err), ErrorKind::Validation);
    }

    #[test]
    fn test_classify_general() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "test error");
        assert_eq!(classify(&err), ErrorKind::General);
    }

    #[test]
    fn test_type_conversion_from_json_names_expected_type() {
        let json = serde_json::from_str::<u32>("\"old\"").unwrap_err();
        let conversion = type_conversion(&json).unwrap();
        assert_eq!(conversion.field, "body");
        assert_eq!(conversion.expected, "u32");
    }
}
