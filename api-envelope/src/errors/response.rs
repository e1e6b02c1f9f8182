//! The standard error envelope and the global error handler

use std::error::Error as StdError;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::classify::{classify, find_in_chain, type_conversion};
use super::kind::{ErrorKind, ValidationErrors};
use super::translate::{
    database_error_message, default_message_for_status, to_snake_case, translate_type_conversion,
    translate_validation, UNKNOWN_DATABASE_MESSAGE,
};
use crate::middleware::request_tracking::request_id_from_headers;

/// Entry field for persistence failures
pub const DATABASE_FIELD: &str = "database";

/// Entry field for failures with no better home
pub const GENERAL_FIELD: &str = "general";

/// Entry field used by [`handle_error`]
pub const ERROR_FIELD: &str = "error";

// ============================================================================
// Error entries
// ============================================================================

/// One `{field, message}` pair in an error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub field: String,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Standard error response
// ============================================================================

/// Error envelope: `{code, message, errors, request_id?}`
///
/// Entries accumulate until [`reset_errors`](Self::reset_errors).
///
/// # Example
///
/// ```rust
/// use api_envelope::errors::{DatabaseError, StandardErrorResponse};
/// use axum::http::StatusCode;
///
/// let mut response = StandardErrorResponse::new(StatusCode::NOT_FOUND);
/// response.add_error(&DatabaseError::no_rows());
///
/// assert_eq!(response.code, 404);
/// assert_eq!(response.errors[0].field, "database");
/// assert_eq!(response.errors[0].message, "We couldn't find what you're looking for");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// Overall message, defaults to the friendly text for `code`
    pub message: String,
    /// Accumulated entries
    pub errors: Vec<ErrorEntry>,
    /// Correlation id copied from `X-Request-ID`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl StandardErrorResponse {
    /// Create an empty envelope for `status`
    pub fn new(status: StatusCode) -> Self {
        Self {
            code: status.as_u16(),
            message: default_message_for_status(status),
            errors: Vec::new(),
            request_id: None,
        }
    }

    /// Replace the overall message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Classify `err` and append the matching entries
    ///
    /// - validation errors: one entry per violation, keyed by the snake_case field
    /// - type conversion: keyed by the snake_case field
    /// - persistence: keyed `database`
    /// - anything else: keyed `general`, with the error's own message
    pub fn add_error(&mut self, err: &(dyn StdError + 'static)) -> &mut Self {
        match classify(err) {
            ErrorKind::Validation => {
                if let Some(violations) = find_in_chain::<ValidationErrors>(err) {
                    self.errors.extend(violations.iter().map(|v| {
                        ErrorEntry::new(
                            to_snake_case(&v.field),
                            translate_validation(&v.field, &v.tag, &v.param),
                        )
                    }));
                }
            }
            ErrorKind::TypeConversion => {
                if let Some(conversion) = type_conversion(err) {
                    self.errors.push(ErrorEntry::new(
                        to_snake_case(&conversion.field),
                        translate_type_conversion(&conversion.field, &conversion.expected),
                    ));
                }
            }
            kind if kind.is_database() => {
                let message = database_error_message(err).unwrap_or(UNKNOWN_DATABASE_MESSAGE);
                self.errors.push(ErrorEntry::new(DATABASE_FIELD, message));
            }
            _ => self.errors.push(ErrorEntry::new(GENERAL_FIELD, err.to_string())),
        }
        self
    }

    /// Append an entry verbatim
    pub fn add_message_error(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        self.errors.push(ErrorEntry::new(field, message));
        self
    }

    /// Drop every entry; `code` and `message` are kept
    pub fn reset_errors(&mut self) {
        self.errors.clear();
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// HTTP status for `code`, 500 if `code` is not a valid status
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Copy the request id from `headers` when one is present
    #[must_use]
    pub fn with_request_id_from(mut self, headers: &HeaderMap) -> Self {
        if let Some(id) = request_id_from_headers(headers) {
            self.request_id = Some(id);
        }
        self
    }

    /// Attach the request id from `headers` and build the response
    pub fn respond(self, headers: &HeaderMap) -> Response {
        self.with_request_id_from(headers).into_response()
    }
}

impl IntoResponse for StandardErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                code = self.code,
                request_id = ?self.request_id,
                errors = self.errors.len(),
                "Error response: {}", self.message
            );
        } else {
            tracing::debug!(
                code = self.code,
                request_id = ?self.request_id,
                errors = self.errors.len(),
                "Error response: {}", self.message
            );
        }

        (status, Json(self)).into_response()
    }
}

// ============================================================================
// Application errors and the global handler
// ============================================================================

/// An application error that carries its own HTTP status
///
/// ```rust
/// use api_envelope::errors::HttpError;
/// use axum::http::StatusCode;
///
/// let err = HttpError::new(StatusCode::FORBIDDEN, "Account is locked");
/// assert_eq!(err.to_string(), "Account is locked");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpError {
    pub code: StatusCode,
    pub message: String,
    #[source]
    pub internal: Option<Box<dyn StdError + Send + Sync>>,
}

impl HttpError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            internal: None,
        }
    }

    /// Keep the underlying cause for logs; it never reaches the client
    #[must_use]
    pub fn with_internal(mut self, err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        self.internal = Some(err.into());
        self
    }

    fn envelope(&self) -> StandardErrorResponse {
        let mut response = StandardErrorResponse::new(self.code);
        response.add_message_error(ERROR_FIELD, self.message.clone());
        response
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if let Some(internal) = &self.internal {
            tracing::warn!(code = self.code.as_u16(), cause = %internal, "{}", self.message);
        }
        self.envelope().into_response()
    }
}

/// Turn any error into an envelope response
///
/// An [`HttpError`] anywhere in the chain keeps its status and message.
/// Everything else becomes a 500 with a generic message, so internal details
/// never leak. The response always holds exactly one entry, keyed `error`.
pub fn handle_error(err: &(dyn StdError + 'static), headers: &HeaderMap) -> Response {
    let response = match find_in_chain::<HttpError>(err) {
        Some(http) => http.envelope(),
        None => {
            tracing::error!(error = %err, "Unhandled error");
            let mut response = StandardErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR);
            response.add_message_error(ERROR_FIELD, "An unexpected error occurred");
            response
        }
    };
    response.respond(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DatabaseError, FieldViolation, TypeConversionError};
    use axum::http::HeaderValue;

    fn entry(response: &StandardErrorResponse, index: usize) -> (&str, &str) {
        let entry = &response.errors[index];
        (entry.field.as_str(), entry.message.as_str())
    }

    #[test]
    fn test_new_uses_default_message() {
        let response = StandardErrorResponse::new(StatusCode::BAD_REQUEST);
        assert_eq!(response.code, 400);
        assert_eq!(
            response.message,
            "We couldn't process your request due to invalid input"
        );
        assert!(response.errors.is_empty());
        assert_eq!(response.request_id, None);
    }

    #[test]
    fn test_add_error_validation() {
        let err = ValidationErrors(vec![
            FieldViolation::new("Email", "required"),
            FieldViolation::new("FirstName", "max").with_param("50"),
        ]);
        let mut response = StandardErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY);
        response.add_error(&err);

        assert_eq!(response.errors.len(), 2);
        assert_eq!(entry(&response, 0), ("email", "Please provide email"));
        assert_eq!(
            entry(&response, 1),
            ("first_name", "first name cannot be longer than 50 characters")
        );
    }

    #[test]
    fn test_add_error_type_conversion() {
        let mut response = StandardErrorResponse::new(StatusCode::BAD_REQUEST);
        response.add_error(&TypeConversionError::new("Age", "int"));
        assert_eq!(entry(&response, 0), ("age", "Invalid value for Age. Expected int"));
    }

    #[test]
    fn test_add_error_json_data_error() {
        let err = serde_json::from_str::<u32>("\"old\"").unwrap_err();
        let mut response = StandardErrorResponse::new(StatusCode::BAD_REQUEST);
        response.add_error(&err);
        assert_eq!(entry(&response, 0), ("body", "Invalid value for body. Expected u32"));
    }

    #[test]
    fn test_add_error_database() {
        let mut response = StandardErrorResponse::new(StatusCode::NOT_FOUND);
        response.add_error(&DatabaseError::no_rows());
        response.add_error(&DatabaseError::other("violates unique constraint \"users_email\""));

        assert_eq!(
            entry(&response, 0),
            ("database", "We couldn't find what you're looking for")
        );
        assert_eq!(
            entry(&response, 1),
            ("database", "This information already exists in our system")
        );
    }

    #[test]
    fn test_add_error_general() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "test error");
        let mut response = StandardErrorResponse::new(StatusCode::BAD_REQUEST);
        response.add_error(&err);
        assert_eq!(entry(&response, 0), ("general", "test error"));
    }

    #[test]
    fn test_add_error_field_follows_classification() {
        let cases: Vec<(Box<dyn StdError>, &str)> = vec![
            (Box::new(ValidationErrors(vec![FieldViolation::new("Email", "email")])), "email"),
            (Box::new(TypeConversionError::new("Age", "int")), "age"),
            (Box::new(DatabaseError::connection_closed()), DATABASE_FIELD),
            (Box::new(DatabaseError::other("deadlock detected")), DATABASE_FIELD),
            (
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "invalid input syntax for type uuid",
                )),
                DATABASE_FIELD,
            ),
            (Box::new(serde_json::from_str::<u32>("1 x").unwrap_err()), GENERAL_FIELD),
        ];

        for (err, field) in cases {
            let mut response = StandardErrorResponse::new(StatusCode::BAD_REQUEST);
            response.add_error(err.as_ref());
            assert_eq!(response.errors.len(), 1, "{err}");
            assert_eq!(response.errors[0].field, field, "{err}");

            let kind = classify(err.as_ref());
            assert_eq!(kind.is_database(), field == DATABASE_FIELD, "{err}");
        }
    }

    #[test]
    fn test_add_error_unknown_database_message() {
        let mut response = StandardErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR);
        response.add_error(&DatabaseError::other("deadlock detected"));
        assert_eq!(
            entry(&response, 0),
            ("database", "An unexpected database error occurred")
        );
    }

    #[test]
    fn test_add_message_error_and_reset() {
        let mut response = StandardErrorResponse::new(StatusCode::BAD_REQUEST);
        response
            .add_message_error("page", "must be a number")
            .add_message_error("limit", "must be a number");
        assert_eq!(response.errors.len(), 2);
        assert!(response.has_errors());

        response.reset_errors();
        assert!(!response.has_errors());
        assert_eq!(response.code, 400);
    }

    #[test]
    fn test_with_request_id_from() {
        let mut headers = HeaderMap::new();
        let response = StandardErrorResponse::new(StatusCode::BAD_REQUEST).with_request_id_from(&headers);
        assert_eq!(response.request_id, None);

        headers.insert("x-request-id", HeaderValue::from_static("req-42"));
        let response = response.with_request_id_from(&headers);
        assert_eq!(response.request_id.as_deref(), Some("req-42"));
    }

    #[test]
    fn test_serialization_omits_missing_request_id() {
        let mut response = StandardErrorResponse::new(StatusCode::CONFLICT);
        response.add_message_error("email", "taken");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "code": 409,
                "message": "This operation conflicts with an existing resource",
                "errors": [{"field": "email", "message": "taken"}]
            })
        );
    }

    #[test]
    fn test_invalid_code_maps_to_internal_error() {
        let response = StandardErrorResponse {
            code: 42,
            message: String::new(),
            errors: Vec::new(),
            request_id: None,
        };
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_http_error_keeps_internal_cause() {
        let err = HttpError::new(StatusCode::BAD_GATEWAY, "Upstream failed")
            .with_internal(std::io::Error::new(std::io::ErrorKind::Other, "reset"));
        assert_eq!(err.to_string(), "Upstream failed");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("reset"));
    }

    #[test]
    fn test_handle_error_status() {
        let headers = HeaderMap::new();

        let err = HttpError::new(StatusCode::FORBIDDEN, "nope");
        assert_eq!(handle_error(&err, &headers).status(), StatusCode::FORBIDDEN);

        let err = std::io::Error::new(std::io::ErrorKind::Other, "secret detail");
        assert_eq!(
            handle_error(&err, &headers).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
