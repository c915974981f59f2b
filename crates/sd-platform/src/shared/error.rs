//! Platform Error Types

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("{entity_type} Not Found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("{message}")]
    ForbiddenOperation { message: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AdminError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    /// Business-rule violation: admin-role protection, role in use.
    pub fn forbidden_operation(message: impl Into<String>) -> Self {
        Self::ForbiddenOperation { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;

/// Error response body
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Original submitted input, echoed back on create/update failures
    /// so the caller can re-render a form without data loss.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<serde_json::Value>,
}

impl AdminError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AdminError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AdminError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            AdminError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AdminError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AdminError::ForbiddenOperation { .. } => (StatusCode::CONFLICT, "FORBIDDEN_OPERATION"),
            AdminError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AdminError::InvalidToken { .. } => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_code();

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            submitted: None,
        };

        (status, Json(body)).into_response()
    }
}

/// A failed form submission: the underlying error plus the input the
/// caller sent, echoed back per the create/update response contract.
#[derive(Debug)]
pub struct FormError {
    pub error: AdminError,
    pub submitted: Option<serde_json::Value>,
}

impl FormError {
    pub fn new(error: AdminError) -> Self {
        Self { error, submitted: None }
    }

    pub fn with_input(error: AdminError, submitted: serde_json::Value) -> Self {
        Self { error, submitted: Some(submitted) }
    }
}

impl From<AdminError> for FormError {
    fn from(error: AdminError) -> Self {
        Self::new(error)
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.error.status_and_code();

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.error.to_string(),
            submitted: self.submitted,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = AdminError::not_found("Role", "abc");
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn test_forbidden_operation_status() {
        let err = AdminError::forbidden_operation("Cannot Delete Admin Role");
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "FORBIDDEN_OPERATION");
        assert_eq!(err.to_string(), "Cannot Delete Admin Role");
    }

    #[test]
    fn test_form_error_carries_input() {
        let err = FormError::with_input(
            AdminError::validation("Role name is required"),
            serde_json::json!({ "name": "", "slug": "editor" }),
        );
        assert!(err.submitted.is_some());
    }
}
