//! Application error type

use super::{ErrorCategory, ErrorCode};
use crate::response::ApiResponse;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Result alias used across handlers and services
pub type AppResult<T> = Result<T, AppError>;

/// Application error carrying a stable code, a human-readable message
/// and optional structured details
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create an error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.message().to_string(),
            details: None,
        }
    }

    /// Create an error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a structured detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Category this error belongs to
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from(self.code)
    }

    // ==================== Convenience constructors ====================

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn invalid_token() -> Self {
        Self::new(ErrorCode::TokenInvalid)
    }

    pub fn forbidden() -> Self {
        Self::new(ErrorCode::PermissionDenied)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // System failures are logged server-side; their details never
        // reach the client.
        if self.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }
        let status = self.code.http_status();
        (status, Json(ApiResponse::<Value>::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_with_detail_accumulates() {
        let err = AppError::validation("quantity must be positive")
            .with_detail("field", "quantity")
            .with_detail("minimum", 1);
        let details = err.details.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details["field"], "quantity");
    }

    #[test]
    fn test_not_found_records_resource() {
        let err = AppError::not_found("order");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "order not found");
        assert_eq!(err.details.unwrap()["resource"], "order");
    }

    #[test]
    fn test_category() {
        assert_eq!(
            AppError::token_expired().category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            AppError::database("connection lost").category(),
            ErrorCategory::System
        );
    }
}
