//! JSON response envelope
//!
//! Every endpoint answers with the same envelope:
//! `{statusCode, data, message, success}`, plus `errors` when a request
//! fails with structured detail.

use crate::error::AppError;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with a payload
    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, Some(data), "Success")
    }

    /// 201 with a payload
    pub fn created(data: T) -> Self {
        Self::success(StatusCode::CREATED, Some(data), "Created")
    }

    /// Success envelope with an explicit status and message
    pub fn success(status: StatusCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            success: true,
            message: message.into(),
            data,
            errors: None,
        }
    }

    /// Success envelope carrying only a message, no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self::success(StatusCode::OK, None, message)
    }
}

impl ApiResponse<Value> {
    /// Error envelope rendered from an application error; the stable numeric
    /// code always travels with it, details only when present
    pub fn from_error(err: &AppError) -> Self {
        let errors = match &err.details {
            Some(details) => serde_json::json!({ "code": err.code, "details": details }),
            None => serde_json::json!({ "code": err.code }),
        };
        Self {
            status_code: err.code.http_status().as_u16(),
            success: false,
            message: err.message.clone(),
            data: None,
            errors: Some(errors),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Success");
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_message_envelope_has_null_data() {
        let body =
            serde_json::to_value(ApiResponse::<Value>::message("Logged out")).unwrap();
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = AppError::validation("quantity must be positive").with_detail("field", "quantity");
        let body = serde_json::to_value(ApiResponse::from_error(&err)).unwrap();
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "quantity must be positive");
        assert_eq!(body["errors"]["code"], 2);
        assert_eq!(body["errors"]["details"]["field"], "quantity");
    }

    #[test]
    fn test_error_without_details_still_carries_code() {
        let err = AppError::forbidden();
        let body = serde_json::to_value(ApiResponse::from_error(&err)).unwrap();
        assert_eq!(body["statusCode"], 403);
        assert_eq!(body["errors"]["code"], 2001);
        assert!(body["errors"].get("details").is_none());
    }
}
