//! HTTP status mapping for error codes

use super::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Map this error code to the HTTP status it is served with
    ///
    /// Anything not explicitly listed is a plain client error (400).
    pub const fn http_status(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            ErrorCode::NotAuthenticated
            | ErrorCode::InvalidCredentials
            | ErrorCode::TokenExpired
            | ErrorCode::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            ErrorCode::AccountDisabled
            | ErrorCode::PermissionDenied
            | ErrorCode::TenantMismatch => StatusCode::FORBIDDEN,

            // 404 Not Found
            ErrorCode::NotFound
            | ErrorCode::TenantNotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::TableNotFound
            | ErrorCode::MenuItemNotFound
            | ErrorCode::StaffNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            ErrorCode::AlreadyExists
            | ErrorCode::EmailRegistered
            | ErrorCode::TableNumberTaken
            | ErrorCode::TableHasActiveOrders => StatusCode::CONFLICT,

            // 429 Too Many Requests
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            ErrorCode::InternalError | ErrorCode::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            _ => StatusCode::BAD_REQUEST,
        }
    }
}
