//! Error category classification

use super::ErrorCode;
use serde::{Deserialize, Serialize};

/// High-level error category derived from the numeric code range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Tenant,
    Order,
    Table,
    Menu,
    Staff,
    System,
}

impl ErrorCategory {
    /// Classify a numeric error code into its category
    pub const fn from_code(code: u16) -> Self {
        match code {
            0..1000 => ErrorCategory::General,
            1000..2000 => ErrorCategory::Auth,
            2000..3000 => ErrorCategory::Permission,
            3000..4000 => ErrorCategory::Tenant,
            4000..5000 => ErrorCategory::Order,
            5000..6000 => ErrorCategory::Table,
            6000..7000 => ErrorCategory::Menu,
            7000..8000 => ErrorCategory::Staff,
            _ => ErrorCategory::System,
        }
    }
}

impl From<ErrorCode> for ErrorCategory {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ranges() {
        assert_eq!(
            ErrorCategory::from(ErrorCode::ValidationFailed),
            ErrorCategory::General
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::TokenExpired),
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::TenantMismatch),
            ErrorCategory::Permission
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::EmailRegistered),
            ErrorCategory::Tenant
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::OrderEmpty),
            ErrorCategory::Order
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::TableNumberTaken),
            ErrorCategory::Table
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::MenuItemUnavailable),
            ErrorCategory::Menu
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::StaffNotFound),
            ErrorCategory::Staff
        );
        assert_eq!(
            ErrorCategory::from(ErrorCode::DatabaseError),
            ErrorCategory::System
        );
    }
}
