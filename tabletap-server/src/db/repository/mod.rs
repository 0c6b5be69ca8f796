//! Repository module
//!
//! One repository per table; every method touching tenant-owned rows takes
//! the acting tenant as a hard filter, making tenant isolation a property of
//! the data layer rather than of individual handlers.

// Accounts
pub mod staff;
pub mod tenant;

// Floor and menu
pub mod dining_table;
pub mod menu_item;

// Orders
pub mod analytics;
pub mod order;

// Re-exports
pub use analytics::{
    AnalyticsRepository, OrderMetrics, TopItem, fold_metrics, fold_peak_hours, fold_top_items,
};
pub use dining_table::DiningTableRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use staff::StaffRepository;
pub use tenant::TenantRepository;

use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(shared::ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => {
                AppError::with_message(shared::ErrorCode::AlreadyExists, msg)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Current wall-clock time as epoch milliseconds (row timestamps)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Money bind helper: rows store plain numbers, rounded to 2 decimal places
pub fn money_to_f64(value: rust_decimal::Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.round_dp(2).to_f64().unwrap_or(0.0)
}

// =============================================================================
// ID convention: "table:id" strings at every boundary
// =============================================================================
//
// surrealdb::RecordId handles all ids:
//   - parse:      let id: RecordId = "order:abc".parse()?;
//   - construct:  RecordId::from_table_key("order", "abc")
//   - table name: id.table()
//   - bare key:   id.key().to_string()
//   - CRUD:       db.select(id) / db.delete(id) take a RecordId directly

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
