//! Order model
//!
//! Line items are embedded in the order row; they are immutable snapshots
//! taken at creation, so no join or live reference is needed.

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{OrderItem, OrderStatus};
use surrealdb::RecordId;

/// Order row; mutated only through status transitions, never deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning tenant
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    /// Table the order was placed from
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Set exactly once, on the transition into `cancelled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload; `items` are already snapshotted and `total_amount`
/// already computed from them
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub tenant: RecordId,
    pub table: RecordId,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
}
