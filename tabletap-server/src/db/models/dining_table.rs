//! Dining table model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Occupancy state of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
        }
    }
}

/// Dining table row. Table numbers are unique within a tenant only; the
/// QR payload is the globally unique reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning tenant
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    pub table_number: u32,
    pub capacity: u32,
    pub status: TableStatus,
    /// Opaque customer-facing reference; rotating it invalidates printed codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_payload: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create table payload
#[derive(Debug, Clone)]
pub struct DiningTableCreate {
    pub tenant: RecordId,
    pub table_number: u32,
    pub capacity: u32,
}

/// Update table payload; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiningTableUpdate {
    pub table_number: Option<u32>,
    pub capacity: Option<u32>,
    pub status: Option<TableStatus>,
}
