//! Tenant (restaurant account) model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Tenant row: one registered restaurant. The tenant id doubles as the
/// owner's principal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never serialized into responses
    #[serde(skip_serializing)]
    pub hash_pass: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub subscription_plan: String,
    pub subscription_status: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create tenant payload (registration)
#[derive(Debug, Clone)]
pub struct TenantCreate {
    pub name: String,
    pub email: String,
    pub hash_pass: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}
