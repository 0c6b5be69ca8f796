//! Staff account model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::Role;
use surrealdb::RecordId;

/// Staff row, always subordinate to exactly one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning tenant
    #[serde(with = "serde_helpers::record_id")]
    pub tenant: RecordId,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never serialized into responses
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    /// Deactivated staff keep their row but can no longer authenticate
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

/// Create staff payload
#[derive(Debug, Clone)]
pub struct StaffCreate {
    pub tenant: RecordId,
    pub name: String,
    pub email: String,
    pub hash_pass: String,
    pub role: Role,
}
