//! Table resolution for unauthenticated customer requests
//!
//! A customer carries no token; the only thing binding their request to a
//! restaurant is the table reference they present. The QR payload embeds
//! both record ids plus a per-mint nonce and must equal the payload stored
//! on the table row, so rotating a table's QR code invalidates every
//! previously printed sticker. All failure modes collapse into the same
//! opaque "table not found" so a payload cannot be probed for which part
//! of it was wrong.

use crate::db::models::DiningTable;
use crate::db::repository::DiningTableRepository;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use shared::{AppError, AppResult, ErrorCode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// A successfully resolved table reference: the tenant this request now
/// acts for, and the table any order lands on. Valid for one request only.
#[derive(Debug, Clone)]
pub struct ResolvedTable {
    pub tenant: RecordId,
    pub table: DiningTable,
}

/// Mint the opaque payload encoded into a table's QR code
pub fn generate_qr_payload(tenant: &RecordId, table: &RecordId) -> String {
    let nonce = uuid::Uuid::new_v4();
    URL_SAFE_NO_PAD.encode(format!("{tenant}/{table}/{nonce}"))
}

/// Extract the embedded record ids, or `None` for anything malformed
fn decode_qr_payload(payload: &str) -> Option<(RecordId, RecordId)> {
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let text = String::from_utf8(bytes).ok()?;

    let mut parts = text.splitn(3, '/');
    let tenant: RecordId = parts.next()?.parse().ok()?;
    let table: RecordId = parts.next()?.parse().ok()?;
    parts.next()?;

    if tenant.table() != "tenant" || table.table() != "dining_table" {
        return None;
    }
    Some((tenant, table))
}

fn table_not_found() -> AppError {
    AppError::new(ErrorCode::TableNotFound)
}

pub struct TableResolver {
    tables: DiningTableRepository,
}

impl TableResolver {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            tables: DiningTableRepository::new(db),
        }
    }

    /// Preferred path: the payload itself names the tenant, so no other
    /// identifier has to travel with the request.
    pub async fn resolve_by_qr(&self, payload: &str) -> AppResult<ResolvedTable> {
        let Some((tenant, table_id)) = decode_qr_payload(payload) else {
            return Err(table_not_found());
        };

        let table = self
            .tables
            .find_by_id_for_tenant(&tenant, &table_id.to_string())
            .await?
            .ok_or_else(table_not_found)?;

        // A decodable payload from a previous mint is still rejected
        if table.qr_payload.as_deref() != Some(payload) {
            return Err(table_not_found());
        }

        Ok(ResolvedTable { tenant, table })
    }

    /// Fallback path for clients that know the tenant already. A bare
    /// table number is ambiguous across tenants, so the tenant id is a
    /// required input here rather than something to discover.
    pub async fn resolve_by_table_number(
        &self,
        tenant: &RecordId,
        number: u32,
    ) -> AppResult<ResolvedTable> {
        let table = self
            .tables
            .find_by_number(tenant, number)
            .await?
            .ok_or_else(table_not_found)?;

        Ok(ResolvedTable {
            tenant: tenant.clone(),
            table,
        })
    }
}
