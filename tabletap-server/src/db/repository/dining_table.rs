//! Dining table repository

use super::{BaseRepository, RepoError, RepoResult, now_millis};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All tables of a tenant, ordered by table number
    pub async fn find_by_tenant(&self, tenant: &RecordId) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE tenant = $tenant ORDER BY table_number")
            .bind(("tenant", tenant.clone()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find a table by id, scoped to a tenant
    pub async fn find_by_id_for_tenant(
        &self,
        tenant: &RecordId,
        id: &str,
    ) -> RepoResult<Option<DiningTable>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE id = $id AND tenant = $tenant")
            .bind(("id", thing))
            .bind(("tenant", tenant.clone()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Find a table by its number within a tenant
    pub async fn find_by_number(
        &self,
        tenant: &RecordId,
        table_number: u32,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table \
                 WHERE tenant = $tenant AND table_number = $table_number LIMIT 1",
            )
            .bind(("tenant", tenant.clone()))
            .bind(("table_number", table_number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a table; the QR payload is assigned right after creation
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        // Check duplicate table number within the tenant
        if self
            .find_by_number(&data.tenant, data.table_number)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table number {} already exists",
                data.table_number
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE dining_table SET
                    tenant = $tenant,
                    table_number = $table_number,
                    capacity = $capacity,
                    status = 'available',
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("tenant", data.tenant))
            .bind(("table_number", data.table_number))
            .bind(("capacity", data.capacity))
            .bind(("now", now))
            .await?;

        let created: Option<DiningTable> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create table".to_string()))
    }

    /// Partial update; unset fields keep their stored value
    pub async fn update(
        &self,
        tenant: &RecordId,
        id: &str,
        data: DiningTableUpdate,
    ) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id_for_tenant(tenant, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        let table_number = data.table_number.unwrap_or(existing.table_number);
        if table_number != existing.table_number
            && self.find_by_number(tenant, table_number).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table number {} already exists",
                table_number
            )));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    table_number = $table_number,
                    capacity = $capacity,
                    status = $status,
                    updated_at = $now
                WHERE tenant = $tenant RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("tenant", tenant.clone()))
            .bind(("table_number", table_number))
            .bind(("capacity", data.capacity.unwrap_or(existing.capacity)))
            .bind(("status", data.status.unwrap_or(existing.status)))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<DiningTable> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Assign or rotate the customer-facing QR payload
    pub async fn set_qr_payload(
        &self,
        tenant: &RecordId,
        id: &RecordId,
        payload: String,
    ) -> RepoResult<DiningTable> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET qr_payload = $payload, updated_at = $now \
                 WHERE tenant = $tenant RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("tenant", tenant.clone()))
            .bind(("payload", payload))
            .bind(("now", now_millis()))
            .await?;
        let updated: Option<DiningTable> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Delete a table. Returns false when it does not exist for the tenant.
    /// Callers must first check the table has no active orders.
    pub async fn delete(&self, tenant: &RecordId, id: &str) -> RepoResult<bool> {
        if self.find_by_id_for_tenant(tenant, id).await?.is_none() {
            return Ok(false);
        }
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let _: Option<DiningTable> = self.base.db().delete(thing).await?;
        Ok(true)
    }
}
