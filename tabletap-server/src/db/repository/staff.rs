//! Staff repository

use super::{BaseRepository, RepoError, RepoResult, now_millis};
use crate::db::models::{Staff, StaffCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a staff account by normalized email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Staff>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM staff WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let staff: Vec<Staff> = result.take(0)?;
        Ok(staff.into_iter().next())
    }

    /// Find a staff account by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Staff>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let staff: Option<Staff> = self.base.db().select(thing).await?;
        Ok(staff)
    }

    /// All staff accounts of a tenant, active and deactivated
    pub async fn find_by_tenant(&self, tenant: &RecordId) -> RepoResult<Vec<Staff>> {
        let staff: Vec<Staff> = self
            .base
            .db()
            .query("SELECT * FROM staff WHERE tenant = $tenant ORDER BY name")
            .bind(("tenant", tenant.clone()))
            .await?
            .take(0)?;
        Ok(staff)
    }

    /// Create a new staff account under a tenant
    pub async fn create(&self, data: StaffCreate) -> RepoResult<Staff> {
        // Check duplicate email
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                data.email
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE staff SET
                    tenant = $tenant,
                    name = $name,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("tenant", data.tenant))
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("hash_pass", data.hash_pass))
            .bind(("role", data.role))
            .bind(("now", now))
            .await?;

        let created: Option<Staff> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create staff".to_string()))
    }

    /// Deactivate a staff account; the row is kept for order history
    pub async fn deactivate(&self, tenant: &RecordId, id: &str) -> RepoResult<Staff> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET is_active = false, updated_at = $now \
                 WHERE tenant = $tenant RETURN AFTER",
            )
            .bind(("id", thing))
            .bind(("tenant", tenant.clone()))
            .bind(("now", now_millis()))
            .await?;
        let updated: Option<Staff> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Staff {} not found", id)))
    }

    /// Replace a staff account's credential hash
    pub async fn update_password(&self, id: &RecordId, hash_pass: String) -> RepoResult<Staff> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET hash_pass = $hash_pass, updated_at = $now RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("now", now_millis()))
            .await?;
        let updated: Option<Staff> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Staff {} not found", id)))
    }
}
