//! Tenant repository

use super::{BaseRepository, RepoError, RepoResult, now_millis};
use crate::db::models::{Tenant, TenantCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct TenantRepository {
    base: BaseRepository,
}

impl TenantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a tenant by normalized email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Tenant>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM tenant WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let tenants: Vec<Tenant> = result.take(0)?;
        Ok(tenants.into_iter().next())
    }

    /// Find a tenant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Tenant>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let tenant: Option<Tenant> = self.base.db().select(thing).await?;
        Ok(tenant)
    }

    /// Register a new tenant
    pub async fn create(&self, data: TenantCreate) -> RepoResult<Tenant> {
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
                r#"CREATE tenant SET
                    name = $name,
                    email = $email,
                    hash_pass = $hash_pass,
                    phone = $phone,
                    address = $address,
                    city = $city,
                    subscription_plan = 'basic',
                    subscription_status = 'active',
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("hash_pass", data.hash_pass))
            .bind(("phone", data.phone))
            .bind(("address", data.address))
            .bind(("city", data.city))
            .bind(("now", now))
            .await?;

        let created: Option<Tenant> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create tenant".to_string()))
    }

    /// Replace the owner's credential hash
    pub async fn update_password(&self, id: &RecordId, hash_pass: String) -> RepoResult<Tenant> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET hash_pass = $hash_pass, updated_at = $now RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("now", now_millis()))
            .await?;
        let updated: Option<Tenant> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Tenant {} not found", id)))
    }
}
