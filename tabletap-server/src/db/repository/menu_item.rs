//! Menu item repository

use super::{BaseRepository, RepoError, RepoResult, money_to_f64, now_millis};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All menu items of a tenant (staff view, availability flags included)
    pub async fn find_by_tenant(&self, tenant: &RecordId) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE tenant = $tenant ORDER BY name")
            .bind(("tenant", tenant.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Only currently orderable items (customer view)
    pub async fn find_available_by_tenant(&self, tenant: &RecordId) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM menu_item \
                 WHERE tenant = $tenant AND is_available = true ORDER BY name",
            )
            .bind(("tenant", tenant.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find one item by id, scoped to a tenant
    pub async fn find_by_id_for_tenant(
        &self,
        tenant: &RecordId,
        id: &str,
    ) -> RepoResult<Option<MenuItem>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE id = $id AND tenant = $tenant")
            .bind(("id", thing))
            .bind(("tenant", tenant.clone()))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Load several items at once (order snapshot), scoped to a tenant
    pub async fn find_many_for_tenant(
        &self,
        tenant: &RecordId,
        ids: Vec<RecordId>,
    ) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE tenant = $tenant AND id IN $ids")
            .bind(("tenant", tenant.clone()))
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create a menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE menu_item SET
                    tenant = $tenant,
                    name = $name,
                    description = $description,
                    price = $price,
                    category = $category,
                    image_url = $image_url,
                    is_available = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("tenant", data.tenant))
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("price", money_to_f64(data.price)))
            .bind(("category", data.category))
            .bind(("image_url", data.image_url))
            .bind(("now", now))
            .await?;

        let created: Option<MenuItem> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Partial update; unset fields keep their stored value
    pub async fn update(
        &self,
        tenant: &RecordId,
        id: &str,
        data: MenuItemUpdate,
    ) -> RepoResult<MenuItem> {
        let existing = self
            .find_by_id_for_tenant(tenant, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    name = $name,
                    description = $description,
                    price = $price,
                    category = $category,
                    image_url = $image_url,
                    is_available = $is_available,
                    updated_at = $now
                WHERE tenant = $tenant RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("tenant", tenant.clone()))
            .bind(("name", data.name.unwrap_or(existing.name)))
            .bind(("description", data.description.or(existing.description)))
            .bind(("price", money_to_f64(data.price.unwrap_or(existing.price))))
            .bind(("category", data.category.or(existing.category)))
            .bind(("image_url", data.image_url.or(existing.image_url)))
            .bind(("is_available", data.is_available.unwrap_or(existing.is_available)))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<MenuItem> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }
}
