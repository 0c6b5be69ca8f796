//! Order repository
//!
//! Orders are append-only: rows are created once and afterwards mutated only
//! through `update_status`, whose WHERE clause names the statuses the target
//! status may legally follow. Two racing transitions therefore cannot both
//! win; the loser's UPDATE matches nothing and returns `None`.

use super::{BaseRepository, RepoError, RepoResult, money_to_f64, now_millis};
use crate::db::models::{Order, OrderCreate};
use shared::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an order in `pending` with its item snapshot
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    tenant = $tenant,
                    table = $table,
                    status = 'pending',
                    items = $items,
                    total_amount = $total_amount,
                    notes = $notes,
                    payment_method = $payment_method,
                    cancel_reason = NONE,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("tenant", data.tenant))
            .bind(("table", data.table))
            .bind(("items", data.items))
            .bind(("total_amount", money_to_f64(data.total_amount)))
            .bind(("notes", data.notes))
            .bind(("payment_method", data.payment_method))
            .bind(("now", now))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find one order by id, scoped to a tenant. A foreign tenant's order
    /// comes back as `None`, same as an order that never existed.
    pub async fn find_by_id_for_tenant(
        &self,
        tenant: &RecordId,
        id: &str,
    ) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE id = $id AND tenant = $tenant")
            .bind(("id", thing))
            .bind(("tenant", tenant.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Paginated staff listing, newest first
    pub async fn list_for_tenant(
        &self,
        tenant: &RecordId,
        status: Option<OrderStatus>,
        limit: i64,
        start: i64,
    ) -> RepoResult<Vec<Order>> {
        let mut query = String::from("SELECT * FROM order WHERE tenant = $tenant");
        if status.is_some() {
            query.push_str(" AND status = $status");
        }
        query.push_str(" ORDER BY created_at DESC LIMIT $limit START $start");

        let orders: Vec<Order> = self
            .base
            .db()
            .query(query)
            .bind(("tenant", tenant.clone()))
            .bind(("status", status))
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Total row count backing `list_for_tenant` pagination
    pub async fn count_for_tenant(
        &self,
        tenant: &RecordId,
        status: Option<OrderStatus>,
    ) -> RepoResult<i64> {
        let mut query = String::from("SELECT count() FROM order WHERE tenant = $tenant");
        if status.is_some() {
            query.push_str(" AND status = $status");
        }
        query.push_str(" GROUP ALL");

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("tenant", tenant.clone()))
            .bind(("status", status))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Orders in the given statuses, oldest first (kitchen works the queue
    /// front to back)
    pub async fn kitchen_queue(
        &self,
        tenant: &RecordId,
        statuses: &[OrderStatus],
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE tenant = $tenant AND status IN $statuses \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant", tenant.clone()))
            .bind(("statuses", statuses.to_vec()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Conditionally move an order to `new_status`.
    ///
    /// The WHERE clause restricts the write to rows currently in one of the
    /// statuses `new_status` may follow, so a stale caller loses the race
    /// instead of overwriting a newer transition. Returns the updated row,
    /// or `None` when the order is absent, foreign, or no longer in an
    /// eligible status.
    pub async fn update_status(
        &self,
        tenant: &RecordId,
        id: &str,
        new_status: OrderStatus,
        cancel_reason: Option<String>,
    ) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let allowed = new_status.allowed_predecessors().to_vec();

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    status = $new_status,
                    cancel_reason = $cancel_reason,
                    updated_at = $now
                WHERE tenant = $tenant AND status IN $allowed
                RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("tenant", tenant.clone()))
            .bind(("new_status", new_status))
            .bind(("cancel_reason", cancel_reason))
            .bind(("allowed", allowed))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Order> = result.take(0)?;
        Ok(updated)
    }

    /// Orders on a table that are not yet terminal (blocks table deletion)
    pub async fn count_active_for_table(
        &self,
        tenant: &RecordId,
        table: &RecordId,
    ) -> RepoResult<i64> {
        let active = vec![
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ];
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM order \
                 WHERE tenant = $tenant AND table = $table AND status IN $statuses \
                 GROUP ALL",
            )
            .bind(("tenant", tenant.clone()))
            .bind(("table", table.clone()))
            .bind(("statuses", active))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
