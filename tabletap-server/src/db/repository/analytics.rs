//! Analytics queries and rollup folds
//!
//! The store is only asked for tenant-scoped, time-windowed order slices;
//! every rollup (status counts, revenue, peak hours, top items) is folded
//! here in plain Rust. Revenue counts served orders only.

use super::{BaseRepository, RepoResult};
use crate::db::models::Order;
use chrono::Timelike;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::OrderStatus;
use std::collections::HashMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AnalyticsRepository {
    base: BaseRepository,
}

impl AnalyticsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All orders of a tenant created inside `[start_ms, end_ms]`
    pub async fn orders_created_between(
        &self,
        tenant: &RecordId,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE tenant = $tenant AND created_at >= $start AND created_at <= $end \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant", tenant.clone()))
            .bind(("start", start_ms))
            .bind(("end", end_ms))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Served orders of a tenant inside `[start_ms, end_ms]` (revenue basis)
    pub async fn served_orders_between(
        &self,
        tenant: &RecordId,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE tenant = $tenant AND status = 'served' \
                 AND created_at >= $start AND created_at <= $end \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant", tenant.clone()))
            .bind(("start", start_ms))
            .bind(("end", end_ms))
            .await?
            .take(0)?;
        Ok(orders)
    }
}

/// Order counts by status plus served revenue for one window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMetrics {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub preparing_orders: u64,
    pub ready_orders: u64,
    pub served_orders: u64,
    pub cancelled_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_order_value: Decimal,
}

/// One row of the top-items rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopItem {
    pub menu_item: String,
    pub name: String,
    pub total_quantity: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

/// Fold a window of orders into status counts, served revenue and the
/// average served order value. An empty window yields all-zero metrics,
/// never a division error.
pub fn fold_metrics(orders: &[Order]) -> OrderMetrics {
    let mut metrics = OrderMetrics {
        total_orders: orders.len() as u64,
        pending_orders: 0,
        preparing_orders: 0,
        ready_orders: 0,
        served_orders: 0,
        cancelled_orders: 0,
        total_revenue: Decimal::ZERO,
        average_order_value: Decimal::ZERO,
    };

    for order in orders {
        match order.status {
            OrderStatus::Pending => metrics.pending_orders += 1,
            OrderStatus::Preparing => metrics.preparing_orders += 1,
            OrderStatus::Ready => metrics.ready_orders += 1,
            OrderStatus::Served => {
                metrics.served_orders += 1;
                metrics.total_revenue += order.total_amount;
            }
            OrderStatus::Cancelled => metrics.cancelled_orders += 1,
        }
    }

    if metrics.served_orders > 0 {
        metrics.average_order_value =
            (metrics.total_revenue / Decimal::from(metrics.served_orders)).round_dp(2);
    }
    metrics
}

/// Bucket order creation times into a UTC hour-of-day histogram
pub fn fold_peak_hours(orders: &[Order]) -> [u32; 24] {
    let mut hours = [0u32; 24];
    for order in orders {
        if let Some(created) = chrono::DateTime::from_timestamp_millis(order.created_at) {
            hours[created.hour() as usize] += 1;
        }
    }
    hours
}

/// Rank menu items by summed line revenue over a window of served orders,
/// keeping the top `limit`. Names come from the order snapshots, so items
/// deleted from the menu since still rank correctly.
pub fn fold_top_items(orders: &[Order], limit: usize) -> Vec<TopItem> {
    let mut by_item: HashMap<&str, TopItem> = HashMap::new();
    for order in orders {
        for line in &order.items {
            let entry = by_item
                .entry(line.menu_item.as_str())
                .or_insert_with(|| TopItem {
                    menu_item: line.menu_item.clone(),
                    name: line.name.clone(),
                    total_quantity: 0,
                    total_revenue: Decimal::ZERO,
                });
            entry.total_quantity += u64::from(line.quantity);
            entry.total_revenue += line.line_total();
        }
    }

    let mut items: Vec<TopItem> = by_item.into_values().collect();
    items.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::OrderItem;
    use surrealdb::RecordId;

    fn order(status: OrderStatus, total: Decimal, created_at: i64, items: Vec<OrderItem>) -> Order {
        Order {
            id: Some(RecordId::from_table_key("order", uuid::Uuid::new_v4().to_string())),
            tenant: RecordId::from_table_key("tenant", "r1"),
            table: RecordId::from_table_key("dining_table", "t1"),
            status,
            items,
            total_amount: total,
            notes: None,
            payment_method: None,
            cancel_reason: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn line(menu_item: &str, name: &str, quantity: u32, unit_price: Decimal) -> OrderItem {
        OrderItem {
            menu_item: menu_item.to_string(),
            name: name.to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_fold_metrics_counts_and_served_revenue() {
        let orders = vec![
            order(OrderStatus::Served, Decimal::new(10000, 2), 0, vec![]),
            order(OrderStatus::Served, Decimal::new(5000, 2), 0, vec![]),
            order(OrderStatus::Pending, Decimal::new(9900, 2), 0, vec![]),
            order(OrderStatus::Cancelled, Decimal::new(8000, 2), 0, vec![]),
        ];

        let metrics = fold_metrics(&orders);
        assert_eq!(metrics.total_orders, 4);
        assert_eq!(metrics.pending_orders, 1);
        assert_eq!(metrics.served_orders, 2);
        assert_eq!(metrics.cancelled_orders, 1);
        // pending and cancelled totals never count as revenue
        assert_eq!(metrics.total_revenue, Decimal::new(15000, 2));
        assert_eq!(metrics.average_order_value, Decimal::new(7500, 2));
    }

    #[test]
    fn test_fold_metrics_empty_window_is_all_zero() {
        let metrics = fold_metrics(&[]);
        assert_eq!(metrics.total_orders, 0);
        assert_eq!(metrics.total_revenue, Decimal::ZERO);
        assert_eq!(metrics.average_order_value, Decimal::ZERO);
    }

    #[test]
    fn test_fold_metrics_average_rounds_to_cents() {
        let orders = vec![
            order(OrderStatus::Served, Decimal::new(1000, 2), 0, vec![]),
            order(OrderStatus::Served, Decimal::new(1000, 2), 0, vec![]),
            order(OrderStatus::Served, Decimal::new(1001, 2), 0, vec![]),
        ];
        let metrics = fold_metrics(&orders);
        // 30.01 / 3 = 10.003333... -> 10.00
        assert_eq!(metrics.average_order_value, Decimal::new(1000, 2));
    }

    #[test]
    fn test_fold_peak_hours_buckets_by_utc_hour() {
        // 1970-01-01 00:30, 00:45 and 13:10 UTC
        let orders = vec![
            order(OrderStatus::Served, Decimal::ZERO, 30 * 60 * 1000, vec![]),
            order(OrderStatus::Pending, Decimal::ZERO, 45 * 60 * 1000, vec![]),
            order(
                OrderStatus::Served,
                Decimal::ZERO,
                (13 * 3600 + 10 * 60) * 1000,
                vec![],
            ),
        ];

        let hours = fold_peak_hours(&orders);
        assert_eq!(hours[0], 2);
        assert_eq!(hours[13], 1);
        assert_eq!(hours.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_fold_top_items_ranks_by_revenue() {
        let orders = vec![
            order(
                OrderStatus::Served,
                Decimal::new(4500, 2),
                0,
                vec![
                    line("menu_item:soup", "Tom Yum", 2, Decimal::new(1000, 2)),
                    line("menu_item:tea", "Iced Tea", 5, Decimal::new(500, 2)),
                ],
            ),
            order(
                OrderStatus::Served,
                Decimal::new(3000, 2),
                0,
                vec![line("menu_item:soup", "Tom Yum", 3, Decimal::new(1000, 2))],
            ),
        ];

        let top = fold_top_items(&orders, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].menu_item, "menu_item:soup");
        assert_eq!(top[0].total_quantity, 5);
        assert_eq!(top[0].total_revenue, Decimal::new(50_00, 2));
        assert_eq!(top[1].menu_item, "menu_item:tea");
        assert_eq!(top[1].total_revenue, Decimal::new(25_00, 2));
    }

    #[test]
    fn test_fold_top_items_truncates_to_limit() {
        let orders = vec![order(
            OrderStatus::Served,
            Decimal::new(6000, 2),
            0,
            vec![
                line("menu_item:a", "A", 1, Decimal::new(3000, 2)),
                line("menu_item:b", "B", 1, Decimal::new(2000, 2)),
                line("menu_item:c", "C", 1, Decimal::new(1000, 2)),
            ],
        )];

        let top = fold_top_items(&orders, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].menu_item, "menu_item:a");
        assert_eq!(top[1].menu_item, "menu_item:b");
    }

    #[test]
    fn test_fold_top_items_empty_window() {
        assert!(fold_top_items(&[], 10).is_empty());
    }
}
