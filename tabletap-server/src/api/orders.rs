//! Order placement and staff order management
//!
//! - `POST /api/orders` — customer order placement (public, table-scoped)
//! - `GET /api/orders` — paginated staff listing
//! - `GET /api/orders/{id}` — single order
//! - `PUT /api/orders/{id}/status` — lifecycle transition
//!
//! Creation snapshots each line's name and unit price from the menu at
//! order time, so later menu edits never reprice a placed order.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Extension, Json, Router, middleware};
use http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use surrealdb::RecordId;

use crate::api::tenant_record;
use crate::auth::middleware::{ActingTenant, check_any_capability, require_capability};
use crate::auth::token::AuthContext;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate};
use crate::db::repository::{MenuItemRepository, OrderRepository};
use crate::resolver::TableResolver;
use crate::utils::validation::validate_quantity;
use shared::{ApiResponse, AppError, Capability, ErrorCode, OrderItem, OrderStatus};

/// Listing page size when the caller does not pick one
pub(crate) const DEFAULT_PER_PAGE: i64 = 50;
pub(crate) const MAX_PER_PAGE: i64 = 100;

pub fn router() -> Router<ServerState> {
    Router::new()
        // POST is the public customer path; GET checks its capabilities
        // in-handler because the two methods share a path but not a gate
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", get(get_order))
        .merge(
            Router::new()
                .route("/api/orders/{id}/status", put(update_order_status))
                .layer(middleware::from_fn(require_capability(&[
                    Capability::ManageOrders,
                    Capability::UpdateOrderStatus,
                ]))),
        )
}

// ── Request / Response types ──

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Scanned QR payload; preferred because it names the tenant itself
    #[serde(default)]
    pub qr_payload: Option<String>,
    /// Fallback pair for clients without a scanner
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub table_number: Option<u32>,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub cancel_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub items: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

// ── POST /api/orders ──

pub async fn create_order(
    State(state): State<ServerState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<ApiResponse<Order>, AppError> {
    let resolver = TableResolver::new(state.db.clone());

    // A customer carries no token; the table reference is the only thing
    // binding this request to a restaurant.
    let resolved = match (&req.qr_payload, &req.tenant_id, req.table_number) {
        (Some(payload), _, _) => resolver.resolve_by_qr(payload).await?,
        (None, Some(tenant_id), Some(number)) => {
            let tenant: RecordId = tenant_id
                .parse()
                .map_err(|_| AppError::validation("Invalid restaurant ID"))?;
            resolver.resolve_by_table_number(&tenant, number).await?
        }
        _ => {
            return Err(AppError::validation(
                "Either qr_payload or tenant_id and table_number are required",
            ));
        }
    };

    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for line in &req.items {
        validate_quantity(line.quantity)?;
    }

    let mut ids = Vec::with_capacity(req.items.len());
    for line in &req.items {
        let id: RecordId = line.menu_item_id.parse().map_err(|_| {
            AppError::validation(format!("Invalid menu item ID: {}", line.menu_item_id))
        })?;
        ids.push(id);
    }

    let menu = MenuItemRepository::new(state.db.clone());
    let found = menu.find_many_for_tenant(&resolved.tenant, ids).await?;
    let by_id: HashMap<String, _> = found
        .into_iter()
        .filter_map(|item| {
            let key = item.id.as_ref().map(ToString::to_string)?;
            Some((key, item))
        })
        .collect();

    // Snapshot name and price per line; totals never depend on the menu again
    let mut items = Vec::with_capacity(req.items.len());
    let mut total = Decimal::ZERO;
    for line in &req.items {
        let item = by_id
            .get(&line.menu_item_id)
            .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))?;
        if !item.is_available {
            return Err(
                AppError::new(ErrorCode::MenuItemUnavailable).with_detail(
                    "menuItem",
                    serde_json::json!(item.name),
                ),
            );
        }
        let snapshot = OrderItem {
            menu_item: line.menu_item_id.clone(),
            name: item.name.clone(),
            quantity: line.quantity,
            unit_price: item.price,
        };
        total += snapshot.line_total();
        items.push(snapshot);
    }

    let table_id = resolved
        .table
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Resolved table has no ID"))?;

    let orders = OrderRepository::new(state.db.clone());
    let order = orders
        .create(OrderCreate {
            tenant: resolved.tenant.clone(),
            table: table_id,
            items,
            total_amount: total,
            notes: req.notes,
            payment_method: req.payment_method,
        })
        .await?;

    tracing::info!(
        order = %order.id.as_ref().map(ToString::to_string).unwrap_or_default(),
        tenant = %resolved.tenant,
        table = resolved.table.table_number,
        total = %order.total_amount,
        "Order created"
    );

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        Some(order),
        "Order created successfully",
    ))
}

// ── GET /api/orders ──

pub async fn list_orders(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Query(query): Query<OrdersQuery>,
) -> Result<ApiResponse<OrderListResponse>, AppError> {
    check_any_capability(&user, &[Capability::ManageOrders, Capability::ViewOrders])?;
    let tenant = tenant_record(&acting)?;

    let status = parse_status_filter(query.status.as_deref())?;
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let page = query.page.unwrap_or(1).max(1);
    let start = (page - 1) * per_page;

    let orders = OrderRepository::new(state.db.clone());
    let items = orders
        .list_for_tenant(&tenant, status, per_page, start)
        .await?;
    let total = orders.count_for_tenant(&tenant, status).await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(OrderListResponse {
            items,
            total,
            page,
            per_page,
        }),
        "Orders fetched successfully",
    ))
}

// ── GET /api/orders/{id} ──

pub async fn get_order(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Order>, AppError> {
    let tenant = tenant_record(&acting)?;

    let order = OrderRepository::new(state.db.clone())
        .find_by_id_for_tenant(&tenant, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(order),
        "Order fetched successfully",
    ))
}

// ── PUT /api/orders/{id}/status ──

pub async fn update_order_status(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<ApiResponse<Order>, AppError> {
    let tenant = tenant_record(&acting)?;

    let order = apply_status_transition(&state, &tenant, &id, req.status, req.cancel_reason).await?;

    tracing::info!(
        order = %id,
        status = %order.status,
        by = %user.principal_id,
        "Order status updated"
    );

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(order),
        "Order status updated successfully",
    ))
}

// ── Shared transition flow ──

/// Drive one lifecycle transition, shared by the staff and kitchen routes.
///
/// Re-requesting the current status is an accepted no-op. The write itself
/// is conditional on the order still being in a status the target may
/// follow, so two racing updates cannot both win; the loser re-reads the
/// row to report what actually happened.
pub(crate) async fn apply_status_transition(
    state: &ServerState,
    tenant: &RecordId,
    id: &str,
    new_status: OrderStatus,
    cancel_reason: Option<String>,
) -> Result<Order, AppError> {
    let orders = OrderRepository::new(state.db.clone());

    let order = orders
        .find_by_id_for_tenant(tenant, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if order.status == new_status {
        return Ok(order);
    }
    if !order.status.can_transition_to(new_status) {
        return Err(transition_rejected(order.status, new_status));
    }

    let reason = if new_status == OrderStatus::Cancelled {
        match cancel_reason.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => Some(r.to_owned()),
            _ => return Err(AppError::new(ErrorCode::CancelReasonRequired)),
        }
    } else {
        None
    };

    match orders.update_status(tenant, id, new_status, reason).await? {
        Some(updated) => Ok(updated),
        // Lost a race: the row moved (or vanished) between read and write
        None => match orders.find_by_id_for_tenant(tenant, id).await? {
            Some(current) => Err(transition_rejected(current.status, new_status)),
            None => Err(AppError::new(ErrorCode::OrderNotFound)),
        },
    }
}

fn transition_rejected(from: OrderStatus, to: OrderStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("Cannot transition order from {from} to {to}"),
    )
}

/// A status filter arrives as a bare string on the query line
pub(crate) fn parse_status_filter(raw: Option<&str>) -> Result<Option<OrderStatus>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid order status: {s}"))),
    }
}
