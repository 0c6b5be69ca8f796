//! Kitchen-facing order routes
//!
//! - `GET /api/kitchen/orders` — the active queue (pending + preparing),
//!   oldest first; kitchens poll this and work it front to back
//! - `GET /api/kitchen/orders/all` — the full paginated listing
//! - `PUT /api/kitchen/orders/{id}/status` — same transition flow as the
//!   staff route, gated for kitchen roles

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Extension, Json, Router, middleware};
use http::StatusCode;

use crate::api::orders::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, OrderListResponse, OrdersQuery, UpdateStatusRequest,
    apply_status_transition, parse_status_filter,
};
use crate::api::tenant_record;
use crate::auth::middleware::{ActingTenant, require_capability};
use crate::auth::token::AuthContext;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use shared::{ApiResponse, AppError, Capability, order::ACTIVE_STATUSES};

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(
            Router::new()
                .route("/api/kitchen/orders", get(kitchen_queue))
                .route("/api/kitchen/orders/all", get(all_orders))
                .layer(middleware::from_fn(require_capability(&[
                    Capability::ViewOrders,
                    Capability::UpdateOrderStatus,
                ]))),
        )
        .merge(
            Router::new()
                .route("/api/kitchen/orders/{id}/status", put(update_status))
                .layer(middleware::from_fn(require_capability(&[
                    Capability::UpdateOrderStatus,
                ]))),
        )
}

// ── GET /api/kitchen/orders ──

pub async fn kitchen_queue(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
) -> Result<ApiResponse<Vec<Order>>, AppError> {
    let tenant = tenant_record(&acting)?;

    let orders = OrderRepository::new(state.db.clone())
        .kitchen_queue(&tenant, ACTIVE_STATUSES)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(orders),
        "Kitchen orders fetched successfully",
    ))
}

// ── GET /api/kitchen/orders/all ──

pub async fn all_orders(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
    Query(query): Query<OrdersQuery>,
) -> Result<ApiResponse<OrderListResponse>, AppError> {
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

// ── PUT /api/kitchen/orders/{id}/status ──

pub async fn update_status(
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
        "Order status updated from kitchen"
    );

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(order),
        "Order status updated successfully",
    ))
}
