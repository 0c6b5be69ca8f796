//! Unauthenticated customer routes
//!
//! - `GET /api/customer/menu/{qr}` — the available menu for a scanned table
//!
//! The QR payload is the customer's only credential: it resolves to exactly
//! one table in exactly one restaurant, and everything returned is scoped to
//! that restaurant. Order placement itself lives on `POST /api/orders`.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;
use http::StatusCode;
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::MenuItem;
use crate::db::repository::MenuItemRepository;
use crate::resolver::TableResolver;
use shared::{ApiResponse, AppError};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/customer/menu/{qr}", get(menu_for_table))
}

#[derive(Debug, Serialize)]
pub struct CustomerMenuResponse {
    pub restaurant_id: String,
    pub table_number: u32,
    pub items: Vec<MenuItem>,
}

// ── GET /api/customer/menu/{qr} ──

pub async fn menu_for_table(
    State(state): State<ServerState>,
    Path(qr): Path<String>,
) -> Result<ApiResponse<CustomerMenuResponse>, AppError> {
    let resolved = TableResolver::new(state.db.clone())
        .resolve_by_qr(&qr)
        .await?;

    // Customers only see what they can actually order
    let items = MenuItemRepository::new(state.db.clone())
        .find_available_by_tenant(&resolved.tenant)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(CustomerMenuResponse {
            restaurant_id: resolved.tenant.to_string(),
            table_number: resolved.table.table_number,
            items,
        }),
        "Menu fetched successfully",
    ))
}
