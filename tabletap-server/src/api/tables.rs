//! Dining table management
//!
//! - `GET /api/tables` — list the tenant's tables
//! - `POST /api/tables` — create a table (mints its QR payload)
//! - `GET /api/tables/{id}` — single table
//! - `PUT /api/tables/{id}` — update number, capacity or status
//! - `DELETE /api/tables/{id}` — delete, refused while orders are active
//! - `POST /api/tables/{id}/qr` — rotate the QR payload
//!
//! Reads are open to floor staff; mutations stay with menu managers. The
//! methods on one path need different gates, so handlers check their own
//! capabilities instead of a route-group layer.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::api::tenant_record;
use crate::auth::middleware::{ActingTenant, check_any_capability};
use crate::auth::token::AuthContext;
use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::db::repository::{DiningTableRepository, OrderRepository};
use crate::resolver::generate_qr_payload;
use shared::{ApiResponse, AppError, Capability, ErrorCode};

const READ_TABLES: &[Capability] = &[Capability::ManageMenu, Capability::ViewOrders];
const MANAGE_TABLES: &[Capability] = &[Capability::ManageMenu];

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tables", get(list_tables).post(create_table))
        .route(
            "/api/tables/{id}",
            get(get_table).put(update_table).delete(delete_table),
        )
        .route("/api/tables/{id}/qr", post(rotate_qr))
}

// ── Request types ──

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub table_number: u32,
    pub capacity: u32,
}

// ── GET /api/tables ──

pub async fn list_tables(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
) -> Result<ApiResponse<Vec<DiningTable>>, AppError> {
    check_any_capability(&user, READ_TABLES)?;
    let tenant = tenant_record(&acting)?;

    let tables = DiningTableRepository::new(state.db.clone())
        .find_by_tenant(&tenant)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(tables),
        "Tables fetched successfully",
    ))
}

// ── POST /api/tables ──

pub async fn create_table(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Json(req): Json<CreateTableRequest>,
) -> Result<ApiResponse<DiningTable>, AppError> {
    check_any_capability(&user, MANAGE_TABLES)?;
    let tenant = tenant_record(&acting)?;

    if req.table_number == 0 {
        return Err(AppError::validation("Table number must be at least 1"));
    }
    if req.capacity == 0 {
        return Err(AppError::validation("Capacity must be at least 1"));
    }

    let tables = DiningTableRepository::new(state.db.clone());
    if tables
        .find_by_number(&tenant, req.table_number)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::TableNumberTaken));
    }

    let created = tables
        .create(DiningTableCreate {
            tenant: tenant.clone(),
            table_number: req.table_number,
            capacity: req.capacity,
        })
        .await?;

    // The payload embeds the created id, so it can only be minted afterwards
    let table_id = created
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Created table has no ID"))?;
    let payload = generate_qr_payload(&tenant, &table_id);
    let table = tables.set_qr_payload(&tenant, &table_id, payload).await?;

    tracing::info!(
        table = %table_id,
        number = table.table_number,
        tenant = %tenant,
        "Table created"
    );

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        Some(table),
        "Table created successfully",
    ))
}

// ── GET /api/tables/{id} ──

pub async fn get_table(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
) -> Result<ApiResponse<DiningTable>, AppError> {
    check_any_capability(&user, READ_TABLES)?;
    let tenant = tenant_record(&acting)?;

    let table = DiningTableRepository::new(state.db.clone())
        .find_by_id_for_tenant(&tenant, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(table),
        "Table fetched successfully",
    ))
}

// ── PUT /api/tables/{id} ──

pub async fn update_table(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
    Json(req): Json<DiningTableUpdate>,
) -> Result<ApiResponse<DiningTable>, AppError> {
    check_any_capability(&user, MANAGE_TABLES)?;
    let tenant = tenant_record(&acting)?;

    let tables = DiningTableRepository::new(state.db.clone());
    let existing = tables
        .find_by_id_for_tenant(&tenant, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;

    if let Some(number) = req.table_number
        && number != existing.table_number
        && tables.find_by_number(&tenant, number).await?.is_some()
    {
        return Err(AppError::new(ErrorCode::TableNumberTaken));
    }

    let table = tables.update(&tenant, &id, req).await?;

    tracing::info!(table = %id, tenant = %tenant, "Table updated");

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(table),
        "Table updated successfully",
    ))
}

// ── DELETE /api/tables/{id} ──

pub async fn delete_table(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    check_any_capability(&user, MANAGE_TABLES)?;
    let tenant = tenant_record(&acting)?;

    let tables = DiningTableRepository::new(state.db.clone());
    let table = tables
        .find_by_id_for_tenant(&tenant, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;

    let table_id = table
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Table has no ID"))?;
    let active = OrderRepository::new(state.db.clone())
        .count_active_for_table(&tenant, &table_id)
        .await?;
    if active > 0 {
        return Err(AppError::with_message(
            ErrorCode::TableHasActiveOrders,
            "Cannot delete table with active orders",
        ));
    }

    if !tables.delete(&tenant, &id).await? {
        return Err(AppError::new(ErrorCode::TableNotFound));
    }

    tracing::info!(table = %id, tenant = %tenant, "Table deleted");

    Ok(ApiResponse::message("Table deleted successfully"))
}

// ── POST /api/tables/{id}/qr ──

pub async fn rotate_qr(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
) -> Result<ApiResponse<DiningTable>, AppError> {
    check_any_capability(&user, MANAGE_TABLES)?;
    let tenant = tenant_record(&acting)?;

    let tables = DiningTableRepository::new(state.db.clone());
    let table = tables
        .find_by_id_for_tenant(&tenant, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;

    let table_id = table
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Table has no ID"))?;

    // A fresh nonce makes every previously printed code stop resolving
    let payload = generate_qr_payload(&tenant, &table_id);
    let table = tables.set_qr_payload(&tenant, &table_id, payload).await?;

    tracing::info!(table = %id, tenant = %tenant, "Table QR payload rotated");

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(table),
        "QR code generated successfully",
    ))
}
