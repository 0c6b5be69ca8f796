//! Menu item management
//!
//! - `GET /api/menu` — list the tenant's menu
//! - `POST /api/menu` — add a menu item
//! - `PUT /api/menu/{id}` — update, including availability toggling
//!
//! Orders snapshot price and name at placement, so edits here only affect
//! orders placed after the change.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::tenant_record;
use crate::auth::middleware::{ActingTenant, check_any_capability};
use crate::auth::token::AuthContext;
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuItemRepository;
use crate::utils::validation::validate_name;
use shared::{ApiResponse, AppError, Capability, ErrorCode};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/menu", get(list_menu).post(create_menu_item))
        .route("/api/menu/{id}", put(update_menu_item))
}

// ── Request types ──

#[derive(Debug, Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ── GET /api/menu ──

pub async fn list_menu(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
) -> Result<ApiResponse<Vec<MenuItem>>, AppError> {
    check_any_capability(&user, &[Capability::ViewOrders, Capability::ManageMenu])?;
    let tenant = tenant_record(&acting)?;

    let items = MenuItemRepository::new(state.db.clone())
        .find_by_tenant(&tenant)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(items),
        "Menu items fetched successfully",
    ))
}

// ── POST /api/menu ──

pub async fn create_menu_item(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Json(req): Json<CreateMenuItemRequest>,
) -> Result<ApiResponse<MenuItem>, AppError> {
    check_any_capability(&user, &[Capability::CreateMenu])?;
    let tenant = tenant_record(&acting)?;

    validate_name(&req.name, "Item name")?;
    if req.price < Decimal::ZERO {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let item = MenuItemRepository::new(state.db.clone())
        .create(MenuItemCreate {
            tenant: tenant.clone(),
            name: req.name.trim().to_string(),
            description: req.description,
            price: req.price,
            category: req.category,
            image_url: req.image_url,
        })
        .await?;

    tracing::info!(
        item = %item.id.as_ref().map(ToString::to_string).unwrap_or_default(),
        name = %item.name,
        tenant = %tenant,
        "Menu item created"
    );

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        Some(item),
        "Menu item created successfully",
    ))
}

// ── PUT /api/menu/{id} ──

pub async fn update_menu_item(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
    Json(req): Json<MenuItemUpdate>,
) -> Result<ApiResponse<MenuItem>, AppError> {
    check_any_capability(&user, &[Capability::ManageMenu])?;
    let tenant = tenant_record(&acting)?;

    if let Some(name) = &req.name {
        validate_name(name, "Item name")?;
    }
    if let Some(price) = req.price
        && price < Decimal::ZERO
    {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let menu = MenuItemRepository::new(state.db.clone());
    if menu.find_by_id_for_tenant(&tenant, &id).await?.is_none() {
        return Err(AppError::new(ErrorCode::MenuItemNotFound));
    }

    let item = menu.update(&tenant, &id, req).await?;

    tracing::info!(item = %id, tenant = %tenant, "Menu item updated");

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(item),
        "Menu item updated successfully",
    ))
}
