//! Staff account management
//!
//! - `GET /api/staff` — list the tenant's staff accounts
//! - `POST /api/staff` — create a staff account (manager or kitchen_staff)
//! - `DELETE /api/staff/{id}` — deactivate; the row stays for history
//!
//! All routes require `manage_staff`, which only owners hold.

use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Extension, Json, Router, middleware};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::tenant_record;
use crate::auth::middleware::{ActingTenant, require_capability};
use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::models::{Staff, StaffCreate};
use crate::db::repository::StaffRepository;
use crate::utils::validation::{normalize_email, validate_email, validate_name, validate_password};
use crate::{RepoError, security_log};
use shared::{ApiResponse, AppError, Capability, ErrorCode, Role};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/staff", get(list_staff).post(create_staff))
        .route("/api/staff/{id}", delete(deactivate_staff))
        .layer(middleware::from_fn(require_capability(&[
            Capability::ManageStaff,
        ])))
}

// ── Request / Response types ──

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Staff row without the credential hash
#[derive(Debug, Serialize)]
pub struct StaffView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<Staff> for StaffView {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            name: staff.name,
            email: staff.email,
            role: staff.role,
            is_active: staff.is_active,
            created_at: staff.created_at,
        }
    }
}

// ── GET /api/staff ──

pub async fn list_staff(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
) -> Result<ApiResponse<Vec<StaffView>>, AppError> {
    let tenant = tenant_record(&acting)?;

    let staff = StaffRepository::new(state.db.clone())
        .find_by_tenant(&tenant)
        .await?
        .into_iter()
        .map(StaffView::from)
        .collect();

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(staff),
        "Staff users fetched successfully",
    ))
}

// ── POST /api/staff ──

pub async fn create_staff(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
    Json(req): Json<CreateStaffRequest>,
) -> Result<ApiResponse<StaffView>, AppError> {
    let tenant = tenant_record(&acting)?;

    validate_name(&req.name, "Staff name")?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let role: Role = req
        .role
        .parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidRole))?;
    if !role.assignable_to_staff() {
        return Err(AppError::new(ErrorCode::InvalidRole));
    }

    let email = normalize_email(&req.email);
    let repo = StaffRepository::new(state.db.clone());
    if repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailRegistered));
    }

    let hash_pass = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let staff = repo
        .create(StaffCreate {
            tenant: tenant.clone(),
            name: req.name.trim().to_string(),
            email,
            hash_pass,
            role,
        })
        .await?;

    tracing::info!(
        staff = %staff.id.as_ref().map(ToString::to_string).unwrap_or_default(),
        role = role.as_str(),
        tenant = %tenant,
        "Staff account created"
    );

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        Some(StaffView::from(staff)),
        "Staff user created successfully",
    ))
}

// ── DELETE /api/staff/{id} ──

pub async fn deactivate_staff(
    State(state): State<ServerState>,
    Extension(acting): Extension<ActingTenant>,
    Path(id): Path<String>,
) -> Result<ApiResponse<StaffView>, AppError> {
    let tenant = tenant_record(&acting)?;

    let staff = match StaffRepository::new(state.db.clone())
        .deactivate(&tenant, &id)
        .await
    {
        Ok(staff) => staff,
        Err(RepoError::NotFound(_)) => return Err(AppError::new(ErrorCode::StaffNotFound)),
        Err(e) => return Err(e.into()),
    };

    security_log!(
        "info",
        "staff_deactivated",
        staff = id.clone(),
        tenant = acting.0.clone()
    );

    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(StaffView::from(staff)),
        "Staff user deactivated successfully",
    ))
}
