//! Session routes
//!
//! - `POST /api/auth/register` — create a restaurant and open a session
//! - `POST /api/auth/login` — restaurant owner login
//! - `POST /api/auth/staff/login` — staff login
//! - `POST /api/auth/refresh-token` — mint a fresh access token
//! - `POST /api/auth/logout` — clear session cookies
//! - `GET /api/auth/me` — current principal
//! - `PUT /api/auth/change-password`
//!
//! Successful auth responses set the `accessToken` and `refreshToken`
//! HTTP-only cookies as well as returning the tokens in the payload.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::cookies::{ACCESS_COOKIE, REFRESH_COOKIE, auth_cookie, clear_cookie, cookie_value};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{AuthContext, TokenError, TokenKind};
use crate::core::ServerState;
use crate::db::models::TenantCreate;
use crate::db::repository::{StaffRepository, TenantRepository};
use crate::utils::validation::{
    normalize_email, validate_email, validate_name, validate_password,
};
use shared::{ApiResponse, AppError, ErrorCode, Role};

/// Dampens credential probing; applied on every failed login path
const LOGIN_FAILURE_DELAY: Duration = Duration::from_millis(500);

/// Largest refresh-token body we bother reading
const MAX_REFRESH_BODY_BYTES: usize = 16 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        // Public credential routes; throttled by the app-level rate limit guard
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/staff/login", post(staff_login))
        .route("/api/auth/refresh-token", post(refresh_token))
        // Protected session routes
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/change-password", put(change_password))
}

// ── Request / Response types ──

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct TenantSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Owner session payload
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub restaurant: TenantSummary,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct StaffSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RestaurantRef {
    pub id: String,
}

/// Staff session payload
#[derive(Debug, Serialize)]
pub struct StaffSessionResponse {
    pub user: StaffSummary,
    pub restaurant: RestaurantRef,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct PrincipalInfo {
    pub id: String,
    pub tenant_id: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PrincipalInfo,
}

// ── Helpers ──

/// Uniform login failure: fixed delay and one message for every path, so
/// the response reveals neither whether the email exists nor which check
/// failed.
async fn failed_login() -> AppError {
    tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
    AppError::new(ErrorCode::InvalidCredentials)
}

fn record_id_string(id: &Option<surrealdb::RecordId>) -> String {
    id.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Set-Cookie headers for a full session (access + refresh)
fn session_cookies(
    state: &ServerState,
    access_token: &str,
    refresh_token: &str,
) -> AppendHeaders<[(http::HeaderName, String); 2]> {
    let secure = state.config.is_production();
    let token_config = state.token_service.config();
    AppendHeaders([
        (
            SET_COOKIE,
            auth_cookie(
                ACCESS_COOKIE,
                access_token,
                token_config.access_ttl_seconds(),
                secure,
            ),
        ),
        (
            SET_COOKIE,
            auth_cookie(
                REFRESH_COOKIE,
                refresh_token,
                token_config.refresh_ttl_seconds(),
                secure,
            ),
        ),
    ])
}

// ── POST /api/auth/register ──

pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_name(&req.name, "Restaurant name")?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let email = normalize_email(&req.email);
    let tenants = TenantRepository::new(state.db.clone());

    if tenants.find_by_email(&email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailRegistered));
    }

    let hash_pass = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let tenant = tenants
        .create(TenantCreate {
            name: req.name.trim().to_string(),
            email,
            hash_pass,
            phone: req.phone,
            address: req.address,
            city: req.city,
        })
        .await?;

    let tenant_id = record_id_string(&tenant.id);
    let access_token =
        state
            .token_service
            .issue_access_token(&tenant_id, &tenant_id, &tenant.email, Role::Owner)?;
    let refresh_token = state
        .token_service
        .issue_refresh_token(&tenant_id, &tenant_id)?;

    tracing::info!(tenant = %tenant_id, name = %tenant.name, "Restaurant registered");

    let cookies = session_cookies(&state, &access_token, &refresh_token);
    let body = ApiResponse::success(
        StatusCode::CREATED,
        Some(SessionResponse {
            restaurant: TenantSummary {
                id: tenant_id,
                name: tenant.name,
                email: tenant.email,
                city: tenant.city,
            },
            access_token,
            refresh_token,
        }),
        "Restaurant registered successfully",
    );
    Ok((cookies, body))
}

// ── POST /api/auth/login ──

pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&req.email);
    let tenants = TenantRepository::new(state.db.clone());

    let Some(tenant) = tenants.find_by_email(&email).await? else {
        return Err(failed_login().await);
    };
    if !verify_password(&req.password, &tenant.hash_pass) {
        return Err(failed_login().await);
    }

    let tenant_id = record_id_string(&tenant.id);
    let access_token =
        state
            .token_service
            .issue_access_token(&tenant_id, &tenant_id, &tenant.email, Role::Owner)?;
    let refresh_token = state
        .token_service
        .issue_refresh_token(&tenant_id, &tenant_id)?;

    tracing::info!(tenant = %tenant_id, "Restaurant logged in");

    let cookies = session_cookies(&state, &access_token, &refresh_token);
    let body = ApiResponse::success(
        StatusCode::OK,
        Some(SessionResponse {
            restaurant: TenantSummary {
                id: tenant_id,
                name: tenant.name,
                email: tenant.email,
                city: tenant.city,
            },
            access_token,
            refresh_token,
        }),
        "Login successful",
    );
    Ok((cookies, body))
}

// ── POST /api/auth/staff/login ──

pub async fn staff_login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&req.email);
    let staff_repo = StaffRepository::new(state.db.clone());

    let Some(staff) = staff_repo.find_by_email(&email).await? else {
        return Err(failed_login().await);
    };
    if !verify_password(&req.password, &staff.hash_pass) {
        return Err(failed_login().await);
    }
    // Deactivation blocks login even with correct credentials
    if !staff.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let staff_id = record_id_string(&staff.id);
    let tenant_id = staff.tenant.to_string();
    let access_token =
        state
            .token_service
            .issue_access_token(&staff_id, &tenant_id, &staff.email, staff.role)?;
    let refresh_token = state
        .token_service
        .issue_refresh_token(&staff_id, &tenant_id)?;

    tracing::info!(staff = %staff_id, tenant = %tenant_id, role = %staff.role, "Staff logged in");

    let cookies = session_cookies(&state, &access_token, &refresh_token);
    let body = ApiResponse::success(
        StatusCode::OK,
        Some(StaffSessionResponse {
            user: StaffSummary {
                id: staff_id,
                name: staff.name,
                email: staff.email,
                role: staff.role,
            },
            restaurant: RestaurantRef { id: tenant_id },
            access_token,
            refresh_token,
        }),
        "Staff login successful",
    );
    Ok((cookies, body))
}

// ── POST /api/auth/refresh-token ──

/// The refresh token arrives in the `refreshToken` cookie or, failing that,
/// a `refresh_token` body field. The principal is re-loaded so a deactivated
/// staff account cannot keep refreshing, and the new access token always
/// carries the principal's current email and role.
pub async fn refresh_token(
    State(state): State<ServerState>,
    req: Request,
) -> Result<impl IntoResponse, AppError> {
    let presented = match cookie_value(req.headers(), REFRESH_COOKIE) {
        Some(token) => Some(token.to_owned()),
        None => axum::body::to_bytes(req.into_body(), MAX_REFRESH_BODY_BYTES)
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<RefreshRequest>(&bytes).ok())
            .and_then(|body| body.refresh_token),
    };
    let Some(token) = presented else {
        return Err(AppError::with_message(
            ErrorCode::NotAuthenticated,
            "Refresh token is required",
        ));
    };

    let claims = state
        .token_service
        .verify(&token, TokenKind::Refresh)
        .map_err(|e| match e {
            TokenError::Expired => {
                AppError::with_message(ErrorCode::TokenExpired, "Refresh token has expired")
            }
            _ => AppError::with_message(ErrorCode::TokenInvalid, "Invalid refresh token"),
        })?;

    let principal: surrealdb::RecordId = claims
        .sub
        .parse()
        .map_err(|_| AppError::with_message(ErrorCode::TokenInvalid, "Invalid refresh token"))?;

    let access_token = match principal.table() {
        "tenant" => {
            let tenant = TenantRepository::new(state.db.clone())
                .find_by_id(&claims.sub)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(ErrorCode::TokenInvalid, "Invalid refresh token")
                })?;
            state.token_service.issue_access_token(
                &claims.sub,
                &claims.tenant_id,
                &tenant.email,
                Role::Owner,
            )?
        }
        "staff" => {
            let staff = StaffRepository::new(state.db.clone())
                .find_by_id(&claims.sub)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(ErrorCode::TokenInvalid, "Invalid refresh token")
                })?;
            if !staff.is_active {
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }
            state.token_service.issue_access_token(
                &claims.sub,
                &staff.tenant.to_string(),
                &staff.email,
                staff.role,
            )?
        }
        _ => {
            return Err(AppError::with_message(
                ErrorCode::TokenInvalid,
                "Invalid refresh token",
            ));
        }
    };

    let secure = state.config.is_production();
    let cookies = AppendHeaders([(
        SET_COOKIE,
        auth_cookie(
            ACCESS_COOKIE,
            &access_token,
            state.token_service.config().access_ttl_seconds(),
            secure,
        ),
    )]);
    let body = ApiResponse::success(
        StatusCode::OK,
        Some(RefreshResponse { access_token }),
        "Token refreshed",
    );
    Ok((cookies, body))
}

// ── POST /api/auth/logout ──

/// Sessions are stateless; logout clears the cookies and the client drops
/// its copies.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(principal = %user.principal_id, "Logged out");

    let secure = state.config.is_production();
    let cookies = AppendHeaders([
        (SET_COOKIE, clear_cookie(ACCESS_COOKIE, secure)),
        (SET_COOKIE, clear_cookie(REFRESH_COOKIE, secure)),
    ]);
    let body = ApiResponse::<serde_json::Value>::message("Logged out successfully");
    Ok((cookies, body))
}

// ── GET /api/auth/me ──

pub async fn me(
    Extension(user): Extension<AuthContext>,
) -> Result<ApiResponse<MeResponse>, AppError> {
    Ok(ApiResponse::success(
        StatusCode::OK,
        Some(MeResponse {
            user: PrincipalInfo {
                id: user.principal_id,
                tenant_id: user.tenant_id,
                email: user.email,
                role: user.role,
            },
        }),
        "User details fetched",
    ))
}

// ── PUT /api/auth/change-password ──

pub async fn change_password(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    validate_password(&req.new_password)?;

    let principal: surrealdb::RecordId = user
        .principal_id
        .parse()
        .map_err(|_| AppError::invalid_token())?;

    let new_hash = hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    match user.role {
        Role::Owner => {
            let tenants = TenantRepository::new(state.db.clone());
            let tenant = tenants
                .find_by_id(&user.principal_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::TenantNotFound))?;
            if !verify_password(&req.current_password, &tenant.hash_pass) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidCredentials,
                    "Current password is incorrect",
                ));
            }
            tenants.update_password(&principal, new_hash).await?;
        }
        _ => {
            let staff_repo = StaffRepository::new(state.db.clone());
            let staff = staff_repo
                .find_by_id(&user.principal_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;
            if !verify_password(&req.current_password, &staff.hash_pass) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidCredentials,
                    "Current password is incorrect",
                ));
            }
            staff_repo.update_password(&principal, new_hash).await?;
        }
    }

    tracing::info!(principal = %user.principal_id, "Password changed");
    Ok(ApiResponse::message("Password changed successfully"))
}
