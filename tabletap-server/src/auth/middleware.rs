//! Authorization middleware chain
//!
//! Every request to a protected `/api` route passes through, in order:
//!
//! 1. [`require_auth`] - verify the access token (cookie first, then bearer
//!    header) and inject [`AuthContext`] into the request extensions
//! 2. [`bind_acting_tenant`] - copy the tenant id out of the verified claims
//!    into an [`ActingTenant`] value; reject tokens without one
//! 3. [`enforce_tenant_scope`] - reject requests that explicitly name a
//!    tenant other than the acting one (query parameter or body field)
//! 4. [`require_capability`] - per-route capability gate (OR semantics)
//!
//! Steps 1-3 are applied application-wide; step 4 is layered onto individual
//! route groups, mirroring how each endpoint declares its required
//! capabilities.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::collections::HashMap;

use crate::auth::cookies::{ACCESS_COOKIE, cookie_value};
use crate::auth::token::{AuthContext, TokenError, TokenKind, TokenService};
use crate::core::ServerState;
use crate::security_log;
use shared::{AppError, Capability, ErrorCode};

/// Longest JSON body the tenant-scope check will buffer
const MAX_SCOPED_BODY_BYTES: usize = 256 * 1024;

/// Acting tenant for the current request, bound from the verified token
#[derive(Debug, Clone)]
pub struct ActingTenant(pub String);

/// Authentication middleware - requires a valid access token
///
/// Extracts the token from the `accessToken` cookie, falling back to
/// `Authorization: Bearer <token>`. On success injects [`AuthContext`] into
/// the request extensions.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths
/// - credential routes (`/api/auth/register`, `/api/auth/login`,
///   `/api/auth/staff/login`, `/api/auth/refresh-token`)
/// - `POST /api/orders` (customer order placement)
/// - `/api/customer/*` (QR-scoped customer reads)
/// - `/api/health`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight OPTIONS requests through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes skip auth (they 404 as usual)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let token = match cookie_value(req.headers(), ACCESS_COOKIE) {
        Some(token) => token.to_owned(),
        None => {
            let bearer = req
                .headers()
                .get(http::header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(TokenService::extract_from_header);
            match bearer {
                Some(token) => token.to_owned(),
                None => {
                    security_log!("warn", "auth_missing", uri = format!("{:?}", req.uri()));
                    return Err(AppError::with_message(
                        ErrorCode::NotAuthenticated,
                        "Access token is required",
                    ));
                }
            }
        }
    };

    match state.token_service.verify(&token, TokenKind::Access) {
        Ok(claims) => {
            let user = AuthContext::from_access_claims(claims)?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "warn",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                TokenError::Expired => Err(AppError::with_message(
                    ErrorCode::TokenExpired,
                    "Token has expired",
                )),
                _ => Err(AppError::with_message(ErrorCode::TokenInvalid, "Invalid token")),
            }
        }
    }
}

fn is_public_route(method: &http::Method, path: &str) -> bool {
    path == "/api/health"
        || path == "/api/auth/register"
        || path == "/api/auth/login"
        || path == "/api/auth/staff/login"
        || path == "/api/auth/refresh-token"
        || path.starts_with("/api/customer/")
        || (method == http::Method::POST && path == "/api/orders")
}

/// Tenant binding middleware
///
/// Copies the tenant id from the authenticated context into an
/// [`ActingTenant`] extension. A verified token without a tenant id is
/// malformed and rejected. Requests without an [`AuthContext`] (public
/// routes) pass through untouched; customer routes bind their tenant via the
/// table resolver instead.
pub async fn bind_acting_tenant(mut req: Request, next: Next) -> Result<Response, AppError> {
    let Some(user) = req.extensions().get::<AuthContext>() else {
        return Ok(next.run(req).await);
    };

    if user.tenant_id.is_empty() {
        security_log!("warn", "tenant_missing", principal = user.principal_id.clone());
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Restaurant ID not found in token",
        ));
    }

    let tenant = ActingTenant(user.tenant_id.clone());
    req.extensions_mut().insert(tenant);
    Ok(next.run(req).await)
}

/// Tenant scope enforcement middleware
///
/// A request may explicitly name a tenant in a `tenant_id` query parameter or
/// a top-level `tenant_id` body field. Whenever it does, the named tenant
/// must equal the acting tenant; anything else is a boundary violation and is
/// rejected before the handler runs. JSON bodies are buffered (bounded) for
/// the check and replayed for the handler.
pub async fn enforce_tenant_scope(req: Request, next: Next) -> Result<Response, AppError> {
    let Some(acting) = req.extensions().get::<ActingTenant>().cloned() else {
        return Ok(next.run(req).await);
    };

    if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
        && let Some(claimed) = params.get("tenant_id")
        && *claimed != acting.0
    {
        return Err(tenant_boundary_violation(&acting.0, claimed));
    }

    let is_json = req
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if !is_json {
        return Ok(next.run(req).await);
    }

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_SCOPED_BODY_BYTES)
        .await
        .map_err(|_| AppError::validation("Request body too large"))?;

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes)
        && let Some(claimed) = value.get("tenant_id").and_then(|v| v.as_str())
        && claimed != acting.0
    {
        return Err(tenant_boundary_violation(&acting.0, claimed));
    }

    let req = Request::from_parts(parts, axum::body::Body::from(bytes));
    Ok(next.run(req).await)
}

fn tenant_boundary_violation(acting: &str, claimed: &str) -> AppError {
    security_log!(
        "warn",
        "tenant_boundary_violation",
        acting_tenant = acting.to_owned(),
        claimed_tenant = claimed.to_owned()
    );
    AppError::with_message(ErrorCode::TenantMismatch, "Cannot access other restaurants data")
}

/// Capability check middleware - requires any of the listed capabilities
///
/// OR semantics: the caller's role must hold at least one of `required`. An
/// empty list always passes. Denials report the required capabilities and the
/// caller's role for diagnostics.
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/", get(handler::list_orders))
///     .layer(middleware::from_fn(require_capability(&[
///         Capability::ManageOrders,
///         Capability::ViewOrders,
///     ])));
/// ```
pub fn require_capability(
    required: &'static [Capability],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<AuthContext>()
                .ok_or_else(AppError::unauthenticated)?;

            check_any_capability(user, required)?;

            Ok(next.run(req).await)
        })
    }
}

/// Direct capability check for handlers whose siblings on the same path need
/// different gates. Same OR semantics and denial shape as
/// [`require_capability`].
pub fn check_any_capability(
    user: &AuthContext,
    required: &'static [Capability],
) -> Result<(), AppError> {
    if !required.is_empty() && !user.role.has_any(required) {
        security_log!(
            "warn",
            "capability_denied",
            principal = user.principal_id.clone(),
            role = user.role.as_str(),
            required = format!("{:?}", required)
        );
        return Err(AppError::with_message(
            ErrorCode::PermissionDenied,
            "Insufficient permissions for this action",
        )
        .with_detail("requiredPermissions", json!(required))
        .with_detail("userRole", json!(user.role)));
    }
    Ok(())
}

/// Extension trait for reading the authenticated user off a request
pub trait AuthContextExt {
    /// Get the [`AuthContext`] from the request extensions
    fn auth_context(&self) -> Result<&AuthContext, AppError>;
}

impl AuthContextExt for Request {
    fn auth_context(&self) -> Result<&AuthContext, AppError> {
        self.extensions()
            .get::<AuthContext>()
            .ok_or_else(AppError::unauthenticated)
    }
}
