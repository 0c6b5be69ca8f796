//! HTTP API routes
//!
//! Route groups, all under `/api`:
//! - `auth`      — sessions: register, login, refresh, logout, me
//! - `orders`    — order placement (public) and staff order management
//! - `kitchen`   — the kitchen queue and status updates
//! - `tables`    — dining table CRUD and QR minting
//! - `menu`      — menu item CRUD
//! - `staff`     — staff accounts
//! - `analytics` — revenue, peak hours, top items
//! - `customer`  — unauthenticated QR-scoped reads
//! - `health`    — liveness

pub mod analytics;
pub mod auth;
pub mod customer;
pub mod health;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod staff;
pub mod tables;

use axum::{Router, middleware as axum_middleware};
use http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{ActingTenant, bind_acting_tenant, enforce_tenant_scope, require_auth};
use crate::auth::rate_limit::rate_limit_guard;
use crate::core::{Config, ServerState};
use shared::{AppError, AppResult, ErrorCode};
use surrealdb::RecordId;

/// Hard ceiling on request handling time; store calls carry no individual
/// timeouts, this layer bounds them all at once.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a router with all route groups registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(orders::router())
        .merge(kitchen::router())
        .merge(tables::router())
        .merge(menu::router())
        .merge(staff::router())
        .merge(analytics::router())
        .merge(customer::router())
        .merge(health::router())
}

/// Build the fully configured application: routes, authorization chain and
/// ambient HTTP middleware
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // Authorization chain, innermost last: authenticate, bind the acting
        // tenant, then cross-check any caller-named tenant. Capability gates
        // sit on the individual route groups.
        .layer(axum_middleware::from_fn(enforce_tenant_scope))
        .layer(axum_middleware::from_fn(bind_acting_tenant))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_guard,
        ))
        // Ambient HTTP middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

/// CORS policy: a configured origin gets credentials support, otherwise a
/// permissive development policy
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = config
        .cors_origin
        .as_deref()
        .and_then(|o| o.parse::<HeaderValue>().ok());

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    }
}

/// Parse the acting tenant id bound by the middleware into a record id
pub(crate) fn tenant_record(acting: &ActingTenant) -> AppResult<RecordId> {
    acting.0.parse().map_err(|_| {
        AppError::with_message(ErrorCode::InvalidRequest, "Restaurant ID not found in token")
    })
}
