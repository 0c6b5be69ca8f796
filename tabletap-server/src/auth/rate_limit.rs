//! Application-layer rate limiting for auth and public order routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::{AppError, ErrorCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Credential routes: 5 attempts per 15 minutes per IP
const AUTH_MAX_REQUESTS: u32 = 5;
const AUTH_WINDOW_SECS: u64 = 900;

/// Public order creation: 10 orders per minute per IP
const ORDER_MAX_REQUESTS: u32 = 10;
const ORDER_WINDOW_SECS: u64 = 60;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Remove entries whose window started more than 30 minutes ago
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(1800);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }

        // Remove empty route maps
        map.retain(|_, route_map| !route_map.is_empty());
    }
}

/// Extract client IP: X-Forwarded-For header first (reverse proxy), then peer address.
fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // X-Forwarded-For can be comma-separated; first entry is the original client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    // Fallback: peer address from extensions (ConnectInfo)
    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Maps a request to its rate-limit bucket, if it has one.
fn bucket_for(request: &Request) -> Option<(&'static str, u32, u64)> {
    if request.method() != axum::http::Method::POST {
        return None;
    }
    match request.uri().path() {
        "/api/auth/register"
        | "/api/auth/login"
        | "/api/auth/staff/login"
        | "/api/auth/refresh-token" => Some(("auth", AUTH_MAX_REQUESTS, AUTH_WINDOW_SECS)),
        "/api/orders" => Some(("orders", ORDER_MAX_REQUESTS, ORDER_WINDOW_SECS)),
        _ => None,
    }
}

/// Rate limit middleware covering credential routes and public order creation.
///
/// Runs app-wide; requests outside the configured buckets pass through
/// untouched.
pub async fn rate_limit_guard(
    State(state): State<crate::core::ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some((route, max_requests, window_secs)) = bucket_for(&request) {
        let ip = extract_ip(&request);
        if !state
            .rate_limiter
            .check(route, &ip, max_requests, window_secs)
            .await
        {
            crate::security_log!("warn", "rate_limited", route = route, ip = ip.clone());
            return Err(AppError::new(ErrorCode::RateLimited));
        }
    }
    Ok(next.run(request).await)
}
