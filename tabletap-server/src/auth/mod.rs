//! Authentication and authorization module
//!
//! JWT authentication, capability checks and the per-request middleware
//! chain:
//!
//! - [`TokenService`] - access/refresh token issuance and verification
//! - [`AuthContext`] - authenticated principal, injected by [`require_auth`]
//! - [`ActingTenant`] - tenant binding for all downstream data access
//! - [`require_capability`] - per-route capability gate
//! - [`rate_limit`] - fixed-window limits on credential and order routes

pub mod cookies;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod token;

pub use middleware::{
    ActingTenant, AuthContextExt, bind_acting_tenant, check_any_capability, enforce_tenant_scope,
    require_auth, require_capability,
};
pub use rate_limit::{RateLimiter, rate_limit_guard};
pub use token::{AuthContext, Claims, TokenConfig, TokenError, TokenKind, TokenService};
