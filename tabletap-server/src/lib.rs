//! TableTap Server - multi-tenant restaurant ordering backend
//!
//! # Overview
//!
//! Single-binary HTTP service backing the TableTap platform:
//!
//! - **Authentication** (`auth`): JWT access/refresh tokens, Argon2 password hashing
//! - **Authorization** (`auth::middleware`): tenant binding, capability checks, cross-tenant guards
//! - **Database** (`db`): embedded SurrealDB storage (RocksDB backend)
//! - **Table resolution** (`resolver`): QR payload and table-number lookup
//! - **HTTP API** (`api`): RESTful routes under `/api`
//!
//! # Module structure
//!
//! ```text
//! tabletap-server/src/
//! ├── core/          # Config, server state
//! ├── auth/          # Tokens, passwords, middleware, rate limiting
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Models and repositories
//! ├── resolver.rs    # QR / table-number resolution
//! └── utils/         # Logger, validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod resolver;
pub mod utils;

// Re-export common types
pub use auth::{AuthContext, TokenService};
pub use core::{Config, ServerState};
pub use db::{RepoError, RepoResult};

// Re-export logger functions
pub use utils::logger::init_logger;

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
