//! Shared application state

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::rate_limit::RateLimiter;
use crate::auth::token::{TokenConfig, TokenService};
use crate::core::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded SurrealDB handle
    pub db: Surreal<Db>,
    /// JWT token service (access + refresh)
    pub token_service: Arc<TokenService>,
    /// Rate limiter for auth and public order routes
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    /// Open the database, define the schema and assemble the state
    pub async fn initialize(config: &Config) -> Result<Self, BoxError> {
        let db = crate::db::connect(&config.work_dir).await?;
        crate::db::define_schema(&db).await?;

        let token_service = Arc::new(TokenService::new(TokenConfig {
            access_secret: config.jwt_secret.clone(),
            refresh_secret: config.refresh_token_secret.clone(),
            access_ttl_minutes: config.access_token_ttl_minutes,
            refresh_ttl_days: config.refresh_token_ttl_days,
            issuer: "tabletap".into(),
        }));

        Ok(Self {
            config: config.clone(),
            db,
            token_service,
            rate_limiter: RateLimiter::new(),
        })
    }
}
