//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration - all tunables of a tabletap node
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | ENVIRONMENT | development | development \| staging \| production |
/// | HTTP_PORT | 8080 | HTTP API port |
/// | WORK_DIR | ./data | Embedded database directory |
/// | LOG_DIR | (unset) | Optional directory for daily-rolling log files |
/// | JWT_SECRET | (required outside development) | Access token signing secret |
/// | REFRESH_TOKEN_SECRET | (required outside development) | Refresh token signing secret |
/// | ACCESS_TOKEN_TTL_MINUTES | 15 | Access token lifetime |
/// | REFRESH_TOKEN_TTL_DAYS | 7 | Refresh token lifetime |
/// | CORS_ORIGIN | (unset) | Allowed origin; permissive when unset |
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP API port
    pub http_port: u16,
    /// Working directory holding the embedded database
    pub work_dir: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
    /// Signing secret for access tokens
    pub jwt_secret: String,
    /// Signing secret for refresh tokens (separate from the access secret)
    pub refresh_token_secret: String,
    /// Access token lifetime in minutes
    pub access_token_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_ttl_days: i64,
    /// Allowed CORS origin; `None` means permissive
    pub cors_origin: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            refresh_token_secret: Self::require_secret("REFRESH_TOKEN_SECRET", &environment)?,
            access_token_ttl_minutes: std::env::var("ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            refresh_token_ttl_days: std::env::var("REFRESH_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// True when running with `ENVIRONMENT=production`
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_secret_falls_back_in_development() {
        let val = Config::require_secret("TEST_SECRET_THAT_IS_UNSET", "development").unwrap();
        assert_eq!(val, "dev-TEST_SECRET_THAT_IS_UNSET-not-for-production");
    }

    #[test]
    fn require_secret_fails_in_production() {
        let err = Config::require_secret("TEST_SECRET_THAT_IS_UNSET", "production");
        assert!(err.is_err());
    }
}
