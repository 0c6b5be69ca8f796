//! JWT token service
//!
//! Issues and verifies the two token kinds used by the platform: short-lived
//! access tokens and long-lived refresh tokens. The kinds are signed with
//! separate secrets and carry an explicit `kind` claim, so a token of one kind
//! is never accepted where the other is expected.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::Role;
use thiserror::Error;

/// Token service configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Signing secret for access tokens
    pub access_secret: String,
    /// Signing secret for refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_ttl_days: i64,
    /// Token issuer
    pub issuer: String,
}

impl TokenConfig {
    /// Access token lifetime in seconds (cookie Max-Age)
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_minutes * 60
    }

    /// Refresh token lifetime in seconds (cookie Max-Age)
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_days * 24 * 60 * 60
    }
}

/// Token kind discriminator carried in the claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by both token kinds
///
/// Refresh tokens omit `email` and `role`; the principal is re-read from
/// storage when a refresh token is redeemed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal ID (tenant owner or staff record)
    pub sub: String,
    /// Tenant the principal acts for
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Token kind
    pub kind: TokenKind,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// Token errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("wrong token kind")]
    WrongKind,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// Authenticated principal, injected into request extensions by `require_auth`
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Principal ID ("tenant:xxx" for owners, "staff:xxx" for staff)
    pub principal_id: String,
    /// Tenant the principal acts for
    pub tenant_id: String,
    /// Principal email
    pub email: String,
    /// Principal role
    pub role: Role,
}

impl AuthContext {
    /// Build the context from verified access-token claims.
    ///
    /// Access tokens always carry `email` and `role`; their absence means the
    /// token was not minted by this service.
    pub fn from_access_claims(claims: Claims) -> Result<Self, TokenError> {
        let email = claims
            .email
            .ok_or_else(|| TokenError::Invalid("missing email claim".into()))?;
        let role = claims
            .role
            .ok_or_else(|| TokenError::Invalid("missing role claim".into()))?;
        Ok(Self {
            principal_id: claims.sub,
            tenant_id: claims.tenant_id,
            email,
            role,
        })
    }
}

/// JWT token service covering both token kinds
pub struct TokenService {
    config: TokenConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenService {
    /// Create the service from a config, deriving the signing keys
    pub fn new(config: TokenConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        Self {
            config,
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue an access token for a principal
    pub fn issue_access_token(
        &self,
        principal_id: &str,
        tenant_id: &str,
        email: &str,
        role: Role,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.access_ttl_minutes);

        let claims = Claims {
            sub: principal_id.to_string(),
            tenant_id: tenant_id.to_string(),
            email: Some(email.to_string()),
            role: Some(role),
            kind: TokenKind::Access,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    /// Issue a refresh token for a principal
    pub fn issue_refresh_token(
        &self,
        principal_id: &str,
        tenant_id: &str,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiration = now + Duration::days(self.config.refresh_ttl_days);

        let claims = Claims {
            sub: principal_id.to_string(),
            tenant_id: tenant_id.to_string(),
            email: None,
            role: None,
            kind: TokenKind::Refresh,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    /// Verify a token and require it to be of the expected kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let decoding_key = match expected {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s grace window would let a
        // just-expired token through
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let token_data =
            decode::<Claims>(token, decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        if token_data.claims.kind != expected {
            return Err(TokenError::WrongKind);
        }

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}
