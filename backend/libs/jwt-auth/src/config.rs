//! Token manager configuration
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development)

use anyhow::{Context, Result};
use chrono::Duration;
use std::env;
use std::fmt;
use tracing::info;
use zeroize::Zeroizing;

/// Default access token lifetime: 15 minutes
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
/// Default refresh token lifetime: 720 hours
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 720 * 60 * 60;

/// Signing secret and token lifetimes.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC signing secret, zeroed on drop
    pub secret: Zeroizing<Vec<u8>>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Reject access tokens on the refresh path and vice versa.
    /// Disabling this accepts either kind on both paths.
    pub enforce_token_type: bool,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("access_ttl_secs", &self.access_ttl.num_seconds())
            .field("refresh_ttl_secs", &self.refresh_ttl.num_seconds())
            .field("enforce_token_type", &self.enforce_token_type)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<Vec<u8>>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            access_ttl,
            refresh_ttl,
            enforce_token_type: true,
        }
    }

    pub fn with_token_type_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_token_type = enforce;
        self
    }

    /// Load configuration from environment variables
    ///
    /// **Environment Variables**:
    /// - `JWT_SECRET`: HMAC signing secret (REQUIRED)
    /// - `JWT_ACCESS_TTL_SECS`: access token lifetime (default: 900)
    /// - `JWT_REFRESH_TTL_SECS`: refresh token lifetime (default: 2592000)
    /// - `JWT_ENFORCE_TOKEN_TYPE`: true/false (default: true)
    pub fn from_env() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        let secret = env::var("JWT_SECRET").context("JWT_SECRET environment variable not set")?;

        let access_ttl_secs: i64 = env::var("JWT_ACCESS_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_TTL_SECS.to_string())
            .parse()
            .context("Invalid JWT_ACCESS_TTL_SECS")?;

        let refresh_ttl_secs: i64 = env::var("JWT_REFRESH_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_TTL_SECS.to_string())
            .parse()
            .context("Invalid JWT_REFRESH_TTL_SECS")?;

        let enforce_token_type: bool = env::var("JWT_ENFORCE_TOKEN_TYPE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .context("Invalid JWT_ENFORCE_TOKEN_TYPE")?;

        let access_ttl =
            Duration::try_seconds(access_ttl_secs).context("JWT_ACCESS_TTL_SECS out of range")?;
        let refresh_ttl =
            Duration::try_seconds(refresh_ttl_secs).context("JWT_REFRESH_TTL_SECS out of range")?;

        info!(
            access_ttl_secs,
            refresh_ttl_secs, enforce_token_type, "Loaded JWT configuration from environment"
        );

        Ok(Self::new(secret.into_bytes(), access_ttl, refresh_ttl)
            .with_token_type_enforcement(enforce_token_type))
    }
}
