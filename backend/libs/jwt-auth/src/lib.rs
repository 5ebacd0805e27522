//! Dual-token (access + refresh) JWT issuer and validator
//!
//! **Security Features**:
//! - HS256 signing with a secret held only by the manager
//! - HMAC-family allow-list on validation (rejects `none` and asymmetric algorithms)
//! - Explicit `token_type` claim so refresh tokens cannot be replayed as access tokens
//! - Injectable clock for deterministic expiry checks
//!
//! Tokens are self-contained: validation needs only the signature and the
//! embedded claims. Revocation and persistence are left to the caller.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod clock;
pub mod config;
pub mod error;
pub mod secret_validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::JwtConfig;
pub use error::{Result, TokenError};
pub use secret_validation::{find_weakness, validate_secret_strength, SecretStrength};

/// Algorithm used when signing
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when validating
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Which half of a token pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal (user) ID
    pub uid: i64,
    /// Authorization role
    pub role: String,
    /// Issued at (Unix timestamp), 0 when the issuer omitted it
    #[serde(default, deserialize_with = "numeric_date::deserialize")]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    #[serde(deserialize_with = "numeric_date::deserialize")]
    pub exp: i64,
    /// Absent in tokens minted before the claim existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

/// JWT NumericDate: whole or fractional seconds since the epoch
mod numeric_date {
    use serde::{de, Deserialize, Deserializer};

    /// Fractions are truncated, so a fractional `exp` expires at the start of its second
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = serde_json::Number::deserialize(deserializer)?;
        if let Some(secs) = value.as_i64() {
            return Ok(secs);
        }

        match value.as_f64() {
            Some(secs) if secs.is_finite() && secs.abs() < i64::MAX as f64 => {
                Ok(secs.trunc() as i64)
            }
            _ => Err(de::Error::custom(format!("NumericDate out of range: {value}"))),
        }
    }
}

/// Access and refresh tokens minted by one `generate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires: DateTime<Utc>,
    pub refresh_expires: DateTime<Utc>,
}

/// Issue and validate token pairs
pub trait TokenManager: Send + Sync {
    fn generate(&self, principal_id: i64, role: &str) -> Result<TokenPair>;

    /// Returns `(principal_id, role)` for a valid access token
    fn validate_access(&self, token: &str) -> Result<(i64, String)>;

    /// Returns `(principal_id, role)` for a valid refresh token
    fn validate_refresh(&self, token: &str) -> Result<(i64, String)>;
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// HMAC token manager
///
/// Immutable after construction; share it across threads behind an `Arc`.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    enforce_token_type: bool,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtManager")
            .field("secret", &"[REDACTED]")
            .field("access_ttl_secs", &self.access_ttl.num_seconds())
            .field("refresh_ttl_secs", &self.refresh_ttl.num_seconds())
            .field("enforce_token_type", &self.enforce_token_type)
            .finish()
    }
}

impl JwtManager {
    /// Create a manager that reads the system clock
    pub fn new(config: JwtConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a manager with an explicit time source
    pub fn with_clock(config: JwtConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(TokenError::InvalidConfig(
                "signing secret must not be empty".to_string(),
            ));
        }
        if config.access_ttl.num_seconds() < 1 {
            return Err(TokenError::InvalidConfig(
                "access TTL must be at least one second".to_string(),
            ));
        }
        if config.refresh_ttl.num_seconds() < 1 {
            return Err(TokenError::InvalidConfig(
                "refresh TTL must be at least one second".to_string(),
            ));
        }

        if config.refresh_ttl < config.access_ttl {
            warn!(
                access_ttl_secs = config.access_ttl.num_seconds(),
                refresh_ttl_secs = config.refresh_ttl.num_seconds(),
                "Refresh TTL is shorter than access TTL"
            );
        }

        if let Some(weakness) = find_weakness(&config.secret) {
            warn!(reason = %weakness, "JWT signing secret is weak - use at least 32 random bytes");
        } else if validate_secret_strength(&config.secret) == SecretStrength::Acceptable {
            debug!("JWT signing secret strength acceptable");
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // Expiry is checked against the injected clock instead
        validation.validate_exp = false;
        validation.validate_aud = false;
        // A missing `exp` fails `Claims` deserialization
        validation.required_spec_claims.clear();

        info!(
            access_ttl_secs = config.access_ttl.num_seconds(),
            refresh_ttl_secs = config.refresh_ttl.num_seconds(),
            enforce_token_type = config.enforce_token_type,
            "JWT manager initialized with HS256"
        );

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            enforce_token_type: config.enforce_token_type,
            clock,
        })
    }

    /// Verify structure, algorithm, signature and expiry, returning every claim
    pub fn decode_claims(&self, token: &str) -> Result<Claims> {
        let alg = header_algorithm(token)?;
        match alg.parse::<Algorithm>() {
            Ok(parsed) if ACCEPTED_ALGORITHMS.contains(&parsed) => {}
            _ => return Err(TokenError::UnsupportedAlgorithm(alg)),
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailure(e.to_string()))
    }

    fn validate(&self, token: &str, expected: TokenType) -> Result<(i64, String)> {
        let result = self.decode_claims(token).and_then(|claims| {
            if self.enforce_token_type && claims.token_type != Some(expected) {
                return Err(TokenError::WrongTokenType {
                    expected,
                    actual: claims.token_type,
                });
            }
            Ok((claims.uid, claims.role))
        });

        if let Err(e) = &result {
            debug!(token_type = %expected, reason = e.kind(), "Token rejected");
        }

        result
    }
}

impl TokenManager for JwtManager {
    fn generate(&self, principal_id: i64, role: &str) -> Result<TokenPair> {
        // One instant for both tokens, truncated to JWT's second resolution
        let iat = self.clock.now().timestamp();
        let access_exp = expiry(iat, self.access_ttl)?;
        let refresh_exp = expiry(iat, self.refresh_ttl)?;

        let claims = |exp: i64, token_type: TokenType| Claims {
            uid: principal_id,
            role: role.to_string(),
            iat,
            exp,
            token_type: Some(token_type),
        };

        let access_token = self.sign(&claims(access_exp.timestamp(), TokenType::Access))?;
        let refresh_token = self.sign(&claims(refresh_exp.timestamp(), TokenType::Refresh))?;

        debug!(
            principal_id,
            access_expires = %access_exp,
            refresh_expires = %refresh_exp,
            "Issued token pair"
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires: access_exp,
            refresh_expires: refresh_exp,
        })
    }

    fn validate_access(&self, token: &str) -> Result<(i64, String)> {
        self.validate(token, TokenType::Access)
    }

    fn validate_refresh(&self, token: &str) -> Result<(i64, String)> {
        self.validate(token, TokenType::Refresh)
    }
}

fn expiry(iat: i64, ttl: Duration) -> Result<DateTime<Utc>> {
    iat.checked_add(ttl.num_seconds())
        .and_then(|exp| DateTime::from_timestamp(exp, 0))
        .ok_or_else(|| TokenError::SigningFailure("token expiry out of range".to_string()))
}

/// Read `alg` from the header without trusting anything else in the token
fn header_algorithm(token: &str) -> Result<String> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TokenError::MalformedToken(format!("header is not base64url: {e}")))?;
    let header: RawHeader = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::MalformedToken(format!("header is not valid JSON: {e}")))?;

    Ok(header.alg)
}
