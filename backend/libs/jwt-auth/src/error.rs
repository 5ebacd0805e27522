//! Error types for token issuance and validation

use thiserror::Error;

use crate::TokenType;

/// Result type alias for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;

/// Errors returned by the token manager.
///
/// Every validation-time variant maps to the same caller-facing outcome
/// (unauthorized); see [`TokenError::is_unauthorized`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Claims could not be encoded or signed
    #[error("Failed to sign token: {0}")]
    SigningFailure(String),

    /// Input is not a decodable three-segment signed token
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Header declares an algorithm outside the HMAC family
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    /// Access token presented where a refresh token is expected, or vice versa
    #[error(
        "Wrong token type: expected {expected}, got {}",
        .actual.map_or("none", TokenType::as_str)
    )]
    WrongTokenType {
        expected: TokenType,
        actual: Option<TokenType>,
    },

    /// Construction contract violated (empty secret, non-positive TTL)
    #[error("Invalid token manager configuration: {0}")]
    InvalidConfig(String),
}

impl TokenError {
    /// True for every failure a presented token can cause.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(
            self,
            TokenError::SigningFailure(_) | TokenError::InvalidConfig(_)
        )
    }

    /// Short, stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::SigningFailure(_) => "signing_failure",
            TokenError::MalformedToken(_) => "malformed_token",
            TokenError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
            TokenError::WrongTokenType { .. } => "wrong_token_type",
            TokenError::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::UnsupportedAlgorithm(err.to_string()),
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => Self::MalformedToken(err.to_string()),
            _ => Self::MalformedToken(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::{Error, ErrorKind};

    #[test]
    fn test_jsonwebtoken_error_mapping() {
        assert_eq!(
            TokenError::from(Error::from(ErrorKind::InvalidSignature)),
            TokenError::InvalidSignature
        );
        assert_eq!(
            TokenError::from(Error::from(ErrorKind::ExpiredSignature)),
            TokenError::Expired
        );
        assert!(matches!(
            TokenError::from(Error::from(ErrorKind::InvalidAlgorithm)),
            TokenError::UnsupportedAlgorithm(_)
        ));
        assert!(matches!(
            TokenError::from(Error::from(ErrorKind::InvalidToken)),
            TokenError::MalformedToken(_)
        ));
    }

    #[test]
    fn test_unauthorized_classification() {
        assert!(TokenError::Expired.is_unauthorized());
        assert!(TokenError::InvalidSignature.is_unauthorized());
        assert!(TokenError::MalformedToken("x".into()).is_unauthorized());
        assert!(!TokenError::SigningFailure("x".into()).is_unauthorized());
        assert!(!TokenError::InvalidConfig("x".into()).is_unauthorized());
    }

    #[test]
    fn test_wrong_token_type_message() {
        let err = TokenError::WrongTokenType {
            expected: TokenType::Access,
            actual: Some(TokenType::Refresh),
        };
        assert_eq!(err.to_string(), "Wrong token type: expected access, got refresh");

        let err = TokenError::WrongTokenType {
            expected: TokenType::Refresh,
            actual: None,
        };
        assert_eq!(err.to_string(), "Wrong token type: expected refresh, got none");
    }
}
