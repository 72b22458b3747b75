//! Token error types.

use thiserror::Error;

use crate::errors::ErrorKind;

/// Errors raised by the token service.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Verification failed. All causes (bad signature, wrong secret,
    /// expiry, issuer/audience mismatch, garbage input) collapse into this
    /// one variant so callers cannot leak why a token was rejected.
    #[error("Invalid or expired token")]
    Invalid,

    /// Signing a new token failed.
    #[error("Token encoding failed: {0}")]
    Encoding(jsonwebtoken::errors::Error),
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Invalid => ErrorKind::AuthFailed,
            TokenError::Encoding(_) => ErrorKind::Fatal,
        }
    }

    /// Message safe to show to a client.
    pub fn client_message(&self) -> String {
        match self {
            TokenError::Invalid => self.to_string(),
            TokenError::Encoding(_) => "An internal error occurred".to_string(),
        }
    }
}
