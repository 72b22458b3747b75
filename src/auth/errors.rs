//! Authentication error types.

use thiserror::Error;

use crate::db::repository::StoreError;
use crate::errors::ErrorKind;
use crate::token::TokenError;

/// Authentication and user-workflow errors.
///
/// Credential failures are deliberately vague: user-not-found and
/// wrong-password share [`AuthError::InvalidCredentials`] so callers cannot
/// probe which emails exist.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials rejected; covers unknown email and wrong password alike.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but may not log in.
    #[error("User account is inactive")]
    AccountInactive,

    /// Too many failed attempts.
    #[error("User account is locked due to too many failed login attempts")]
    AccountLocked,

    /// A field failed validation.
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Password strength policy rejected the password.
    #[error("{0}")]
    WeakPassword(String),

    /// The caller may not perform this action.
    #[error("{0}")]
    Forbidden(&'static str),

    /// Target user does not exist (or is deleted).
    #[error("User not found")]
    UserNotFound,

    /// Email already registered among non-deleted users.
    #[error("User with this email already exists")]
    EmailTaken,

    /// Target tenant does not exist (or is deleted).
    #[error("Company not found")]
    TenantNotFound,

    /// Target tenant exists but is inactive.
    #[error("Company is not active")]
    TenantInactive,

    /// The role a user creation referenced does not exist.
    #[error("Role not found")]
    RoleNotFound,

    /// Bootstrap or reset secret mismatch.
    #[error("Invalid secret")]
    InvalidSecret,

    /// A super-admin already exists; bootstrap is single-use.
    #[error("A super admin account already exists")]
    SuperAdminExists,

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Token issuance or verification failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Coarse classification for the transport layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidSecret => ErrorKind::AuthFailed,
            AuthError::AccountInactive | AuthError::AccountLocked | AuthError::Forbidden(_) => {
                ErrorKind::Forbidden
            }
            AuthError::Validation { .. }
            | AuthError::WeakPassword(_)
            | AuthError::TenantInactive => ErrorKind::Validation,
            AuthError::UserNotFound | AuthError::TenantNotFound | AuthError::RoleNotFound => {
                ErrorKind::NotFound
            }
            AuthError::EmailTaken | AuthError::SuperAdminExists => ErrorKind::Conflict,
            AuthError::Token(err) => err.kind(),
            AuthError::Store(StoreError::Duplicate(_)) => ErrorKind::Conflict,
            AuthError::Hashing(_) | AuthError::Store(_) => ErrorKind::Fatal,
        }
    }

    /// Client-safe message; storage and crypto internals never leak.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Store(err) => err.client_message(),
            AuthError::Hashing(_) => "An internal error occurred".to_string(),
            AuthError::Token(err) => err.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
