//! Tenant error types.

use thiserror::Error;

use crate::db::repository::StoreError;
use crate::errors::ErrorKind;

/// Tenant workflow errors.
#[derive(Debug, Error)]
pub enum TenantError {
    /// A field failed validation.
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Only super-admins may create tenants.
    #[error("Only super administrators can create companies")]
    NotAuthorized,

    /// Tenant code already used by a non-deleted tenant.
    #[error("Company with this code already exists")]
    DuplicateCode,

    /// Contact email already used by a non-deleted tenant.
    #[error("Company with this email already exists")]
    DuplicateEmail,

    /// No such tenant (or soft-deleted).
    #[error("Company not found")]
    NotFound,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TenantError {
    /// Coarse classification for the transport layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TenantError::Validation { .. } => ErrorKind::Validation,
            TenantError::NotAuthorized => ErrorKind::Forbidden,
            TenantError::DuplicateCode | TenantError::DuplicateEmail => ErrorKind::Conflict,
            TenantError::NotFound => ErrorKind::NotFound,
            TenantError::Store(StoreError::Duplicate(_)) => ErrorKind::Conflict,
            TenantError::Store(_) => ErrorKind::Fatal,
        }
    }

    /// Client-safe message; storage internals never leak.
    pub fn client_message(&self) -> String {
        match self {
            TenantError::Store(err) => err.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tenant operations.
pub type TenantResult<T> = Result<T, TenantError>;
