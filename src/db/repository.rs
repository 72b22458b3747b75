//! Persistence collaborator contract.
//!
//! The core never issues queries; it calls the named operations below. Every
//! lookup is scoped to non-deleted rows. Combined inserts (`user+role`,
//! `tenant+ledger`) are atomic: the implementation runs them in a single
//! transaction and either both rows exist afterwards or neither does.
//!
//! Two implementations ship with the crate: [`crate::db::PgStore`] backed by
//! PostgreSQL and [`crate::db::MemoryStore`] for tests and local development.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::lockout::LockoutState;
use crate::auth::models::{NewLoginAttempt, NewUser, Role, RoleId, User, UserId};
use crate::tenant::models::{Ledger, NewTenant, Tenant, TenantId};

/// Storage failure surfaced by a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Operation exceeded its deadline
    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),

    /// A unique constraint rejected the write. Carries the logical field
    /// ("email", "code") so callers can map it to the matching conflict.
    #[error("Duplicate value for {0}")]
    Duplicate(&'static str),
}

impl StoreError {
    /// Client-safe message; never exposes SQL or connection detail.
    pub fn client_message(&self) -> String {
        match self {
            StoreError::Duplicate(what) => format!("Duplicate value for {what}"),
            _ => "An internal error occurred".to_string(),
        }
    }
}

impl From<super::timeouts::TimeoutError> for StoreError {
    fn from(err: super::timeouts::TimeoutError) -> Self {
        match err {
            super::timeouts::TimeoutError::Timeout(d) => StoreError::Timeout(d),
            super::timeouts::TimeoutError::Database(e) => StoreError::Database(e),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// User, role, and audit persistence operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a non-deleted user by normalized email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Find a non-deleted user by id.
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Insert a user and their role assignment in one transaction.
    async fn insert_with_role(&self, user: NewUser, role_id: RoleId) -> StoreResult<User>;

    /// Names of the roles a user holds.
    async fn roles_for_user(&self, id: UserId) -> StoreResult<Vec<String>>;

    /// Find a role by exact name.
    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>>;

    /// Create a role.
    async fn create_role(&self, name: &str) -> StoreResult<Role>;

    /// Whether any non-deleted user holds the super-admin role.
    async fn super_admin_exists(&self) -> StoreResult<bool>;

    /// Persist a lockout transition verbatim.
    async fn save_lockout(&self, id: UserId, state: &LockoutState) -> StoreResult<()>;

    /// Store a new password hash and clear the lockout state in the same
    /// update (administrative override).
    async fn set_password_and_unlock(&self, id: UserId, hash: &[u8]) -> StoreResult<()>;

    /// Stamp the successful-login timestamp.
    async fn touch_last_login(&self, id: UserId) -> StoreResult<()>;

    /// Append a login attempt to the audit log.
    async fn record_login_attempt(&self, attempt: NewLoginAttempt) -> StoreResult<()>;
}

/// Tenant and ledger persistence operations.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Find a non-deleted tenant by id.
    async fn find_by_id(&self, id: TenantId) -> StoreResult<Option<Tenant>>;

    /// Find a non-deleted tenant by code.
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Tenant>>;

    /// Find a non-deleted tenant by contact email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Tenant>>;

    /// Insert a tenant and its ledger in one transaction.
    async fn insert_with_ledger(&self, tenant: NewTenant) -> StoreResult<(Tenant, Ledger)>;

    /// Non-deleted tenants, newest first; inactive ones only when asked.
    async fn list(&self, include_inactive: bool) -> StoreResult<Vec<Tenant>>;
}
