//! User, role, and authentication workflow types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tenant::models::TenantId;
use crate::token::TokenPair;

/// User ID type
pub type UserId = i64;

/// Role ID type
pub type RoleId = i64;

/// A user record as stored.
///
/// The secret material never serializes; hand [`UserProfile`] to anything
/// that leaves the process. `tenant_id` is `None` only for global
/// super-admins. A set `deleted_at` removes the row from every lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub tenant_id: Option<TenantId>,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Vec<u8>,
    /// Legacy column; bcrypt blobs embed their salt so this stays unused.
    #[serde(skip_serializing, default)]
    pub password_salt: Option<Vec<u8>>,
    pub is_active: bool,
    pub is_locked: bool,
    pub failed_login_attempts: i32,
    pub last_failed_login_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A flat role. Users hold zero or more through an assignment relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// The user snapshot workflows return: identity and state, no secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub tenant_id: Option<TenantId>,
    pub email: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Row to insert for a new user; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: Option<TenantId>,
    pub email: String,
    pub display_name: String,
    pub password_hash: Vec<u8>,
    pub is_active: bool,
}

/// Login command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Create-user command. `role_id = None` assigns the default
/// `COMPANY_ADMIN` role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub tenant_id: TenantId,
    pub role_id: Option<RoleId>,
}

/// Set-password command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPasswordRequest {
    pub user_id: UserId,
    pub new_password: String,
}

/// Bootstrap command. Optional fields fall back to configured defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapRequest {
    pub secret: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

/// Recovery command for a locked-out super-admin, gated by its own secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetSuperAdminPasswordRequest {
    pub secret: String,
    pub email: String,
    pub new_password: String,
}

/// Successful login result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// Create-user result. `default_password` is the plaintext the account was
/// created with, returned exactly once; it is not re-derivable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUser {
    pub user: UserProfile,
    pub tokens: TokenPair,
    pub default_password: String,
}

/// Audit record of a login attempt, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAttempt {
    pub id: i64,
    pub email: String,
    pub user_id: Option<UserId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Login attempt to append; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewLoginAttempt {
    pub email: String,
    pub user_id: Option<UserId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub failure_reason: Option<String>,
}
