//! Authentication module providing login, token refresh, and account provisioning.
//!
//! This module implements:
//! - bcrypt password hashing and a strength policy for new passwords
//! - Login with account-status gates and enumeration-safe failures
//! - Account lockout after repeated password failures
//! - Role- and tenant-scoped authorization rules
//! - Secret-gated super-admin bootstrap and password recovery
//! - A login audit trail whose failures never break the workflow
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tenant_auth::auth::{AuthManager, LoginRequest};
//! use tenant_auth::config::CoreConfig;
//! use tenant_auth::db::Database;
//! use tenant_auth::token::TokenService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CoreConfig::from_env()?;
//!     let db = Database::new(&config.database).await?;
//!     let store = Arc::new(db.store());
//!     let auth = AuthManager::new(
//!         store.clone(),
//!         store,
//!         TokenService::new(&config.tokens),
//!         config.auth.clone(),
//!     );
//!
//!     let result = auth
//!         .login(LoginRequest {
//!             email: "admin@acme.com".to_string(),
//!             password: "Valid123!".to_string(),
//!             ip_address: None,
//!             user_agent: None,
//!         })
//!         .await?;
//!     println!("Logged in: {}", result.user.email);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod lockout;
pub mod manager;
pub mod models;
pub mod password;
pub mod policy;

pub use errors::{AuthError, AuthResult};
pub use lockout::{LockoutPolicy, LockoutState};
pub use manager::AuthManager;
pub use models::{
    AuthenticatedUser, BootstrapRequest, CreateUserRequest, CreatedUser, LoginAttempt,
    LoginRequest, NewLoginAttempt, NewUser, ResetSuperAdminPasswordRequest, Role, RoleId,
    SetPasswordRequest, User, UserId, UserProfile,
};
