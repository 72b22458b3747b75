//! # Tenant Auth
//!
//! A multi-tenant identity and access core: it authenticates users, issues
//! and refreshes signed session tokens, enforces role- and tenant-scoped
//! authorization, and manages the password lifecycle including lockout
//! after repeated failures.
//!
//! ## Architecture
//!
//! Every inbound command arrives as a typed request and leaves as a typed
//! result or a typed failure with a coarse [`ErrorKind`] the transport
//! layer maps to a status code. The managers hold no per-request state;
//! tokens are stateless, so there is no session table. Storage is reached
//! only through the [`db::UserStore`] and [`db::TenantStore`] traits,
//! backed by PostgreSQL in production and an in-memory store in tests.
//!
//! Workflows:
//!
//! - **Login**: status gates before password verification, lockout on
//!   repeated failures, enumeration-safe error messages, audit trail
//! - **Refresh**: re-derives the user and role set from storage; a
//!   deactivated or locked account is rejected even with a valid token
//! - **CreateUser / SetPassword**: role- and tenant-scoped authorization,
//!   default-password provisioning, strength policy
//! - **Bootstrap / Reset**: secret-gated super-admin escape hatches
//! - **CreateTenant**: atomic tenant-plus-ledger provisioning
//!
//! ## Core Modules
//!
//! - [`auth`]: login, refresh, provisioning, lockout, authorization rules
//! - [`token`]: stateless signed access/refresh token pairs
//! - [`tenant`]: tenant provisioning and lookups
//! - [`db`]: storage traits with PostgreSQL and in-memory implementations
//! - [`config`]: environment-driven configuration with validation
//!
//! ## Example
//!
//! ```
//! use tenant_auth::auth::password;
//!
//! assert!(password::validate_strength("Valid123!").is_ok());
//! let hash = password::hash("Valid123!").unwrap();
//! assert!(password::verify("Valid123!", &hash));
//! ```

/// Coarse failure classification shared by every workflow.
pub mod errors;
pub use errors::ErrorKind;

/// Field validation helpers.
pub mod validate;

/// Environment-driven configuration with validation.
pub mod config;
pub use config::{AuthSettings, ConfigError, CoreConfig, TokenConfig};

/// Authentication, lockout, and account provisioning.
pub mod auth;
pub use auth::{AuthError, AuthManager, AuthResult};

/// Stateless signed session tokens.
pub mod token;
pub use token::{Claims, TokenPair, TokenService};

/// Tenant provisioning and lookups.
pub mod tenant;
pub use tenant::{TenantError, TenantManager, TenantResult};

/// Storage traits and their PostgreSQL and in-memory implementations.
pub mod db;
pub use db::{Database, DatabaseConfig, MemoryStore, PgStore, TenantStore, UserStore};
