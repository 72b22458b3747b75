//! Tenant module providing company provisioning and lookups.
//!
//! This module implements:
//! - Tenant creation restricted to super administrators
//! - Atomic tenant-plus-ledger provisioning (no tenant without a ledger)
//! - Code and contact-email uniqueness among non-deleted tenants
//! - Read-only projections: by id, by code, activity flag, newest-first listing
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tenant_auth::config::CoreConfig;
//! use tenant_auth::db::Database;
//! use tenant_auth::tenant::{CreateTenantRequest, TenantManager};
//! use tenant_auth::token::Claims;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CoreConfig::from_env()?;
//!     let db = Database::new(&config.database).await?;
//!     let manager = TenantManager::new(Arc::new(db.store()));
//!
//!     let claims = Claims {
//!         user_id: 1,
//!         email: "root@example.com".to_string(),
//!         tenant_id: None,
//!         roles: vec!["SUPER_ADMIN".to_string()],
//!     };
//!     let created = manager
//!         .create(
//!             &claims,
//!             CreateTenantRequest {
//!                 code: "ACME".to_string(),
//!                 name: "Acme Inc".to_string(),
//!                 email: "billing@acme.com".to_string(),
//!                 phone: None,
//!                 country: None,
//!                 address: None,
//!                 default_currency: None,
//!                 minimum_balance: None,
//!             },
//!         )
//!         .await?;
//!     println!("Created tenant {} with ledger {}", created.tenant.code, created.ledger.id);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{TenantError, TenantResult};
pub use manager::{TenantManager, DEFAULT_CURRENCY};
pub use models::{
    CreateTenantRequest, Ledger, LedgerId, NewTenant, Tenant, TenantId, TenantWithLedger,
};
