//! Session token module: stateless signed access/refresh pairs.
//!
//! This module implements:
//! - HMAC-SHA256 token pairs signed with two independent secrets
//! - Full identity+role claims in access tokens, identity-only refresh tokens
//! - Zero clock-skew verification that fails closed
//! - Strict `Authorization: Bearer` header extraction
//!
//! ## Example
//!
//! ```
//! use tenant_auth::config::TokenConfig;
//! use tenant_auth::token::TokenService;
//!
//! let service = TokenService::new(&TokenConfig {
//!     access_secret: "an-access-secret-of-at-least-32-chars".to_string(),
//!     refresh_secret: "a-refresh-secret-of-at-least-32-chars".to_string(),
//!     access_ttl_minutes: 60,
//!     refresh_ttl_days: 7,
//! });
//!
//! let pair = service
//!     .issue_pair(42, "admin@acme.test", Some(7), vec!["COMPANY_ADMIN".into()])
//!     .unwrap();
//! let claims = service.verify_access(&pair.access_token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```

pub mod claims;
pub mod errors;
pub mod service;

pub use claims::{AccessClaims, Claims, RefreshClaims, RefreshIdentity, TokenPair};
pub use errors::{TokenError, TokenResult};
pub use service::{TOKEN_AUDIENCE, TOKEN_ISSUER, TokenService, extract_bearer_token};
