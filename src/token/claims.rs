//! Claim payloads and the issued token pair.

use serde::{Deserialize, Serialize};

use crate::auth::models::UserId;
use crate::tenant::models::TenantId;

/// Wire payload of an access token.
///
/// `sub` duplicates the email for JWT-standard consumers; `jti` keeps two
/// tokens issued for identical payloads structurally distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub user_id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    pub roles: Vec<String>,
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Wire payload of a refresh token. Carries identity only, with no roles
/// and no tenant. Authority is re-derived from storage on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub user_id: UserId,
    pub email: String,
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verified identity and authorization payload, as threaded through every
/// workflow. Produced only by [`crate::token::TokenService::verify_access`]
/// or by the trusted caller that already verified a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub email: String,
    pub tenant_id: Option<TenantId>,
    pub roles: Vec<String>,
}

impl From<AccessClaims> for Claims {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            tenant_id: claims.tenant_id,
            roles: claims.roles,
        }
    }
}

/// Identity recovered from a verified refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshIdentity {
    pub user_id: UserId,
    pub email: String,
}

/// An issued access/refresh token pair.
///
/// `expires_in` is the access-token TTL in seconds; the refresh token lives
/// longer. Serializes to the response body the transport relays unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}
