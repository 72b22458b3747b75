//! Stateless token issuance and verification.
//!
//! Access and refresh tokens are HMAC-SHA256 JWTs signed with two
//! independent secrets, so leaking one cannot mint the other kind. Nothing
//! is persisted: verification is pure computation and revocation is only
//! possible by rotating a secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::claims::{AccessClaims, Claims, RefreshClaims, RefreshIdentity, TokenPair};
use super::errors::{TokenError, TokenResult};
use crate::auth::models::UserId;
use crate::config::TokenConfig;
use crate::tenant::models::TenantId;

/// `iss` claim stamped into every token.
pub const TOKEN_ISSUER: &str = "tenant_auth";

/// `aud` claim stamped into every token.
pub const TOKEN_AUDIENCE: &str = "tenant_auth_clients";

/// Issues and verifies session token pairs.
#[derive(Clone)]
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
        }
    }

    /// Issue a fresh access/refresh pair for the given identity.
    ///
    /// The access token carries the full claims (one role entry per held
    /// role); the refresh token carries identity only.
    pub fn issue_pair(
        &self,
        user_id: UserId,
        email: &str,
        tenant_id: Option<TenantId>,
        roles: Vec<String>,
    ) -> TokenResult<TokenPair> {
        let now = Utc::now();
        let iat = now.timestamp();

        let access_claims = AccessClaims {
            sub: email.to_string(),
            user_id,
            email: email.to_string(),
            tenant_id,
            roles,
            jti: Uuid::new_v4().to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            iat,
            exp: (now + self.access_ttl).timestamp(),
        };
        let refresh_claims = RefreshClaims {
            sub: email.to_string(),
            user_id,
            email: email.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            iat,
            exp: (now + self.refresh_ttl).timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.access_secret.as_bytes()),
        )
        .map_err(TokenError::Encoding)?;
        let refresh_token = encode(
            &Header::default(),
            &refresh_claims,
            &EncodingKey::from_secret(self.refresh_secret.as_bytes()),
        )
        .map_err(TokenError::Encoding)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.num_seconds(),
            token_type: "Bearer".to_string(),
        })
    }

    /// Verify an access token and return its claims.
    ///
    /// Checks signature, issuer, audience, and expiry with zero clock-skew
    /// tolerance. Fails closed: every rejection is [`TokenError::Invalid`].
    pub fn verify_access(&self, token: &str) -> TokenResult<Claims> {
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.access_secret.as_bytes()),
            &Self::validation(),
        )
        .map_err(|_| TokenError::Invalid)?;
        Ok(Claims::from(data.claims))
    }

    /// Verify a refresh token and return the embedded identity.
    ///
    /// Same discipline as [`Self::verify_access`], against the refresh
    /// secret. Roles are never read from a refresh token; the caller must
    /// re-derive authority from storage.
    pub fn verify_refresh(&self, token: &str) -> TokenResult<RefreshIdentity> {
        let data = decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.as_bytes()),
            &Self::validation(),
        )
        .map_err(|_| TokenError::Invalid)?;
        Ok(RefreshIdentity {
            user_id: data.claims.user_id,
            email: data.claims.email,
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.leeway = 0;
        validation
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The header must be exactly two space-separated parts with the first
/// literally `Bearer`; anything else is `None`.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() == 2 && parts[0] == "Bearer" {
        Some(parts[1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TokenConfig {
        TokenConfig {
            access_secret: "access-secret-0123456789abcdef-0123".to_string(),
            refresh_secret: "refresh-secret-0123456789abcdef-012".to_string(),
            access_ttl_minutes: 60,
            refresh_ttl_days: 7,
        }
    }

    fn service() -> TokenService {
        TokenService::new(&test_config())
    }

    #[test]
    fn round_trips_claims_exactly() {
        let svc = service();
        let roles = vec!["COMPANY_ADMIN".to_string(), "AUDITOR".to_string()];
        let pair = svc
            .issue_pair(42, "admin@acme.test", Some(7), roles.clone())
            .unwrap();

        let claims = svc.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "admin@acme.test");
        assert_eq!(claims.tenant_id, Some(7));
        assert_eq!(claims.roles, roles);

        let identity = svc.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.email, "admin@acme.test");
    }

    #[test]
    fn super_admin_tokens_have_no_tenant() {
        let svc = service();
        let pair = svc
            .issue_pair(1, "root@example.test", None, vec!["SUPER_ADMIN".to_string()])
            .unwrap();
        let claims = svc.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.tenant_id, None);
    }

    #[test]
    fn identical_payloads_produce_distinct_tokens() {
        let svc = service();
        let a = svc.issue_pair(1, "a@b.test", None, vec![]).unwrap();
        let b = svc.issue_pair(1, "a@b.test", None, vec![]).unwrap();
        // jti differs even when identity and iat coincide.
        assert_ne!(a.access_token, b.access_token);
        assert_ne!(a.refresh_token, b.refresh_token);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let svc = service();
        let other = TokenService::new(&TokenConfig {
            access_secret: "another-access-secret-abcdef-01234567".to_string(),
            refresh_secret: "another-refresh-secret-abcdef-0123456".to_string(),
            ..test_config()
        });
        let pair = svc.issue_pair(1, "a@b.test", None, vec![]).unwrap();
        assert!(matches!(
            other.verify_access(&pair.access_token),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            other.verify_refresh(&pair.refresh_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn access_and_refresh_never_cross_verify() {
        let svc = service();
        let pair = svc.issue_pair(1, "a@b.test", Some(2), vec![]).unwrap();
        assert!(matches!(
            svc.verify_refresh(&pair.access_token),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            svc.verify_access(&pair.refresh_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let svc = service();
        let pair = svc.issue_pair(1, "a@b.test", None, vec![]).unwrap();
        let mut tampered = pair.access_token.clone();
        tampered.pop();
        tampered.push('A');
        assert!(matches!(svc.verify_access(&tampered), Err(TokenError::Invalid)));
        assert!(matches!(svc.verify_access("not-a-jwt"), Err(TokenError::Invalid)));
        assert!(matches!(svc.verify_access(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn expiry_has_zero_leeway() {
        let svc = service();
        let now = Utc::now();
        // One second past expiry; a default-leeway verifier would admit it.
        let claims = AccessClaims {
            sub: "a@b.test".to_string(),
            user_id: 1,
            email: "a@b.test".to_string(),
            tenant_id: None,
            roles: vec![],
            jti: "test-jti".to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            iat: now.timestamp() - 3600,
            exp: now.timestamp() - 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(test_config().access_secret.as_bytes()),
        )
        .unwrap();
        assert!(matches!(svc.verify_access(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn wrong_issuer_or_audience_is_invalid() {
        let svc = service();
        let now = Utc::now();
        let make = |iss: &str, aud: &str| {
            let claims = AccessClaims {
                sub: "a@b.test".to_string(),
                user_id: 1,
                email: "a@b.test".to_string(),
                tenant_id: None,
                roles: vec![],
                jti: "test-jti".to_string(),
                iss: iss.to_string(),
                aud: aud.to_string(),
                iat: now.timestamp(),
                exp: now.timestamp() + 60,
            };
            encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(test_config().access_secret.as_bytes()),
            )
            .unwrap()
        };
        let bad_iss = make("someone-else", TOKEN_AUDIENCE);
        let bad_aud = make(TOKEN_ISSUER, "someone-else");
        assert!(matches!(svc.verify_access(&bad_iss), Err(TokenError::Invalid)));
        assert!(matches!(svc.verify_access(&bad_aud), Err(TokenError::Invalid)));
    }

    #[test]
    fn bearer_extraction_is_strict() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("bearer abc"), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Bearer a b"), None);
        assert_eq!(extract_bearer_token("Bearer  abc"), None);
        assert_eq!(extract_bearer_token("Token abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn pair_serializes_to_the_transport_shape() {
        let svc = service();
        let pair = svc.issue_pair(1, "a@b.test", None, vec![]).unwrap();
        let value = serde_json::to_value(&pair).unwrap();
        assert!(value.get("access_token").is_some());
        assert!(value.get("refresh_token").is_some());
        assert_eq!(value["expires_in"], 3600);
        assert_eq!(value["token_type"], "Bearer");
    }
}
