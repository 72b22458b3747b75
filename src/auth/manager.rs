//! Authentication manager implementation.
//!
//! Coordinates the login, refresh, and account-provisioning workflows:
//! credential verification, lockout bookkeeping, audit logging, token
//! issuance, and the secret-gated super-admin escape hatches. All storage
//! access goes through the [`UserStore`] and [`TenantStore`] traits.

use std::sync::Arc;

use chrono::Utc;
use subtle::ConstantTimeEq;

use super::errors::{AuthError, AuthResult};
use super::lockout::LockoutPolicy;
use super::models::{
    AuthenticatedUser, BootstrapRequest, CreateUserRequest, CreatedUser, LoginRequest,
    NewLoginAttempt, NewUser, ResetSuperAdminPasswordRequest, SetPasswordRequest, UserId,
    UserProfile,
};
use super::{password, policy};
use crate::config::AuthSettings;
use crate::db::repository::{TenantStore, UserStore};
use crate::token::{Claims, TokenPair, TokenService};
use crate::validate;

// Failure reasons recorded in the login audit log.
const REASON_USER_NOT_FOUND: &str = "user not found";
const REASON_ACCOUNT_INACTIVE: &str = "account inactive";
const REASON_ACCOUNT_LOCKED: &str = "account locked";
const REASON_INVALID_PASSWORD: &str = "invalid password";

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserStore>,
    tenants: Arc<dyn TenantStore>,
    tokens: TokenService,
    lockout: LockoutPolicy,
    settings: AuthSettings,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `users` - User storage
    /// * `tenants` - Tenant storage
    /// * `tokens` - Token signing service
    /// * `settings` - Provisioning secrets and defaults
    pub fn new(
        users: Arc<dyn UserStore>,
        tenants: Arc<dyn TenantStore>,
        tokens: TokenService,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            tenants,
            tokens,
            lockout: LockoutPolicy::default(),
            settings,
        }
    }

    /// Override the lockout policy (default locks after 4 failures).
    pub fn with_lockout_policy(mut self, lockout: LockoutPolicy) -> Self {
        self.lockout = lockout;
        self
    }

    /// Authenticate a user and issue a token pair
    ///
    /// Account status is checked before the password so a locked or
    /// inactive account never reaches password verification.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password
    /// * `AuthError::AccountInactive` - Account is deactivated
    /// * `AuthError::AccountLocked` - Too many failed attempts
    pub async fn login(&self, request: LoginRequest) -> AuthResult<AuthenticatedUser> {
        let email = validate::normalize_email(&request.email);

        // Unknown email and wrong password must be indistinguishable
        let Some(user) = self.users.find_by_email(&email).await? else {
            self.record_attempt(&email, None, &request, false, Some(REASON_USER_NOT_FOUND))
                .await;
            return Err(AuthError::InvalidCredentials);
        };

        if !user.is_active {
            self.record_attempt(
                &email,
                Some(user.id),
                &request,
                false,
                Some(REASON_ACCOUNT_INACTIVE),
            )
            .await;
            return Err(AuthError::AccountInactive);
        }

        if user.is_locked {
            self.record_attempt(
                &email,
                Some(user.id),
                &request,
                false,
                Some(REASON_ACCOUNT_LOCKED),
            )
            .await;
            return Err(AuthError::AccountLocked);
        }

        if !password::verify(&request.password, &user.password_hash) {
            let next = self.lockout.on_failure(user.failed_login_attempts, Utc::now());
            if next.is_locked {
                log::warn!(
                    "Account {} locked after {} failed login attempts",
                    user.id,
                    next.failed_attempts
                );
            }
            self.users.save_lockout(user.id, &next).await?;
            self.record_attempt(
                &email,
                Some(user.id),
                &request,
                false,
                Some(REASON_INVALID_PASSWORD),
            )
            .await;
            return Err(AuthError::InvalidCredentials);
        }

        // Success clears any accumulated failures and stamps the login
        if user.failed_login_attempts > 0 {
            self.users
                .save_lockout(user.id, &self.lockout.on_success())
                .await?;
        }
        self.users.touch_last_login(user.id).await?;
        self.record_attempt(&email, Some(user.id), &request, true, None)
            .await;

        let roles = self.users.roles_for_user(user.id).await?;
        let tokens = self
            .tokens
            .issue_pair(user.id, &user.email, user.tenant_id, roles)?;

        Ok(AuthenticatedUser {
            user: UserProfile::from(&user),
            tokens,
        })
    }

    /// Exchange a refresh token for a fresh token pair
    ///
    /// The user and role set are re-loaded from storage; claims inside the
    /// old token are never trusted. A deactivated or locked account is
    /// rejected even while its refresh token is cryptographically valid.
    ///
    /// # Errors
    ///
    /// * `AuthError::Token` - Refresh token invalid or expired
    /// * `AuthError::InvalidCredentials` - User no longer exists
    /// * `AuthError::AccountInactive` / `AuthError::AccountLocked`
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let identity = self.tokens.verify_refresh(refresh_token)?;

        let user = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }
        if user.is_locked {
            return Err(AuthError::AccountLocked);
        }

        let roles = self.users.roles_for_user(user.id).await?;
        Ok(self
            .tokens
            .issue_pair(user.id, &user.email, user.tenant_id, roles)?)
    }

    /// Verify an access token and return its claims
    ///
    /// # Errors
    ///
    /// * `AuthError::Token` - Signature, issuer, audience, or expiry check failed
    pub fn verify_access_token(&self, token: &str) -> AuthResult<Claims> {
        Ok(self.tokens.verify_access(token)?)
    }

    /// Create a user under a tenant with the configured default password
    ///
    /// The plaintext default password is returned exactly once in the
    /// result; it is never re-derivable afterwards.
    ///
    /// # Errors
    ///
    /// * `AuthError::Forbidden` - Caller may not create users for this tenant
    /// * `AuthError::TenantNotFound` / `AuthError::TenantInactive`
    /// * `AuthError::EmailTaken` - Email already registered
    /// * `AuthError::RoleNotFound` - Default role row is missing
    pub async fn create_user(
        &self,
        claims: &Claims,
        request: CreateUserRequest,
    ) -> AuthResult<CreatedUser> {
        if !policy::can_create_user(claims, request.tenant_id) {
            return Err(AuthError::Forbidden(
                "Not allowed to create users for this company",
            ));
        }

        let email = validate::normalize_email(&request.email);
        validate::check_email(&email).map_err(|message| AuthError::Validation {
            field: "email",
            message,
        })?;
        validate::check_length("displayName", &request.display_name, 2, 128).map_err(
            |message| AuthError::Validation {
                field: "displayName",
                message,
            },
        )?;

        let tenant = self
            .tenants
            .find_by_id(request.tenant_id)
            .await?
            .ok_or(AuthError::TenantNotFound)?;
        if !tenant.is_active {
            return Err(AuthError::TenantInactive);
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let role_id = match request.role_id {
            Some(role_id) => role_id,
            None => {
                self.users
                    .find_role_by_name(policy::COMPANY_ADMIN)
                    .await?
                    .ok_or(AuthError::RoleNotFound)?
                    .id
            }
        };

        let hash = password::hash(&self.settings.default_password)?;
        let user = self
            .users
            .insert_with_role(
                NewUser {
                    tenant_id: Some(request.tenant_id),
                    email,
                    display_name: request.display_name,
                    password_hash: hash,
                    is_active: true,
                },
                role_id,
            )
            .await?;
        log::info!("Created user {} for tenant {}", user.id, request.tenant_id);

        let roles = self.users.roles_for_user(user.id).await?;
        let tokens = self
            .tokens
            .issue_pair(user.id, &user.email, user.tenant_id, roles)?;

        Ok(CreatedUser {
            user: UserProfile::from(&user),
            tokens,
            default_password: self.settings.default_password.clone(),
        })
    }

    /// Set a user's password and clear any lockout
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - Target does not exist
    /// * `AuthError::Forbidden` - Caller may not change this password
    /// * `AuthError::AccountInactive` - Target is deactivated
    /// * `AuthError::WeakPassword` - Strength policy rejected the password
    pub async fn set_password(
        &self,
        claims: &Claims,
        request: SetPasswordRequest,
    ) -> AuthResult<()> {
        let target = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !policy::can_set_password(claims, &target) {
            return Err(AuthError::Forbidden(
                "Not allowed to change this user's password",
            ));
        }
        if !target.is_active {
            return Err(AuthError::AccountInactive);
        }

        password::validate_strength(&request.new_password).map_err(AuthError::WeakPassword)?;

        let hash = password::hash(&request.new_password)?;
        self.users.set_password_and_unlock(target.id, &hash).await?;
        log::info!("Password updated for user {}", target.id);
        Ok(())
    }

    /// Create the first super-admin account, gated by a shared secret
    ///
    /// Single use per deployment: once any super admin exists the call
    /// fails with a conflict. Missing request fields fall back to the
    /// configured bootstrap defaults.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidSecret` - Secret mismatch
    /// * `AuthError::SuperAdminExists` - A super admin already exists
    /// * `AuthError::EmailTaken` - Email already registered
    pub async fn bootstrap_super_admin(
        &self,
        request: BootstrapRequest,
    ) -> AuthResult<AuthenticatedUser> {
        if !constant_time_eq(&request.secret, &self.settings.bootstrap_secret) {
            return Err(AuthError::InvalidSecret);
        }

        if self.users.super_admin_exists().await? {
            return Err(AuthError::SuperAdminExists);
        }

        let email = validate::normalize_email(
            request
                .email
                .as_deref()
                .unwrap_or(&self.settings.bootstrap_admin_email),
        );
        validate::check_email(&email).map_err(|message| AuthError::Validation {
            field: "email",
            message,
        })?;
        let display_name = request
            .display_name
            .unwrap_or_else(|| self.settings.bootstrap_admin_name.clone());
        let password = request
            .password
            .unwrap_or_else(|| self.settings.default_password.clone());
        password::validate_strength(&password).map_err(AuthError::WeakPassword)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        // The role row may not exist yet on a fresh database
        let role = match self.users.find_role_by_name(policy::SUPER_ADMIN).await? {
            Some(role) => role,
            None => self.users.create_role(policy::SUPER_ADMIN).await?,
        };

        let hash = password::hash(&password)?;
        let user = self
            .users
            .insert_with_role(
                NewUser {
                    tenant_id: None,
                    email,
                    display_name,
                    password_hash: hash,
                    is_active: true,
                },
                role.id,
            )
            .await?;
        log::info!("Bootstrapped super admin account {}", user.id);

        let roles = self.users.roles_for_user(user.id).await?;
        let tokens = self.tokens.issue_pair(user.id, &user.email, None, roles)?;

        Ok(AuthenticatedUser {
            user: UserProfile::from(&user),
            tokens,
        })
    }

    /// Reset a super admin's password, gated by a shared secret
    ///
    /// Recovery path for a locked-out super admin; clears any lockout on
    /// the account.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidSecret` - Secret mismatch
    /// * `AuthError::UserNotFound` - No such account
    /// * `AuthError::Forbidden` - Account does not hold the super-admin role
    /// * `AuthError::WeakPassword` - Strength policy rejected the password
    pub async fn reset_super_admin_password(
        &self,
        request: ResetSuperAdminPasswordRequest,
    ) -> AuthResult<()> {
        if !constant_time_eq(&request.secret, &self.settings.reset_secret) {
            return Err(AuthError::InvalidSecret);
        }

        let email = validate::normalize_email(&request.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let roles = self.users.roles_for_user(user.id).await?;
        if !roles.iter().any(|r| r == policy::SUPER_ADMIN) {
            return Err(AuthError::Forbidden(
                "Account is not a super administrator",
            ));
        }

        password::validate_strength(&request.new_password).map_err(AuthError::WeakPassword)?;

        let hash = password::hash(&request.new_password)?;
        self.users.set_password_and_unlock(user.id, &hash).await?;
        log::warn!("Super admin password reset for account {}", user.id);
        Ok(())
    }

    /// Record a login attempt; failures are logged and swallowed.
    async fn record_attempt(
        &self,
        email: &str,
        user_id: Option<UserId>,
        request: &LoginRequest,
        success: bool,
        failure_reason: Option<&str>,
    ) {
        let attempt = NewLoginAttempt {
            email: email.to_string(),
            user_id,
            ip_address: request.ip_address.clone(),
            user_agent: request.user_agent.clone(),
            success,
            failure_reason: failure_reason.map(str::to_string),
        };
        if let Err(err) = self.users.record_login_attempt(attempt).await {
            log::warn!("Failed to record login attempt for {email}: {err}");
        }
    }
}

fn constant_time_eq(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
