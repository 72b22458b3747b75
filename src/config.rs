//! Core configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration for the database pool, token signing, and account
//! provisioning. Secrets are only ever read from the environment.

use crate::db::DatabaseConfig;

/// Complete core configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token signing configuration
    pub tokens: TokenConfig,
    /// Account provisioning configuration
    pub auth: AuthSettings,
}

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Access-token signing secret (required)
    pub access_secret: String,
    /// Refresh-token signing secret (required, must differ from access)
    pub refresh_secret: String,
    /// Access-token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh-token lifetime in days
    pub refresh_ttl_days: i64,
}

/// Account provisioning configuration
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Password assigned to newly provisioned users (required)
    pub default_password: String,
    /// Shared secret gating super-admin bootstrap (required)
    pub bootstrap_secret: String,
    /// Shared secret gating super-admin password reset (required)
    pub reset_secret: String,
    /// Email for the bootstrapped super admin
    pub bootstrap_admin_email: String,
    /// Display name for the bootstrapped super admin
    pub bootstrap_admin_name: String,
}

impl CoreConfig {
    /// Load configuration from environment variables
    ///
    /// Required variables: `DATABASE_URL`, `JWT_ACCESS_SECRET`,
    /// `JWT_REFRESH_SECRET`, `DEFAULT_USER_PASSWORD`, `BOOTSTRAP_SECRET`,
    /// and `SUPER_ADMIN_RESET_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig::from_env()?;

        let access_secret = require_var(
            "JWT_ACCESS_SECRET",
            "Generate with: openssl rand -hex 32",
        )?;
        let refresh_secret = require_var(
            "JWT_REFRESH_SECRET",
            "Generate with: openssl rand -hex 32",
        )?;

        let tokens = TokenConfig {
            access_secret,
            refresh_secret,
            access_ttl_minutes: parse_env_or("JWT_ACCESS_TTL_MINUTES", 60),
            refresh_ttl_days: parse_env_or("JWT_REFRESH_TTL_DAYS", 7),
        };

        let auth = AuthSettings {
            default_password: require_var(
                "DEFAULT_USER_PASSWORD",
                "Initial password assigned to every provisioned user",
            )?,
            bootstrap_secret: require_var(
                "BOOTSTRAP_SECRET",
                "Generate with: openssl rand -hex 32",
            )?,
            reset_secret: require_var(
                "SUPER_ADMIN_RESET_SECRET",
                "Generate with: openssl rand -hex 32",
            )?,
            bootstrap_admin_email: std::env::var("BOOTSTRAP_ADMIN_EMAIL")
                .unwrap_or_else(|_| "superadmin@example.com".to_string()),
            bootstrap_admin_name: std::env::var("BOOTSTRAP_ADMIN_NAME")
                .unwrap_or_else(|_| "Super Administrator".to_string()),
        };

        let config = CoreConfig {
            database,
            tokens,
            auth,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::Invalid`] naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.access_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if self.tokens.refresh_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if self.tokens.access_secret == self.tokens.refresh_secret {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET".to_string(),
                reason: "Must differ from JWT_ACCESS_SECRET".to_string(),
            });
        }

        if self.tokens.access_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_TTL_MINUTES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.tokens.refresh_ttl_days <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_TTL_DAYS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.auth.bootstrap_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "BOOTSTRAP_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if self.auth.reset_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "SUPER_ADMIN_RESET_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if let Err(reason) = crate::auth::password::validate_strength(&self.auth.default_password)
        {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_USER_PASSWORD".to_string(),
                reason,
            });
        }

        if let Err(reason) = crate::validate::check_email(&self.auth.bootstrap_admin_email) {
            return Err(ConfigError::Invalid {
                var: "BOOTSTRAP_ADMIN_EMAIL".to_string(),
                reason,
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn require_var(key: &str, hint: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingRequired {
        var: key.to_string(),
        hint: hint.to_string(),
    })
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
