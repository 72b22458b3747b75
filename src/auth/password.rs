//! Password hashing, verification, and strength policy.
//!
//! Hashes are bcrypt with cost factor 12. The encoded `$2b$12$...` string is
//! stored as an opaque byte blob; the salt is embedded in it, so
//! verification needs nothing beyond the blob itself. The legacy
//! `password_salt` column some deployments still carry is ignored here.

use bcrypt::BcryptError;

/// bcrypt cost factor for newly hashed passwords.
pub const HASH_COST: u32 = 12;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// The special characters the strength policy accepts.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Hash a password into an opaque stored secret.
///
/// Output differs on every call (fresh salt); verification is deterministic.
pub fn hash(password: &str) -> Result<Vec<u8>, BcryptError> {
    let encoded = bcrypt::hash(password, HASH_COST)?;
    Ok(encoded.into_bytes())
}

/// Verify a password against a stored secret.
///
/// Never errors: a malformed blob (non-UTF-8, not a bcrypt string) simply
/// does not match.
pub fn verify(password: &str, stored: &[u8]) -> bool {
    match std::str::from_utf8(stored) {
        Ok(encoded) => bcrypt::verify(password, encoded).unwrap_or(false),
        Err(_) => false,
    }
}

/// Validate password strength. Rules are checked in order and the first
/// failure wins; an empty or whitespace-only password fails the length rule.
pub fn validate_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err("Password must contain at least one special character".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum supported cost; the bcrypt crate keeps the constant private.
    const MIN_COST: u32 = 4;

    #[test]
    fn hash_then_verify_round_trips() {
        let stored = hash("Valid123!").unwrap();
        assert!(verify("Valid123!", &stored));
        assert!(!verify("Valid123?", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        // Cheap cost: this test only cares about salting, not work factor.
        let a = bcrypt::hash("Valid123!", MIN_COST).unwrap();
        let b = bcrypt::hash("Valid123!", MIN_COST).unwrap();
        assert_ne!(a, b);
        assert!(verify("Valid123!", a.as_bytes()));
        assert!(verify("Valid123!", b.as_bytes()));
    }

    #[test]
    fn malformed_stored_secret_never_matches() {
        assert!(!verify("Valid123!", b""));
        assert!(!verify("Valid123!", b"not-a-bcrypt-hash"));
        assert!(!verify("Valid123!", &[0xff, 0xfe, 0x00]));
    }

    #[test]
    fn strength_rules_fire_in_order() {
        assert_eq!(
            validate_strength("short1!").unwrap_err(),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            validate_strength("alllowercase1!").unwrap_err(),
            "Password must contain at least one uppercase letter"
        );
        assert_eq!(
            validate_strength("ALLUPPER1!").unwrap_err(),
            "Password must contain at least one lowercase letter"
        );
        assert_eq!(
            validate_strength("NoDigits!!").unwrap_err(),
            "Password must contain at least one number"
        );
        assert_eq!(
            validate_strength("NoSpecial123").unwrap_err(),
            "Password must contain at least one special character"
        );
        assert!(validate_strength("Valid123!").is_ok());
    }

    #[test]
    fn whitespace_only_fails_length_first() {
        assert_eq!(
            validate_strength("   ").unwrap_err(),
            "Password must be at least 8 characters long"
        );
    }
}
