//! Shared field validation helpers.
//!
//! Plain character-class checks, no regex engine. Every helper returns a
//! human-readable reason on rejection so callers can surface it as a
//! field-level validation failure.

/// Maximum stored length for an email address.
pub const MAX_EMAIL_LEN: usize = 256;

/// Normalize an email for storage and comparison: trim surrounding
/// whitespace and lowercase. Email identity is case-insensitive in this
/// system; every write and lookup goes through this.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check the shape of an (already normalized) email address.
///
/// Intentionally loose: exactly one `@`, non-empty local part, and a domain
/// containing a dot. Deliverability is not this crate's problem.
pub fn check_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email is required".to_string());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("email must be at most {MAX_EMAIL_LEN} characters"));
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("email is not a valid address".to_string()),
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err("email is not a valid address".to_string());
    }
    Ok(())
}

/// Check a free-text field against inclusive length bounds.
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        return Err(format!("{field} must be at least {min} characters"));
    }
    if len > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

/// Check an optional field's maximum length; `None` always passes.
pub fn check_optional_length(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), String> {
    match value {
        Some(v) if v.chars().count() > max => {
            Err(format!("{field} must be at most {max} characters"))
        }
        _ => Ok(()),
    }
}

/// Tenant codes are 3-32 characters of uppercase alphanumerics and
/// underscores.
pub fn check_tenant_code(code: &str) -> Result<(), String> {
    let len = code.chars().count();
    if !(3..=32).contains(&len) {
        return Err("code must be 3-32 characters".to_string());
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        return Err("code may only contain A-Z, 0-9 and underscore".to_string());
    }
    Ok(())
}

/// Currencies are three uppercase ASCII letters (ISO 4217 shape).
pub fn check_currency(currency: &str) -> Result<(), String> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err("currency must be a 3-letter uppercase code".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(check_email("user@example.com").is_ok());
        assert!(check_email("a.b+tag@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(check_email("").is_err());
        assert!(check_email("no-at-sign").is_err());
        assert!(check_email("two@@example.com").is_err());
        assert!(check_email("@example.com").is_err());
        assert!(check_email("user@").is_err());
        assert!(check_email("user@nodot").is_err());
    }

    #[test]
    fn rejects_overlong_email() {
        let email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(check_email(&email).is_err());
    }

    #[test]
    fn tenant_code_format() {
        assert!(check_tenant_code("ACME").is_ok());
        assert!(check_tenant_code("ACME_2024").is_ok());
        assert!(check_tenant_code("AB").is_err());
        assert!(check_tenant_code(&"A".repeat(33)).is_err());
        assert!(check_tenant_code("acme").is_err());
        assert!(check_tenant_code("ACME-1").is_err());
    }

    #[test]
    fn currency_format() {
        assert!(check_currency("USD").is_ok());
        assert!(check_currency("usd").is_err());
        assert!(check_currency("USDC").is_err());
        assert!(check_currency("US").is_err());
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(check_length("name", "ab", 2, 4).is_ok());
        assert!(check_length("name", "abcd", 2, 4).is_ok());
        assert!(check_length("name", "a", 2, 4).is_err());
        assert!(check_length("name", "abcde", 2, 4).is_err());
        assert!(check_optional_length("phone", None, 4).is_ok());
        assert!(check_optional_length("phone", Some("12345"), 4).is_err());
    }
}
