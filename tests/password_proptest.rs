/// Property-based tests for password hashing and the strength policy
///
/// These tests verify that verification is consistent with hashing and
/// that the strength rules hold across randomly generated passwords.
use proptest::prelude::*;
use tenant_auth::auth::password::{self, MIN_PASSWORD_LEN, SPECIAL_CHARS};

// bcrypt's minimum supported cost; the bcrypt crate keeps the constant private.
const MIN_COST: u32 = 4;

// Strategy to generate a password that satisfies every strength rule
fn strong_password_strategy() -> impl Strategy<Value = String> {
    (
        "[A-Z]{1,3}",
        "[a-z]{5,12}",
        "[0-9]{1,3}",
        prop::sample::select(SPECIAL_CHARS.chars().collect::<Vec<_>>()),
    )
        .prop_map(|(upper, lower, digits, special)| format!("{upper}{lower}{digits}{special}"))
}

// Strategy to generate a long-enough password with every class except digits
fn digitless_password_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,17}".prop_map(|lower| format!("Ab!{lower}"))
}

// Strategy to generate arbitrary printable-ASCII candidates, mostly invalid
fn arbitrary_candidate_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,20}"
}

proptest! {
    // Each case pays for bcrypt work, so keep the count small. MIN_COST is
    // enough: these properties are about consistency, not work factor.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_hash_verify_round_trip(candidate in strong_password_strategy()) {
        let stored = bcrypt::hash(&candidate, MIN_COST).unwrap();
        prop_assert!(password::verify(&candidate, stored.as_bytes()));
    }

    #[test]
    fn test_wrong_password_never_verifies(candidate in strong_password_strategy()) {
        let stored = bcrypt::hash(&candidate, MIN_COST).unwrap();
        let altered = format!("{candidate}x");
        prop_assert!(!password::verify(&altered, stored.as_bytes()));
    }
}

proptest! {
    #[test]
    fn test_generated_strong_passwords_pass_policy(candidate in strong_password_strategy()) {
        prop_assert!(password::validate_strength(&candidate).is_ok());
    }

    #[test]
    fn test_missing_digit_is_always_rejected(candidate in digitless_password_strategy()) {
        let err = password::validate_strength(&candidate).unwrap_err();
        prop_assert!(err.contains("number"), "unexpected rejection: {err}");
    }

    #[test]
    fn test_accepted_passwords_carry_every_class(candidate in arbitrary_candidate_strategy()) {
        if password::validate_strength(&candidate).is_ok() {
            prop_assert!(candidate.chars().count() >= MIN_PASSWORD_LEN);
            prop_assert!(candidate.chars().any(|c| c.is_uppercase()));
            prop_assert!(candidate.chars().any(|c| c.is_lowercase()));
            prop_assert!(candidate.chars().any(|c| c.is_ascii_digit()));
            prop_assert!(candidate.chars().any(|c| SPECIAL_CHARS.contains(c)));
        }
    }

    #[test]
    fn test_verify_tolerates_arbitrary_stored_blobs(
        blob in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        // Never a panic, never a false positive on garbage
        prop_assert!(!password::verify("Valid123!", &blob));
    }
}
