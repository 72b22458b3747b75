//! Account lockout policy.
//!
//! A per-user state machine driven by login outcomes. The policy is pure: it
//! evaluates transitions and returns the next [`LockoutState`]; persisting
//! that state is the store's job. There is no time-based unlock; a locked
//! account stays locked until an administrative password set/reset or, where
//! the account was never actually locked, a successful login clears the
//! counter.

use chrono::{DateTime, Utc};

/// Failed attempts at which an account locks. The transition compares the
/// incremented counter, so the 4th consecutive failure locks.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: i32 = 4;

/// Snapshot of a user's lockout bookkeeping, persisted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutState {
    pub failed_attempts: i32,
    pub is_locked: bool,
    pub last_failed_login_at: Option<DateTime<Utc>>,
}

impl LockoutState {
    /// The cleared state: no failures, unlocked.
    pub fn cleared() -> Self {
        Self {
            failed_attempts: 0,
            is_locked: false,
            last_failed_login_at: None,
        }
    }
}

/// Evaluates lockout transitions.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    max_failed_attempts: i32,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILED_ATTEMPTS)
    }
}

impl LockoutPolicy {
    pub fn new(max_failed_attempts: i32) -> Self {
        Self { max_failed_attempts }
    }

    /// Transition after a failed password check: increment the counter and
    /// lock once it reaches the threshold.
    pub fn on_failure(&self, prior_failures: i32, now: DateTime<Utc>) -> LockoutState {
        let failed_attempts = prior_failures.saturating_add(1);
        LockoutState {
            failed_attempts,
            is_locked: failed_attempts >= self.max_failed_attempts,
            last_failed_login_at: Some(now),
        }
    }

    /// Transition after a successful authentication.
    pub fn on_success(&self) -> LockoutState {
        LockoutState::cleared()
    }

    /// Administrative override applied on every password set/reset,
    /// regardless of current state.
    pub fn on_password_reset(&self) -> LockoutState {
        LockoutState::cleared()
    }
}
