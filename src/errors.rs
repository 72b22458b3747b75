//! Failure taxonomy shared by every workflow.
//!
//! Each module keeps its own error enum; this module defines the coarse
//! classification a transport layer needs to turn a failure into a response.
//! The mapping is mechanical: `ErrorKind::status_code` mirrors the kind.

use serde::{Deserialize, Serialize};

/// Coarse classification of a workflow failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request data failed a field-level rule.
    Validation,
    /// Credentials or a presented token were rejected. The message is
    /// deliberately generic to avoid user enumeration.
    AuthFailed,
    /// The caller is authenticated but not allowed to perform the action.
    Forbidden,
    /// The referenced entity does not exist (or is soft-deleted).
    NotFound,
    /// The request conflicts with existing data (duplicate code, email, or
    /// an already-bootstrapped deployment).
    Conflict,
    /// Unexpected internal failure, typically storage.
    Fatal,
}

impl ErrorKind {
    /// HTTP status code a transport should answer with for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::AuthFailed => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Fatal => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_mirror_kinds() {
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::AuthFailed.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::Fatal.status_code(), 500);
    }
}
