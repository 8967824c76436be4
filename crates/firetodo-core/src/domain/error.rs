//! Error taxonomy
//!
//! Credential errors are shown verbatim, validation errors are raised before any
//! gateway call, store errors cover both mutations and subscriptions.

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    /// Provider error code, e.g. `auth/invalid-credential`
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Local checks performed before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("owner identifier must not be empty")]
    EmptyOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Query needs a composite index that is still being built, among others
    FailedPrecondition,
    PermissionDenied,
    NotFound,
    Unavailable,
    Unknown,
}

impl StoreErrorKind {
    /// Parse a Firestore error code, with or without the `firestore/` prefix
    pub fn from_code(code: &str) -> Self {
        match code.trim_start_matches("firestore/") {
            "failed-precondition" => Self::FailedPrecondition,
            "permission-denied" => Self::PermissionDenied,
            "not-found" => Self::NotFound,
            "unavailable" => Self::Unavailable,
            _ => Self::Unknown,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::FailedPrecondition => "failed-precondition",
            Self::PermissionDenied => "permission-denied",
            Self::NotFound => "not-found",
            Self::Unavailable => "unavailable",
            Self::Unknown => "unknown",
        }
    }
}

/// Failure reported by the document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({})", .kind.as_code())]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::from_code(code), message)
    }

    /// The required composite index is not available yet
    pub fn is_index_provisioning(&self) -> bool {
        self.kind == StoreErrorKind::FailedPrecondition && self.message.contains("index")
    }
}
