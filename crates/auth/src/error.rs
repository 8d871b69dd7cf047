//! Access-control error taxonomy.

use thiserror::Error;

use crate::principal::PrincipalId;

/// Errors produced by the access-control core.
///
/// Authentication failures are deliberately uniform: callers cannot tell an
/// unknown username from a wrong password, and deactivated accounts fail the
/// same way. The distinction lives only in the audit log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Username unknown, password wrong, or account deactivated.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No session, or the session is expired/revoked.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Authenticated, but policy or ownership denies the request.
    #[error("forbidden")]
    Forbidden,

    /// Data-integrity problem: the principal's stored flags resolve to no
    /// usable role. Surfaced to callers as forbidden; logged for operators.
    #[error("principal {0} has no usable role")]
    UnassignedRole(PrincipalId),

    /// Onboarding collided with an existing account for the same identifier.
    #[error("duplicate employee: username '{0}' is already taken")]
    DuplicateEmployee(String),

    /// A new password failed the strength policy.
    #[error("weak password: {0}")]
    WeakPassword(&'static str),

    /// Unexpected infrastructure failure (hashing, poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}
