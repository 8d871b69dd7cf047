//! `staffgate-auth` — authentication and authorization core.
//!
//! Everything needed to decide "may this request touch this path": principal
//! records, password credentials, server-side sessions, role resolution, the
//! route-policy table, the request guard, and onboarding issuance of one-time
//! credentials. This crate is intentionally decoupled from HTTP; the API
//! layer adapts it to axum.

pub mod error;
pub mod guard;
pub mod onboarding;
pub mod password;
pub mod policy;
pub mod principal;
pub mod role;
pub mod session;
pub mod store;

pub use error::AuthError;
pub use guard::{AccessGrant, AccessGuard};
pub use onboarding::{OnboardingIssuer, TemporaryCredential};
pub use password::{CredentialHash, Password, check_strength, generate_password, hash_password, verify_password};
pub use policy::{OwnershipRule, PathParams, PolicyTable, RoutePattern, RoutePolicy};
pub use principal::{Principal, PrincipalId, PrincipalStatus, StaffGroup};
pub use role::{Role, resolve_role};
pub use session::{
    InMemorySessionStore, Session, SessionConfig, SessionManager, SessionStore, SessionToken,
};
pub use store::{InMemoryPrincipalStore, PrincipalStore};
