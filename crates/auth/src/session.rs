//! Server-side sessions.
//!
//! A session is an opaque random token bound to a principal with an absolute
//! expiry. There is no caching layer anywhere between `resolve` and the
//! store, so a revocation issued on one connection is visible to every other
//! connection immediately.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;

use crate::error::AuthError;
use crate::password::{
    CredentialHash, Password, check_strength, hash_password, verify_password,
};
use crate::principal::{Principal, PrincipalId};
use crate::store::PrincipalStore;

/// Length of session tokens in characters.
const TOKEN_LEN: usize = 32;

/// An opaque session token. Proof of prior authentication; treat as a secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from the OS CSPRNG.
    pub fn generate() -> Self {
        let token: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// A live session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub principal_id: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session issuance configuration, loaded once at startup.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Absolute session lifetime; expiry is checked at resolve time.
    pub ttl: Duration,
}

impl SessionConfig {
    pub fn with_ttl_hours(hours: i64) -> Self {
        Self {
            ttl: Duration::hours(hours),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::with_ttl_hours(12)
    }
}

/// Storage of live sessions. Owned exclusively by the [`SessionManager`].
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: Session);
    fn get(&self, token: &SessionToken) -> Option<Session>;
    fn remove(&self, token: &SessionToken);
    fn remove_all_for(&self, principal_id: &PrincipalId);
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn insert(&self, session: Session) {
        (**self).insert(session)
    }

    fn get(&self, token: &SessionToken) -> Option<Session> {
        (**self).get(token)
    }

    fn remove(&self, token: &SessionToken) {
        (**self).remove(token)
    }

    fn remove_all_for(&self, principal_id: &PrincipalId) {
        (**self).remove_all_for(principal_id)
    }
}

/// In-memory session store for dev/test deployments.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: Session) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(session.token.as_str().to_string(), session);
        }
    }

    fn get(&self, token: &SessionToken) -> Option<Session> {
        let map = self.inner.read().ok()?;
        map.get(token.as_str()).cloned()
    }

    fn remove(&self, token: &SessionToken) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(token.as_str());
        }
    }

    fn remove_all_for(&self, principal_id: &PrincipalId) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|_, s| s.principal_id != *principal_id);
        }
    }
}

/// Authenticates credentials and owns the session lifecycle.
///
/// All operations take `now` explicitly so expiry behavior is deterministic
/// under test; the HTTP layer passes `Utc::now()`.
pub struct SessionManager<P, S> {
    principals: P,
    sessions: S,
    config: SessionConfig,
}

impl<P, S> SessionManager<P, S>
where
    P: PrincipalStore,
    S: SessionStore,
{
    pub fn new(principals: P, sessions: S, config: SessionConfig) -> Self {
        Self {
            principals,
            sessions,
            config,
        }
    }

    /// Verify credentials and issue a fresh session.
    ///
    /// Every failure is the same `InvalidCredentials`: unknown username,
    /// wrong password, and deactivated account are indistinguishable to the
    /// caller. When the username is unknown a throwaway hash is still
    /// verified so response timing does not signal account existence.
    pub fn authenticate(
        &self,
        username: &str,
        password: &Password,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let Some(principal) = self.principals.find_by_username(username) else {
            let _ = verify_password(password, fallback_hash());
            tracing::warn!(username, "login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &principal.credential_hash) {
            tracing::warn!(principal_id = %principal.id, "login failed: bad password");
            return Err(AuthError::InvalidCredentials);
        }

        if !principal.is_active() {
            tracing::warn!(principal_id = %principal.id, "login failed: account deactivated");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            token: SessionToken::generate(),
            principal_id: principal.id,
            created_at: now,
            expires_at: now + self.config.ttl,
        };
        self.sessions.insert(session.clone());
        tracing::info!(principal_id = %principal.id, "session issued");
        Ok(session)
    }

    /// Resolve a token to its principal.
    ///
    /// Fails `Unauthenticated` for absent, expired, or revoked tokens, and
    /// for sessions whose principal has since been deactivated or removed.
    /// Expired sessions are dropped from the store on observation.
    pub fn resolve(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let session = self.sessions.get(token).ok_or(AuthError::Unauthenticated)?;

        if session.is_expired(now) {
            self.sessions.remove(token);
            return Err(AuthError::Unauthenticated);
        }

        let principal = self
            .principals
            .get(&session.principal_id)
            .filter(|p| p.is_active())
            .ok_or(AuthError::Unauthenticated)?;

        Ok(principal)
    }

    /// Revoke a session. Idempotent; a no-op if the token is already gone.
    pub fn revoke(&self, token: &SessionToken) {
        self.sessions.remove(token);
    }

    /// Change a principal's password after re-verifying the old one.
    ///
    /// On success every session for the principal is revoked, forcing
    /// re-login everywhere; this contains a compromised credential.
    pub fn change_credential(
        &self,
        principal_id: &PrincipalId,
        old_password: &Password,
        new_password: &Password,
    ) -> Result<(), AuthError> {
        let principal = self
            .principals
            .get(principal_id)
            .filter(|p| p.is_active())
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(old_password, &principal.credential_hash) {
            tracing::warn!(principal_id = %principal.id, "password change rejected: bad old password");
            return Err(AuthError::InvalidCredentials);
        }

        check_strength(new_password)?;

        let hash = hash_password(new_password)?;
        self.principals
            .update_credential_hash(principal_id, hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.sessions.remove_all_for(principal_id);
        tracing::info!(principal_id = %principal.id, "password changed, all sessions revoked");
        Ok(())
    }

    /// Deactivate an account and kill its sessions.
    pub fn deactivate(&self, principal_id: &PrincipalId) -> Result<(), AuthError> {
        self.principals
            .deactivate(principal_id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        self.sessions.remove_all_for(principal_id);
        tracing::info!(%principal_id, "account deactivated");
        Ok(())
    }
}

/// Throwaway hash verified on unknown-username logins to equalize timing.
fn fallback_hash() -> &'static CredentialHash {
    use std::sync::OnceLock;
    static FALLBACK: OnceLock<CredentialHash> = OnceLock::new();
    FALLBACK.get_or_init(|| {
        hash_password(&Password::new("fallback-timing-equalizer-0"))
            .unwrap_or_else(|_| CredentialHash::new(String::new()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Principal;
    use crate::store::InMemoryPrincipalStore;
    use staffgate_core::EmployeeId;

    type Manager = SessionManager<Arc<InMemoryPrincipalStore>, Arc<InMemorySessionStore>>;

    fn manager() -> (Manager, Arc<InMemoryPrincipalStore>) {
        let principals = Arc::new(InMemoryPrincipalStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let manager = SessionManager::new(principals.clone(), sessions, SessionConfig::default());
        (manager, principals)
    }

    fn add_employee(principals: &InMemoryPrincipalStore, username: &str, password: &str) -> PrincipalId {
        let p = Principal::new_employee(
            username,
            hash_password(&Password::new(password)).unwrap(),
            EmployeeId::from_sequence(1),
        );
        let id = p.id;
        principals.insert(p).unwrap();
        id
    }

    #[test]
    fn authenticate_and_resolve() {
        let (manager, principals) = manager();
        let id = add_employee(&principals, "emp-001", "first-day-pw-1");

        let now = Utc::now();
        let session = manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
            .unwrap();
        assert_eq!(session.principal_id, id);

        let principal = manager.resolve(&session.token, now).unwrap();
        assert_eq!(principal.id, id);
    }

    #[test]
    fn unknown_user_and_wrong_password_fail_identically() {
        let (manager, principals) = manager();
        add_employee(&principals, "emp-001", "first-day-pw-1");

        let now = Utc::now();
        let a = manager
            .authenticate("ghost", &Password::new("whatever-pw-1"), now)
            .unwrap_err();
        let b = manager
            .authenticate("emp-001", &Password::new("wrong-pw-111"), now)
            .unwrap_err();
        assert_eq!(a, AuthError::InvalidCredentials);
        assert_eq!(b, AuthError::InvalidCredentials);
    }

    #[test]
    fn expired_session_fails_and_is_removed() {
        let (manager, principals) = manager();
        add_employee(&principals, "emp-001", "first-day-pw-1");

        let now = Utc::now();
        let session = manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
            .unwrap();

        let later = now + Duration::hours(13);
        assert_eq!(
            manager.resolve(&session.token, later).unwrap_err(),
            AuthError::Unauthenticated
        );
        // Also gone for a subsequent in-window check.
        assert_eq!(
            manager.resolve(&session.token, now).unwrap_err(),
            AuthError::Unauthenticated
        );
    }

    #[test]
    fn revoke_is_idempotent() {
        let (manager, principals) = manager();
        add_employee(&principals, "emp-001", "first-day-pw-1");

        let now = Utc::now();
        let session = manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
            .unwrap();

        manager.revoke(&session.token);
        manager.revoke(&session.token);
        assert!(manager.resolve(&session.token, now).is_err());
    }

    #[test]
    fn change_credential_revokes_every_session() {
        let (manager, principals) = manager();
        let id = add_employee(&principals, "emp-001", "first-day-pw-1");

        let now = Utc::now();
        let s1 = manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
            .unwrap();
        let s2 = manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
            .unwrap();

        manager
            .change_credential(
                &id,
                &Password::new("first-day-pw-1"),
                &Password::new("my-own-secret-2"),
            )
            .unwrap();

        assert!(manager.resolve(&s1.token, now).is_err());
        assert!(manager.resolve(&s2.token, now).is_err());

        // New password works, old one does not.
        assert!(manager
            .authenticate("emp-001", &Password::new("my-own-secret-2"), now)
            .is_ok());
        assert!(manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
            .is_err());
    }

    #[test]
    fn change_credential_requires_old_password() {
        let (manager, principals) = manager();
        let id = add_employee(&principals, "emp-001", "first-day-pw-1");

        let err = manager
            .change_credential(
                &id,
                &Password::new("not-the-old-one"),
                &Password::new("my-own-secret-2"),
            )
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn change_credential_enforces_strength() {
        let (manager, principals) = manager();
        let id = add_employee(&principals, "emp-001", "first-day-pw-1");

        let err = manager
            .change_credential(&id, &Password::new("first-day-pw-1"), &Password::new("weak"))
            .unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));

        // Old password still valid: the weak candidate was never stored.
        assert!(manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), Utc::now())
            .is_ok());
    }

    #[test]
    fn deactivated_account_cannot_login_and_loses_sessions() {
        let (manager, principals) = manager();
        let id = add_employee(&principals, "emp-001", "first-day-pw-1");

        let now = Utc::now();
        let session = manager
            .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
            .unwrap();

        manager.deactivate(&id).unwrap();

        assert_eq!(
            manager.resolve(&session.token, now).unwrap_err(),
            AuthError::Unauthenticated
        );
        assert_eq!(
            manager
                .authenticate("emp-001", &Password::new("first-day-pw-1"), now)
                .unwrap_err(),
            AuthError::InvalidCredentials
        );
    }
}
