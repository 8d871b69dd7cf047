//! Principal storage.
//!
//! Username uniqueness is enforced inside the store's write path: the check
//! and the insert happen under one write lock, so two concurrent inserts of
//! the same username can never both succeed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use staffgate_core::DomainError;

use crate::password::CredentialHash;
use crate::principal::{Principal, PrincipalId, PrincipalStatus};

/// Storage of account records.
pub trait PrincipalStore: Send + Sync {
    /// Atomic check-and-insert; fails with `Conflict` if the username is
    /// taken and `Validation`/`InvariantViolation` if the record is malformed.
    fn insert(&self, principal: Principal) -> Result<(), DomainError>;

    fn get(&self, id: &PrincipalId) -> Option<Principal>;

    fn find_by_username(&self, username: &str) -> Option<Principal>;

    /// Replace the stored credential hash.
    fn update_credential_hash(
        &self,
        id: &PrincipalId,
        hash: CredentialHash,
    ) -> Result<(), DomainError>;

    /// Deactivate an account. Idempotent; accounts are never deleted.
    fn deactivate(&self, id: &PrincipalId) -> Result<(), DomainError>;
}

impl<S> PrincipalStore for Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    fn insert(&self, principal: Principal) -> Result<(), DomainError> {
        (**self).insert(principal)
    }

    fn get(&self, id: &PrincipalId) -> Option<Principal> {
        (**self).get(id)
    }

    fn find_by_username(&self, username: &str) -> Option<Principal> {
        (**self).find_by_username(username)
    }

    fn update_credential_hash(
        &self,
        id: &PrincipalId,
        hash: CredentialHash,
    ) -> Result<(), DomainError> {
        (**self).update_credential_hash(id, hash)
    }

    fn deactivate(&self, id: &PrincipalId) -> Result<(), DomainError> {
        (**self).deactivate(id)
    }
}

#[derive(Debug, Default)]
struct PrincipalMap {
    by_id: HashMap<PrincipalId, Principal>,
    id_by_username: HashMap<String, PrincipalId>,
}

/// In-memory principal store for dev/test deployments.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    inner: RwLock<PrincipalMap>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts (admin-panel surface).
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PrincipalStore for InMemoryPrincipalStore {
    fn insert(&self, principal: Principal) -> Result<(), DomainError> {
        principal.validate()?;

        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("principal store lock poisoned"))?;

        if map.id_by_username.contains_key(&principal.username) {
            return Err(DomainError::conflict(format!(
                "username '{}' already exists",
                principal.username
            )));
        }

        map.id_by_username
            .insert(principal.username.clone(), principal.id);
        map.by_id.insert(principal.id, principal);
        Ok(())
    }

    fn get(&self, id: &PrincipalId) -> Option<Principal> {
        let map = self.inner.read().ok()?;
        map.by_id.get(id).cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<Principal> {
        let map = self.inner.read().ok()?;
        let id = map.id_by_username.get(username)?;
        map.by_id.get(id).cloned()
    }

    fn update_credential_hash(
        &self,
        id: &PrincipalId,
        hash: CredentialHash,
    ) -> Result<(), DomainError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("principal store lock poisoned"))?;
        let principal = map.by_id.get_mut(id).ok_or(DomainError::NotFound)?;
        principal.credential_hash = hash;
        Ok(())
    }

    fn deactivate(&self, id: &PrincipalId) -> Result<(), DomainError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("principal store lock poisoned"))?;
        let principal = map.by_id.get_mut(id).ok_or(DomainError::NotFound)?;
        principal.status = PrincipalStatus::Deactivated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::{Password, hash_password};

    fn hr(username: &str) -> Principal {
        Principal::new_hr(username, hash_password(&Password::new("tester-pass-1")).unwrap())
    }

    #[test]
    fn insert_and_lookup() {
        let store = InMemoryPrincipalStore::new();
        let p = hr("hr.lena");
        let id = p.id;
        store.insert(p).unwrap();

        assert_eq!(store.get(&id).unwrap().username, "hr.lena");
        assert_eq!(store.find_by_username("hr.lena").unwrap().id, id);
        assert!(store.find_by_username("nobody").is_none());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let store = InMemoryPrincipalStore::new();
        store.insert(hr("hr.lena")).unwrap();
        let err = store.insert(hr("hr.lena")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn malformed_record_never_lands() {
        let store = InMemoryPrincipalStore::new();
        let mut p = hr("hr.bad");
        p.is_staff = false;
        assert!(store.insert(p).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn deactivate_is_idempotent_and_keeps_record() {
        let store = InMemoryPrincipalStore::new();
        let p = hr("hr.lena");
        let id = p.id;
        store.insert(p).unwrap();

        store.deactivate(&id).unwrap();
        store.deactivate(&id).unwrap();

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.status, PrincipalStatus::Deactivated);
    }

    #[test]
    fn concurrent_inserts_of_same_username_yield_one_winner() {
        let store = Arc::new(InMemoryPrincipalStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.insert(hr("hr.race")).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|&ok| ok)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.len(), 1);
    }
}
