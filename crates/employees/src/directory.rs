//! Employee directory storage.
//!
//! The directory is the system of record for employee profiles and for the
//! `EMP-NNN` id sequence. Uniqueness checks and inserts happen inside a
//! single write-lock section so concurrent onboarding cannot mint duplicate
//! ids or duplicate records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use staffgate_core::{DomainError, EmployeeId};

use crate::profile::EmployeeProfile;

/// Directory of employee profiles.
pub trait EmployeeDirectory: Send + Sync {
    /// Insert a profile; fails with `Conflict` if the employee id is taken.
    ///
    /// Check and insert are atomic with respect to other calls.
    fn insert(&self, profile: EmployeeProfile) -> Result<(), DomainError>;

    fn get(&self, id: &EmployeeId) -> Option<EmployeeProfile>;

    /// All profiles, ordered by employee id.
    fn list(&self) -> Vec<EmployeeProfile>;

    /// Remove a profile. Undoes an insert when a dependent write (account
    /// issuance) fails, so the two never diverge; a missing id is a no-op.
    fn remove(&self, id: &EmployeeId);

    /// Next unused id in the canonical `EMP-NNN` sequence.
    fn next_employee_id(&self) -> EmployeeId;
}

impl<S> EmployeeDirectory for Arc<S>
where
    S: EmployeeDirectory + ?Sized,
{
    fn insert(&self, profile: EmployeeProfile) -> Result<(), DomainError> {
        (**self).insert(profile)
    }

    fn get(&self, id: &EmployeeId) -> Option<EmployeeProfile> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<EmployeeProfile> {
        (**self).list()
    }

    fn remove(&self, id: &EmployeeId) {
        (**self).remove(id)
    }

    fn next_employee_id(&self) -> EmployeeId {
        (**self).next_employee_id()
    }
}

/// In-memory directory for dev/test deployments.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<HashMap<EmployeeId, EmployeeProfile>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn insert(&self, profile: EmployeeProfile) -> Result<(), DomainError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("directory lock poisoned"))?;

        if map.contains_key(&profile.employee_id) {
            return Err(DomainError::conflict(format!(
                "employee id {} already exists",
                profile.employee_id
            )));
        }
        map.insert(profile.employee_id.clone(), profile);
        Ok(())
    }

    fn get(&self, id: &EmployeeId) -> Option<EmployeeProfile> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn list(&self) -> Vec<EmployeeProfile> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut profiles: Vec<_> = map.values().cloned().collect();
        profiles.sort_by(|a, b| a.employee_id.as_str().cmp(b.employee_id.as_str()));
        profiles
    }

    fn remove(&self, id: &EmployeeId) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(id);
        }
    }

    fn next_employee_id(&self) -> EmployeeId {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return EmployeeId::first(),
        };

        // Legacy/imported ids without a numeric suffix do not advance the sequence.
        map.keys()
            .filter(|id| id.sequence().is_some())
            .max_by_key(|id| id.sequence())
            .and_then(EmployeeId::next)
            .unwrap_or_else(EmployeeId::first)
    }
}
