use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staffgate_core::{DomainError, EmployeeId};

use crate::password::CredentialHash;

/// Identity of an authenticated account (super admin, HR staff, or employee).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<PrincipalId> for Uuid {
    fn from(value: PrincipalId) -> Self {
        value.0
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Staff group membership stored on the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaffGroup {
    #[default]
    None,
    Hr,
    Employee,
}

/// Account status. Accounts are never hard-deleted, only deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalStatus {
    #[default]
    Active,
    Deactivated,
}

/// A stored account record.
///
/// # Invariants
/// - An `Employee`-group principal has a non-null `linked_employee_id`.
/// - An `Hr`-group principal has `is_staff == true`.
/// - Exactly one of `is_superuser` / group `Hr` / group `Employee`
///   characterizes the role (enforced by the constructors and `validate`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: String,
    pub credential_hash: CredentialHash,
    pub is_staff: bool,
    pub group: StaffGroup,
    pub is_superuser: bool,
    pub linked_employee_id: Option<EmployeeId>,
    pub status: PrincipalStatus,
}

impl Principal {
    /// An employee account, linked to its employee record.
    pub fn new_employee(
        username: impl Into<String>,
        credential_hash: CredentialHash,
        employee_id: EmployeeId,
    ) -> Self {
        Self {
            id: PrincipalId::new(),
            username: username.into(),
            credential_hash,
            is_staff: false,
            group: StaffGroup::Employee,
            is_superuser: false,
            linked_employee_id: Some(employee_id),
            status: PrincipalStatus::Active,
        }
    }

    /// An HR staff account.
    pub fn new_hr(username: impl Into<String>, credential_hash: CredentialHash) -> Self {
        Self {
            id: PrincipalId::new(),
            username: username.into(),
            credential_hash,
            is_staff: true,
            group: StaffGroup::Hr,
            is_superuser: false,
            linked_employee_id: None,
            status: PrincipalStatus::Active,
        }
    }

    /// The super admin account used for provisioning.
    pub fn new_super_admin(username: impl Into<String>, credential_hash: CredentialHash) -> Self {
        Self {
            id: PrincipalId::new(),
            username: username.into(),
            credential_hash,
            is_staff: true,
            group: StaffGroup::None,
            is_superuser: true,
            linked_employee_id: None,
            status: PrincipalStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PrincipalStatus::Active
    }

    /// Check the stored-record invariants.
    ///
    /// Stores run this on insert so a malformed record never lands; records
    /// that predate the checks surface as `UnassignedRole` at resolve time.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if self.group == StaffGroup::Employee && self.linked_employee_id.is_none() {
            return Err(DomainError::invariant(
                "employee-group principal must link an employee record",
            ));
        }
        if self.group == StaffGroup::Hr && !self.is_staff {
            return Err(DomainError::invariant("hr-group principal must be staff"));
        }
        Ok(())
    }
}
