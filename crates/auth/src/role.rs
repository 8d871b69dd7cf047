//! Effective-role resolution.
//!
//! The stored account flags (`is_superuser`, `is_staff`, group membership)
//! collapse into a single closed [`Role`] via one pure function. Policy code
//! matches on `Role` only; nothing downstream inspects the raw flags.

use serde::{Deserialize, Serialize};

use staffgate_core::EmployeeId;

use crate::error::AuthError;
use crate::principal::{Principal, StaffGroup};

/// Effective authorization category of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Account provisioning authority (admin panel only, no data routes).
    SuperAdmin,
    /// HR staff: directory, onboarding, manage views.
    Hr,
    /// Regular employee: own records only.
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Hr => "hr",
            Role::Employee => "employee",
        }
    }

    /// Post-login landing path for this role.
    ///
    /// Employees land on their own dashboard; an employee without a linked
    /// record (which `resolve_role` should have rejected) falls back to `/`.
    pub fn landing_path(&self, linked_employee_id: Option<&EmployeeId>) -> String {
        match self {
            Role::SuperAdmin => "/admin/".to_string(),
            Role::Hr => "/employees/directory/".to_string(),
            Role::Employee => match linked_employee_id {
                Some(id) => format!("/employees/{id}/dashboard/"),
                None => "/".to_string(),
            },
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a principal's effective role from its stored flags.
///
/// Pure and total: first match wins, and a principal matching none of the
/// rules is an explicit [`AuthError::UnassignedRole`], never a silent
/// default.
pub fn resolve_role(principal: &Principal) -> Result<Role, AuthError> {
    if principal.is_superuser {
        return Ok(Role::SuperAdmin);
    }
    if principal.is_staff && principal.group == StaffGroup::Hr {
        return Ok(Role::Hr);
    }
    if principal.group == StaffGroup::Employee {
        return Ok(Role::Employee);
    }
    Err(AuthError::UnassignedRole(principal.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::{CredentialHash, Password, hash_password};
    use crate::principal::{PrincipalId, PrincipalStatus};
    use proptest::prelude::*;

    fn hash() -> CredentialHash {
        hash_password(&Password::new("test-password-1")).unwrap()
    }

    fn principal(is_superuser: bool, is_staff: bool, group: StaffGroup, linked: bool) -> Principal {
        Principal {
            id: PrincipalId::new(),
            username: "p".to_string(),
            credential_hash: hash(),
            is_staff,
            group,
            is_superuser,
            linked_employee_id: linked.then(|| EmployeeId::from_sequence(1)),
            status: PrincipalStatus::Active,
        }
    }

    #[test]
    fn superuser_wins_over_everything() {
        let p = principal(true, true, StaffGroup::Hr, false);
        assert_eq!(resolve_role(&p).unwrap(), Role::SuperAdmin);
    }

    #[test]
    fn staff_hr_resolves_to_hr() {
        let p = principal(false, true, StaffGroup::Hr, false);
        assert_eq!(resolve_role(&p).unwrap(), Role::Hr);
    }

    #[test]
    fn hr_group_without_staff_flag_is_unassigned() {
        // Data-integrity breach: the HR group requires is_staff.
        let p = principal(false, false, StaffGroup::Hr, false);
        assert!(matches!(resolve_role(&p), Err(AuthError::UnassignedRole(_))));
    }

    #[test]
    fn employee_group_resolves_to_employee() {
        let p = principal(false, false, StaffGroup::Employee, true);
        assert_eq!(resolve_role(&p).unwrap(), Role::Employee);
    }

    #[test]
    fn no_flags_is_unassigned() {
        let p = principal(false, false, StaffGroup::None, false);
        assert!(matches!(resolve_role(&p), Err(AuthError::UnassignedRole(_))));
    }

    #[test]
    fn landing_paths() {
        assert_eq!(Role::SuperAdmin.landing_path(None), "/admin/");
        assert_eq!(Role::Hr.landing_path(None), "/employees/directory/");
        let id = EmployeeId::from_sequence(7);
        assert_eq!(
            Role::Employee.landing_path(Some(&id)),
            "/employees/EMP-007/dashboard/"
        );
        assert_eq!(Role::Employee.landing_path(None), "/");
    }

    fn staff_group() -> impl Strategy<Value = StaffGroup> {
        prop_oneof![
            Just(StaffGroup::None),
            Just(StaffGroup::Hr),
            Just(StaffGroup::Employee),
        ]
    }

    proptest! {
        /// Resolution is total and deterministic over the whole flag space,
        /// and yields exactly the first matching rule.
        #[test]
        fn resolution_is_total_and_first_match(
            is_superuser in any::<bool>(),
            is_staff in any::<bool>(),
            group in staff_group(),
            linked in any::<bool>(),
        ) {
            let p = principal(is_superuser, is_staff, group, linked);

            let expected = if is_superuser {
                Some(Role::SuperAdmin)
            } else if is_staff && group == StaffGroup::Hr {
                Some(Role::Hr)
            } else if group == StaffGroup::Employee {
                Some(Role::Employee)
            } else {
                None
            };

            let first = resolve_role(&p);
            let second = resolve_role(&p);
            prop_assert_eq!(first.clone().ok(), expected);
            prop_assert_eq!(first.is_err(), second.is_err());
        }
    }
}
