use staffgate_auth::{AccessGrant, PrincipalId, Role};
use staffgate_core::EmployeeId;

/// Access context for a request (authenticated identity + effective role).
///
/// Inserted by the guard middleware; present for all protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    principal_id: PrincipalId,
    role: Role,
    linked_employee_id: Option<EmployeeId>,
}

impl AccessContext {
    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn linked_employee_id(&self) -> Option<&EmployeeId> {
        self.linked_employee_id.as_ref()
    }
}

impl From<AccessGrant> for AccessContext {
    fn from(grant: AccessGrant) -> Self {
        Self {
            principal_id: grant.principal_id,
            role: grant.role,
            linked_employee_id: grant.linked_employee_id,
        }
    }
}
