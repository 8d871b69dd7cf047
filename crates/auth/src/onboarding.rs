//! Account issuance for onboarding.
//!
//! Two issuance policies, keyed by the role being created: employee accounts
//! are issued by HR, HR accounts by the super admin. The generated password
//! is returned to the caller exactly once; only its hash is stored.

use rand::rngs::OsRng;

use staffgate_core::{DomainError, EmployeeId};

use crate::error::AuthError;
use crate::password::{Password, generate_password, hash_password};
use crate::principal::Principal;
use crate::role::{Role, resolve_role};
use crate::store::PrincipalStore;

/// A freshly issued credential, held only transiently.
///
/// This is the one surface in the system that carries a plaintext password.
/// It is handed to the caller (for one-time display) and dropped; it is
/// never persisted and its password never appears in logs (`Password` has a
/// redacted `Debug`).
#[derive(Debug, Clone)]
pub struct TemporaryCredential {
    pub username: String,
    pub password: Password,
}

/// Creates principals for new employees and HR staff.
pub struct OnboardingIssuer<P> {
    principals: P,
}

impl<P: PrincipalStore> OnboardingIssuer<P> {
    pub fn new(principals: P) -> Self {
        Self { principals }
    }

    /// Issue an employee account linked to `employee_id`. Actor must be HR.
    ///
    /// The username is derived from the employee id (lowercased). A
    /// collision means an account already exists for that identifier and
    /// fails `DuplicateEmployee`; the store's atomic check-and-insert makes
    /// concurrent duplicate onboarding produce exactly one winner.
    pub fn onboard_employee(
        &self,
        actor: &Principal,
        employee_id: &EmployeeId,
    ) -> Result<TemporaryCredential, AuthError> {
        self.require_role(actor, Role::Hr)?;

        let username = employee_id.as_str().to_lowercase();
        let password = generate_password(&mut OsRng);
        let hash = hash_password(&password)?;

        let principal = Principal::new_employee(username.clone(), hash, employee_id.clone());
        self.insert(principal, &username)?;

        tracing::info!(%employee_id, username, actor = %actor.id, "employee account issued");
        Ok(TemporaryCredential { username, password })
    }

    /// Issue an HR staff account. Actor must be the super admin.
    pub fn create_hr_account(
        &self,
        actor: &Principal,
        username: &str,
    ) -> Result<TemporaryCredential, AuthError> {
        self.require_role(actor, Role::SuperAdmin)?;

        let username = username.trim().to_lowercase();
        if username.is_empty() {
            return Err(AuthError::Internal("username cannot be empty".to_string()));
        }

        let password = generate_password(&mut OsRng);
        let hash = hash_password(&password)?;

        let principal = Principal::new_hr(username.clone(), hash);
        self.insert(principal, &username)?;

        tracing::info!(username, actor = %actor.id, "hr account issued");
        Ok(TemporaryCredential { username, password })
    }

    fn require_role(&self, actor: &Principal, required: Role) -> Result<(), AuthError> {
        let role = resolve_role(actor).map_err(|_| AuthError::Forbidden)?;
        if role != required {
            tracing::warn!(actor = %actor.id, %role, ?required, "issuance denied: wrong actor role");
            return Err(AuthError::Forbidden);
        }
        Ok(())
    }

    fn insert(&self, principal: Principal, username: &str) -> Result<(), AuthError> {
        self.principals.insert(principal).map_err(|e| match e {
            DomainError::Conflict(_) => AuthError::DuplicateEmployee(username.to_string()),
            other => AuthError::Internal(other.to_string()),
        })
    }
}
