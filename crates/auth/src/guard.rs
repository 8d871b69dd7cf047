//! Request authorization guard.
//!
//! One entry point per request: resolve the session, derive the role, match
//! the route policy, apply the ownership rule. Every denial lands in the
//! audit log with the principal (when known) and the path; the caller only
//! ever sees a generic unauthenticated/forbidden error.

use core::str::FromStr;

use chrono::{DateTime, Utc};

use staffgate_core::EmployeeId;

use crate::error::AuthError;
use crate::policy::{EMPLOYEE_ID_PARAM, OwnershipRule, PathParams, PolicyTable};
use crate::principal::PrincipalId;
use crate::role::{Role, resolve_role};
use crate::session::{SessionManager, SessionStore, SessionToken};
use crate::store::PrincipalStore;

/// A positive authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub principal_id: PrincipalId,
    pub role: Role,
    pub linked_employee_id: Option<EmployeeId>,
    /// The policy pattern that matched (for downstream logging).
    pub matched_pattern: String,
    pub params: PathParams,
}

/// Intercepts requests and allows or denies them against the policy table.
pub struct AccessGuard<P, S> {
    sessions: SessionManager<P, S>,
    policies: PolicyTable,
}

impl<P, S> AccessGuard<P, S>
where
    P: PrincipalStore,
    S: SessionStore,
{
    pub fn new(sessions: SessionManager<P, S>, policies: PolicyTable) -> Self {
        Self { sessions, policies }
    }

    pub fn sessions(&self) -> &SessionManager<P, S> {
        &self.sessions
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Decide whether the bearer of `token` may access `path`.
    pub fn authorize(
        &self,
        token: Option<&SessionToken>,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessGrant, AuthError> {
        let Some(token) = token else {
            tracing::warn!(path, "denied: no session token");
            return Err(AuthError::Unauthenticated);
        };

        let principal = self.sessions.resolve(token, now).map_err(|e| {
            tracing::warn!(path, "denied: invalid or expired session");
            e
        })?;

        let role = match resolve_role(&principal) {
            Ok(role) => role,
            Err(e) => {
                // Data-integrity problem, not a normal denial: page operators.
                tracing::error!(principal_id = %principal.id, path, "denied: principal has no usable role");
                return Err(e);
            }
        };

        let Some((policy, params)) = self.policies.match_path(path) else {
            tracing::warn!(principal_id = %principal.id, path, "denied: no route policy (default deny)");
            return Err(AuthError::Forbidden);
        };

        if !policy.allows(role) {
            tracing::warn!(
                principal_id = %principal.id,
                %role,
                path,
                pattern = policy.pattern.as_str(),
                "denied: role not allowed on route"
            );
            return Err(AuthError::Forbidden);
        }

        if let OwnershipRule::SelfOnly { exempt } = &policy.ownership {
            if !exempt.contains(&role) {
                let target = params
                    .get(EMPLOYEE_ID_PARAM)
                    .and_then(|raw| EmployeeId::from_str(raw).ok());
                let owns = match (&target, &principal.linked_employee_id) {
                    (Some(target), Some(own)) => target == own,
                    _ => false,
                };
                if !owns {
                    tracing::warn!(
                        principal_id = %principal.id,
                        %role,
                        path,
                        "denied: ownership check failed"
                    );
                    return Err(AuthError::Forbidden);
                }
            }
        }

        tracing::debug!(principal_id = %principal.id, %role, path, "allowed");
        Ok(AccessGrant {
            principal_id: principal.id,
            role,
            linked_employee_id: principal.linked_employee_id.clone(),
            matched_pattern: policy.pattern.as_str().to_string(),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::{Password, hash_password};
    use crate::principal::Principal;
    use crate::session::{InMemorySessionStore, SessionConfig};
    use crate::store::InMemoryPrincipalStore;
    use std::sync::Arc;

    type Guard = AccessGuard<Arc<InMemoryPrincipalStore>, Arc<InMemorySessionStore>>;

    fn guard() -> (Guard, Arc<InMemoryPrincipalStore>) {
        let principals = Arc::new(InMemoryPrincipalStore::new());
        let sessions = SessionManager::new(
            principals.clone(),
            Arc::new(InMemorySessionStore::new()),
            SessionConfig::default(),
        );
        (AccessGuard::new(sessions, PolicyTable::standard()), principals)
    }

    fn login(guard: &Guard, principals: &InMemoryPrincipalStore, p: Principal) -> SessionToken {
        let username = p.username.clone();
        principals.insert(p).unwrap();
        guard
            .sessions()
            .authenticate(&username, &Password::new("guard-test-pw-1"), Utc::now())
            .unwrap()
            .token
    }

    fn pw() -> crate::password::CredentialHash {
        hash_password(&Password::new("guard-test-pw-1")).unwrap()
    }

    #[test]
    fn missing_token_is_unauthenticated() {
        let (guard, _) = guard();
        assert_eq!(
            guard.authorize(None, "/", Utc::now()).unwrap_err(),
            AuthError::Unauthenticated
        );
    }

    #[test]
    fn bogus_token_is_unauthenticated() {
        let (guard, _) = guard();
        let token = SessionToken::from_string("forged");
        assert_eq!(
            guard.authorize(Some(&token), "/", Utc::now()).unwrap_err(),
            AuthError::Unauthenticated
        );
    }

    #[test]
    fn employee_reaches_only_own_records() {
        let (guard, principals) = guard();
        let token = login(
            &guard,
            &principals,
            Principal::new_employee("emp-007", pw(), EmployeeId::from_sequence(7)),
        );

        let grant = guard
            .authorize(Some(&token), "/employees/EMP-007/dashboard/", Utc::now())
            .unwrap();
        assert_eq!(grant.role, Role::Employee);
        assert_eq!(grant.params.get("employee_id").unwrap(), "EMP-007");

        assert_eq!(
            guard
                .authorize(Some(&token), "/employees/EMP-008/dashboard/", Utc::now())
                .unwrap_err(),
            AuthError::Forbidden
        );
        assert_eq!(
            guard
                .authorize(Some(&token), "/employees/directory/", Utc::now())
                .unwrap_err(),
            AuthError::Forbidden
        );
        assert_eq!(
            guard
                .authorize(Some(&token), "/manage/employees/EMP-007/general/", Utc::now())
                .unwrap_err(),
            AuthError::Forbidden
        );
    }

    #[test]
    fn hr_browses_any_employee_without_ownership() {
        let (guard, principals) = guard();
        let token = login(&guard, &principals, Principal::new_hr("hr.sana", pw()));

        // HR has no linked employee id; the exemption in the table lets it through.
        for path in [
            "/employees/directory/",
            "/employees/EMP-042/dashboard/",
            "/employees/EMP-042/payslips/9/",
            "/manage/employees/EMP-042/payroll/",
        ] {
            let grant = guard.authorize(Some(&token), path, Utc::now()).unwrap();
            assert_eq!(grant.role, Role::Hr, "on {path}");
        }

        assert_eq!(
            guard
                .authorize(Some(&token), "/admin/", Utc::now())
                .unwrap_err(),
            AuthError::Forbidden
        );
    }

    #[test]
    fn super_admin_is_confined_to_provisioning_routes() {
        let (guard, principals) = guard();
        let token = login(&guard, &principals, Principal::new_super_admin("root", pw()));

        assert!(guard.authorize(Some(&token), "/admin/", Utc::now()).is_ok());
        assert!(guard.authorize(Some(&token), "/hr/create/", Utc::now()).is_ok());
        assert!(guard.authorize(Some(&token), "/", Utc::now()).is_ok());

        // No ownership bypass onto data routes: they simply exclude the role.
        for path in [
            "/employees/directory/",
            "/employees/EMP-001/dashboard/",
            "/manage/employees/EMP-001/general/",
        ] {
            assert_eq!(
                guard.authorize(Some(&token), path, Utc::now()).unwrap_err(),
                AuthError::Forbidden,
                "on {path}"
            );
        }
    }

    #[test]
    fn unmatched_path_is_default_deny() {
        let (guard, principals) = guard();
        let token = login(&guard, &principals, Principal::new_hr("hr.sana", pw()));
        assert_eq!(
            guard
                .authorize(Some(&token), "/internal/debug/", Utc::now())
                .unwrap_err(),
            AuthError::Forbidden
        );
    }

    #[test]
    fn unassigned_role_is_surfaced_distinctly() {
        let (guard, principals) = guard();
        // Staff flag without a group: no rule matches.
        let mut p = Principal::new_super_admin("odd.flags", pw());
        p.is_superuser = false;
        let token = login(&guard, &principals, p);

        assert!(matches!(
            guard.authorize(Some(&token), "/", Utc::now()).unwrap_err(),
            AuthError::UnassignedRole(_)
        ));
    }

    #[test]
    fn expired_session_is_unauthenticated_at_the_guard() {
        let (guard, principals) = guard();
        let token = login(&guard, &principals, Principal::new_hr("hr.sana", pw()));

        let later = Utc::now() + chrono::Duration::hours(13);
        assert_eq!(
            guard
                .authorize(Some(&token), "/employees/directory/", later)
                .unwrap_err(),
            AuthError::Unauthenticated
        );
    }
}
