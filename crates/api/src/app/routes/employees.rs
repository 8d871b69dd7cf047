//! Employee routes: directory, onboarding, and the per-employee tab stubs.
//!
//! The guard middleware has already enforced role and ownership by the time
//! any handler here runs. Tab handlers are data-surface stubs: the actual
//! payroll/document/schedule content belongs to collaborating services.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use staffgate_auth::{AuthError, PrincipalStore};
use staffgate_core::{DomainError, EmployeeId};
use staffgate_employees::{EmployeeDirectory, NewEmployee};

use crate::app::{AppServices, errors};
use crate::context::AccessContext;

/// Tabs on the employee detail page.
const TABS: &[&str] = &[
    "dashboard",
    "general",
    "job",
    "payroll",
    "payslips",
    "documents",
    "attendance",
    "schedule",
];

pub fn router() -> Router {
    let mut router = Router::new()
        .route("/directory/", get(directory))
        .route("/onboarding/", post(onboard))
        .route("/:employee_id/payslips/:payroll_id/", get(payslip_detail));

    for tab in TABS {
        router = router.route(
            &format!("/:employee_id/{tab}/"),
            get(move |Path(employee_id): Path<String>| async move { tab_view(&employee_id, tab) }),
        );
    }
    router
}

/// GET /employees/directory/ — all employee profiles (HR only, per policy).
async fn directory(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    Json(serde_json::json!({ "employees": services.directory.list() })).into_response()
}

#[derive(Debug, Deserialize)]
struct OnboardRequest {
    /// Explicit id (re-onboarding imports); omitted for the next in sequence.
    employee_id: Option<EmployeeId>,
    #[serde(flatten)]
    profile: NewEmployee,
}

/// Attempts to claim an auto-assigned id before giving up on a collision.
const ID_ASSIGN_RETRIES: usize = 5;

/// POST /employees/onboarding/ — create the employee record and its account.
///
/// Responds with the one-time credential display: the only surface where a
/// plaintext password leaves the system. It is not logged and not stored.
///
/// The profile insert and the account issuance are all-or-nothing: when the
/// account cannot be created, the profile insert is undone so the directory
/// never lists an employee without an account.
async fn onboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccessContext>,
    Json(req): Json<OnboardRequest>,
) -> axum::response::Response {
    if let Err(err) = req.profile.validate() {
        return errors::domain_error_response(&err);
    }

    let Some(actor) = services.principals.get(&ctx.principal_id()) else {
        return errors::auth_error_response(&AuthError::Unauthenticated);
    };

    let explicit = req.employee_id.is_some();
    let mut employee_id = req
        .employee_id
        .unwrap_or_else(|| services.directory.next_employee_id());

    // An auto-assigned id can be claimed by a concurrent onboarding between
    // the sequence read and the insert; a collision then just means someone
    // else got there first, so take the next id and try again.
    let mut attempts = 0;
    loop {
        match services
            .directory
            .insert(req.profile.clone().into_profile(employee_id.clone()))
        {
            Ok(()) => break,
            Err(DomainError::Conflict(_)) if !explicit && attempts < ID_ASSIGN_RETRIES => {
                attempts += 1;
                employee_id = services.directory.next_employee_id();
            }
            Err(err) => return errors::domain_error_response(&err),
        }
    }

    match services.issuer.onboard_employee(&actor, &employee_id) {
        Ok(cred) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "employee_id": employee_id,
                "username": cred.username,
                "temporary_password": cred.password.as_str(),
            })),
        )
            .into_response(),
        Err(err) => {
            services.directory.remove(&employee_id);
            errors::auth_error_response(&err)
        }
    }
}

async fn payslip_detail(
    Path((employee_id, payroll_id)): Path<(String, String)>,
) -> axum::response::Response {
    Json(serde_json::json!({
        "employee_id": employee_id,
        "tab": "payslips",
        "payroll_id": payroll_id,
    }))
    .into_response()
}

fn tab_view(employee_id: &str, tab: &str) -> axum::response::Response {
    Json(serde_json::json!({
        "employee_id": employee_id,
        "tab": tab,
    }))
    .into_response()
}
