//! Super-admin provisioning surface.
//!
//! The admin panel itself is out of scope; `/admin/` is a stub. What lives
//! here is the one provisioning operation the role table grants the super
//! admin: creating HR staff accounts.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use staffgate_auth::{AuthError, PrincipalStore};

use crate::app::{AppServices, errors};
use crate::context::AccessContext;

#[derive(Debug, Deserialize)]
pub struct CreateHrRequest {
    pub username: String,
}

/// GET /admin/ — admin panel stub.
pub async fn panel(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccessContext>,
) -> axum::response::Response {
    Json(serde_json::json!({
        "panel": "admin",
        "role": ctx.role().as_str(),
        "accounts": services.principals.len(),
    }))
    .into_response()
}

/// POST /hr/create/ — issue an HR staff account.
///
/// The temporary password appears in this response and nowhere else.
pub async fn create_hr(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccessContext>,
    Json(req): Json<CreateHrRequest>,
) -> axum::response::Response {
    let Some(actor) = services.principals.get(&ctx.principal_id()) else {
        return errors::auth_error_response(&AuthError::Unauthenticated);
    };

    match services.issuer.create_hr_account(&actor, &req.username) {
        Ok(cred) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "username": cred.username,
                "temporary_password": cred.password.as_str(),
            })),
        )
            .into_response(),
        Err(err) => errors::auth_error_response(&err),
    }
}
