//! Login, logout, and self-service password change.

use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use serde::Deserialize;

use staffgate_auth::{AuthError, Password, PrincipalStore, SessionToken, resolve_role};

use crate::app::{AppServices, errors};
use crate::context::AccessContext;
use crate::middleware::SESSION_COOKIE;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Password,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Password,
    pub new_password: Password,
}

/// POST /login/ — authenticate and redirect by role.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> axum::response::Response {
    let session = match services
        .sessions()
        .authenticate(&req.username, &req.password, Utc::now())
    {
        Ok(session) => session,
        Err(err) => return errors::auth_error_response(&err),
    };

    // Pick the landing page from the effective role. A principal that
    // authenticates but resolves to no role gets no session.
    let landing = match services.principals.get(&session.principal_id) {
        Some(principal) => match resolve_role(&principal) {
            Ok(role) => role.landing_path(principal.linked_employee_id.as_ref()),
            Err(err) => {
                services.sessions().revoke(&session.token);
                return errors::auth_error_response(&err);
            }
        },
        None => {
            services.sessions().revoke(&session.token);
            return errors::auth_error_response(&AuthError::Unauthenticated);
        }
    };

    let cookie = Cookie::build((SESSION_COOKIE, session.token.as_str().to_string()))
        .path("/")
        .http_only(true)
        .build();

    (jar.add(cookie), Redirect::to(&landing)).into_response()
}

/// POST /logout/ — revoke the session if one is presented. Idempotent.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
) -> axum::response::Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        services
            .sessions()
            .revoke(&SessionToken::from_string(cookie.value()));
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Redirect::to("/login/")).into_response()
}

/// GET / — authenticated landing stub.
pub async fn index(Extension(ctx): Extension<AccessContext>) -> axum::response::Response {
    Json(serde_json::json!({
        "principal_id": ctx.principal_id().to_string(),
        "role": ctx.role().as_str(),
    }))
    .into_response()
}

/// POST /change-password/ — re-verify, rotate, revoke every session.
pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccessContext>,
    jar: CookieJar,
    Json(req): Json<ChangePasswordRequest>,
) -> axum::response::Response {
    if let Err(err) = services.sessions().change_credential(
        &ctx.principal_id(),
        &req.old_password,
        &req.new_password,
    ) {
        return errors::auth_error_response(&err);
    }

    // The caller's own session is gone too; drop the cookie.
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        Json(serde_json::json!({ "status": "password_changed" })),
    )
        .into_response()
}
