use std::sync::Arc;

use axum::{extract::Extension, middleware::Next, response::Response};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use staffgate_auth::SessionToken;

use crate::app::{AppServices, errors};
use crate::context::AccessContext;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sg_session";

/// Guard middleware for protected routes.
///
/// Runs the access guard against the request path before any handler: on
/// allow, an [`AccessContext`] lands in the request extensions; on deny, the
/// request is answered here with a generic 401/403 body. Public routes
/// (`/login/`, `/logout/`, `/health`) are mounted outside this layer.
pub async fn guard_middleware(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| SessionToken::from_string(cookie.value()));

    match services
        .guard
        .authorize(token.as_ref(), req.uri().path(), Utc::now())
    {
        Ok(grant) => {
            req.extensions_mut().insert(AccessContext::from(grant));
            next.run(req).await
        }
        Err(err) => errors::auth_error_response(&err),
    }
}
