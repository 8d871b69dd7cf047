use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use staffgate_auth::AuthError;
use staffgate_core::DomainError;

/// Map an access-control error to a response.
///
/// The body stays generic on purpose: denials all read "permission denied"
/// and the internal cause (ownership mismatch, unassigned role, unmatched
/// route) lives only in the audit log.
pub fn auth_error_response(err: &AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid username or password",
        ),
        AuthError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        AuthError::Forbidden | AuthError::UnassignedRole(_) => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "permission denied")
        }
        AuthError::DuplicateEmployee(username) => json_error(
            StatusCode::CONFLICT,
            "duplicate_employee",
            format!("an account named '{username}' already exists"),
        ),
        AuthError::WeakPassword(reason) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "weak_password", *reason)
        }
        AuthError::Internal(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal error",
        ),
    }
}

pub fn domain_error_response(err: &DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg.clone())
        }
        DomainError::InvariantViolation(msg) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invariant_violation",
            msg.clone(),
        ),
        DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg.clone())
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg.clone()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
