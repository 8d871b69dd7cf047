//! Application wiring: shared services and the router.

pub mod errors;
pub mod routes;

use std::sync::Arc;

use axum::{Extension, Router, http::StatusCode, routing::get, routing::post};

use staffgate_auth::{
    AccessGuard, AuthError, InMemoryPrincipalStore, InMemorySessionStore, OnboardingIssuer,
    Password, PolicyTable, Principal, PrincipalId, SessionConfig, SessionManager, check_strength,
    hash_password,
};
use staffgate_employees::InMemoryDirectory;

type Principals = Arc<InMemoryPrincipalStore>;
type Sessions = Arc<InMemorySessionStore>;

pub type AppSessionManager = SessionManager<Principals, Sessions>;
pub type AppGuard = AccessGuard<Principals, Sessions>;

/// Shared application services, wired once at startup.
pub struct AppServices {
    pub principals: Principals,
    pub directory: Arc<InMemoryDirectory>,
    pub guard: AppGuard,
    pub issuer: OnboardingIssuer<Principals>,
}

impl AppServices {
    pub fn new(session_config: SessionConfig) -> Self {
        let principals: Principals = Arc::new(InMemoryPrincipalStore::new());
        let sessions: Sessions = Arc::new(InMemorySessionStore::new());
        let manager = SessionManager::new(principals.clone(), sessions, session_config);
        let guard = AccessGuard::new(manager, PolicyTable::standard());
        let issuer = OnboardingIssuer::new(principals.clone());

        Self {
            principals,
            directory: Arc::new(InMemoryDirectory::new()),
            guard,
            issuer,
        }
    }

    pub fn sessions(&self) -> &AppSessionManager {
        self.guard.sessions()
    }

    /// Seed the super admin account (setup-time provisioning).
    pub fn create_super_admin(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<PrincipalId, AuthError> {
        check_strength(password)?;
        let principal = Principal::new_super_admin(username, hash_password(password)?);
        let id = principal.id;
        use staffgate_auth::PrincipalStore;
        self.principals
            .insert(principal)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(id)
    }
}

/// Build the application router.
///
/// Public routes (login/logout/health) sit outside the guard layer; every
/// other route is decided by the policy table before its handler runs.
pub fn build_app(services: Arc<AppServices>) -> Router {
    let protected = Router::new()
        .route("/", get(routes::session::index))
        .route("/change-password/", post(routes::session::change_password))
        .route("/admin/", get(routes::admin::panel))
        .route("/hr/create/", post(routes::admin::create_hr))
        .nest("/employees", routes::employees::router())
        .nest("/manage/employees", routes::manage::router())
        .layer(axum::middleware::from_fn(crate::middleware::guard_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/login/", post(routes::session::login))
        .route("/logout/", post(routes::session::logout))
        .merge(protected)
        .layer(Extension(services))
}

async fn health() -> StatusCode {
    StatusCode::OK
}
