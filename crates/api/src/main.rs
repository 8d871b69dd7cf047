use std::sync::Arc;

use staffgate_api::app::{AppServices, build_app};
use staffgate_auth::{Password, SessionConfig};

#[tokio::main]
async fn main() {
    staffgate_observability::init();

    let ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(12);

    let admin_username =
        std::env::var("STAFFGATE_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let admin_password = std::env::var("STAFFGATE_ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("STAFFGATE_ADMIN_PASSWORD not set; using insecure dev default");
        "admin-dev-7890".to_string()
    });

    let services = Arc::new(AppServices::new(SessionConfig::with_ttl_hours(ttl_hours)));
    if let Err(err) = services.create_super_admin(&admin_username, &Password::new(admin_password)) {
        tracing::error!(error = %err, "failed to seed super admin account");
        std::process::exit(1);
    }

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
