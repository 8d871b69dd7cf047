//! HR manage views (`/manage/employees/<id>/...`): edit surfaces for
//! employee data. The forms themselves are out of scope; these stubs mark
//! the policy boundary the guard enforces.

use axum::{Json, Router, extract::Path, response::IntoResponse, routing::get};

/// Tabs with an HR edit surface.
const TABS: &[&str] = &["general", "job", "payroll", "documents"];

pub fn router() -> Router {
    let mut router = Router::new();
    for tab in TABS {
        router = router.route(
            &format!("/:employee_id/{tab}/"),
            get(move |Path(employee_id): Path<String>| async move {
                manage_view(&employee_id, tab, "view")
            })
            .post(move |Path(employee_id): Path<String>| async move {
                manage_view(&employee_id, tab, "update")
            }),
        );
    }
    router
}

fn manage_view(employee_id: &str, tab: &str, mode: &str) -> axum::response::Response {
    Json(serde_json::json!({
        "employee_id": employee_id,
        "tab": tab,
        "mode": mode,
    }))
    .into_response()
}
