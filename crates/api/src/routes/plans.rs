//! Production plan routes -- mounted at `/plans`.
//!
//! ```text
//! GET    /                     list_plans
//! POST   /                     create_plan
//! GET    /{id}                 get_plan (with line items)
//! PUT    /{id}                 update_plan (sign audit on signed transition)
//! GET    /{id}/line-items      list_line_items
//! PUT    /{id}/line-items      reconcile_line_items
//! POST   /{id}/send            send_plan (render, email, CRM file, mark sent)
//! POST   /{id}/pdf             plan_pdf
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::plans;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(plans::list_plans).post(plans::create_plan))
        .route("/{id}", get(plans::get_plan).put(plans::update_plan))
        .route(
            "/{id}/line-items",
            get(plans::list_line_items).put(plans::reconcile_line_items),
        )
        .route("/{id}/send", post(plans::send_plan))
        .route("/{id}/pdf", post(plans::plan_pdf))
}
