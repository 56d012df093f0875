//! Hover measurement routes -- mounted at `/hover`.
//!
//! ```text
//! GET /authorize                            authorize (returns the OAuth URL)
//! GET /callback?code=...                    callback (stores the token set)
//! GET /jobs?q=...                           search_jobs
//! GET /models/{model_id}/measurements       fetch_measurements
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::hover;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authorize", get(hover::authorize))
        .route("/callback", get(hover::callback))
        .route("/jobs", get(hover::search_jobs))
        .route(
            "/models/{model_id}/measurements",
            get(hover::fetch_measurements),
        )
}
