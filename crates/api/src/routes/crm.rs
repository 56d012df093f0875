//! Contractors Cloud routes -- mounted at `/crm`.
//!
//! ```text
//! GET /accounts?q=...                    search_accounts
//! GET /accounts/{account_id}/projects    list_projects
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::crm;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(crm::search_accounts))
        .route("/accounts/{account_id}/projects", get(crm::list_projects))
}
