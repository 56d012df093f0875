pub mod admin;
pub mod auth;
pub mod bids;
pub mod crm;
pub mod health;
pub mod hover;
pub mod plans;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                     login (public)
/// /auth/me                        the authenticated user
///
/// /bids                           bid CRUD, versions, line items,
/// /bids/{id}/convert              conversion and PDF rendering
///
/// /plans                          plan CRUD, line items, send and PDF
///
/// /price-list, /terms/active,     reference-data reads
/// /tax-rates, /payment-notes,
/// /start-windows
///
/// /admin/...                      reference-data writes + users (admin only)
///
/// /crm/accounts                   Contractors Cloud lookups
/// /hover/...                      Hover OAuth + job/measurement lookups
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/bids", bids::router())
        .nest("/plans", plans::router())
        .merge(admin::reference_router())
        .nest("/admin", admin::admin_router())
        .nest("/crm", crm::router())
        .nest("/hover", hover::router())
}
