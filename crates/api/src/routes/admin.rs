//! Reference data and administration routes.
//!
//! Two routers: `reference_router()` exposes authenticated reads at the
//! API root, `admin_router()` exposes admin-only writes under `/admin`.
//!
//! ```text
//! REFERENCE (any authenticated user):
//! GET    /price-list                     list_price_items
//! GET    /terms/active                   active_terms
//! GET    /tax-rates                      list_tax_rates
//! GET    /payment-notes                  list_payment_notes
//! GET    /start-windows                  list_start_windows
//!
//! ADMIN (admin role required):
//! POST   /price-list                     create_price_item
//! PUT    /price-list/{id}                update_price_item
//! DELETE /price-list/{id}                deactivate_price_item
//! GET    /terms                          list_terms
//! POST   /terms                          create_terms
//! POST   /terms/{id}/activate            activate_terms
//! PUT    /tax-rates                      upsert_tax_rate
//! POST   /payment-notes                  create_payment_note
//! DELETE /payment-notes/{id}             delete_payment_note
//! POST   /start-windows                  create_start_window
//! DELETE /start-windows/{id}             delete_start_window
//! GET    /users                          list_users
//! POST   /users                          create_user
//! PUT    /users/{id}                     update_user
//! ```

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Authenticated reference-data reads -- mounted at the API root.
pub fn reference_router() -> Router<AppState> {
    Router::new()
        .route("/price-list", get(admin::list_price_items))
        .route("/terms/active", get(admin::active_terms))
        .route("/tax-rates", get(admin::list_tax_rates))
        .route("/payment-notes", get(admin::list_payment_notes))
        .route("/start-windows", get(admin::list_start_windows))
}

/// Admin-only writes -- mounted at `/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/price-list", post(admin::create_price_item))
        .route(
            "/price-list/{id}",
            put(admin::update_price_item).delete(admin::deactivate_price_item),
        )
        .route("/terms", get(admin::list_terms).post(admin::create_terms))
        .route("/terms/{id}/activate", post(admin::activate_terms))
        .route("/tax-rates", put(admin::upsert_tax_rate))
        .route("/payment-notes", post(admin::create_payment_note))
        .route("/payment-notes/{id}", delete(admin::delete_payment_note))
        .route("/start-windows", post(admin::create_start_window))
        .route("/start-windows/{id}", delete(admin::delete_start_window))
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{id}", put(admin::update_user))
}
