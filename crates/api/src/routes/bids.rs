//! Bid routes -- mounted at `/bids`.
//!
//! ```text
//! GET    /                              list_bids
//! POST   /                              create_bid
//! GET    /{id}                          get_bid (with current version + items)
//! PUT    /{id}                          update_bid
//! GET    /{id}/versions                 list_versions
//! POST   /{id}/versions                 create_version
//! PUT    /{id}/versions/{version_id}    update_version
//! GET    /{id}/line-items               list_line_items (current version)
//! PUT    /{id}/line-items               reconcile_line_items
//! POST   /{id}/convert                  convert_bid
//! POST   /{id}/pdf                      bid_pdf
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::bids;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bids::list_bids).post(bids::create_bid))
        .route("/{id}", get(bids::get_bid).put(bids::update_bid))
        .route(
            "/{id}/versions",
            get(bids::list_versions).post(bids::create_version),
        )
        .route("/{id}/versions/{version_id}", put(bids::update_version))
        .route(
            "/{id}/line-items",
            get(bids::list_line_items).put(bids::reconcile_line_items),
        )
        .route("/{id}/convert", post(bids::convert_bid))
        .route("/{id}/pdf", post(bids::bid_pdf))
}
