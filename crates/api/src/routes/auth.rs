//! Authentication routes -- mounted at `/auth`.
//!
//! ```text
//! POST /login      login (public)
//! GET  /me         the authenticated user's record
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}
