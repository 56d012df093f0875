//! Handlers for the Hover measurement integration.
//!
//! Hover uses an OAuth authorization-code flow. Token sets are stored
//! in the database; an expired access token is refreshed transparently
//! before any proxied call.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ridgeline_crm::hover::{HoverClient, TokenSet};
use ridgeline_crm::CrmError;
use ridgeline_db::repositories::HoverTokenRepo;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct JobSearchParams {
    pub q: String,
}

fn hover_client(state: &AppState) -> AppResult<&HoverClient> {
    state
        .services
        .hover
        .as_deref()
        .ok_or(AppError::Crm(CrmError::NotConfigured("hover")))
}

/// A usable access token: the stored one if still valid, otherwise a
/// refreshed set which is persisted before use. Concurrent refreshes
/// may both insert; either resulting row works.
async fn usable_access_token(state: &AppState, client: &HoverClient) -> AppResult<String> {
    let stored = HoverTokenRepo::latest(&state.pool)
        .await?
        .ok_or_else(|| AppError::Crm(CrmError::NoToken("Hover is not authorized".into())))?;

    let current = TokenSet {
        access_token: stored.access_token,
        refresh_token: stored.refresh_token,
        expires_at: stored.expires_at,
    };
    if current.is_valid() {
        return Ok(current.access_token);
    }

    let refreshed = client.refresh(&current.refresh_token).await?;
    HoverTokenRepo::store(
        &state.pool,
        &refreshed.access_token,
        &refreshed.refresh_token,
        refreshed.expires_at,
    )
    .await?;
    tracing::debug!("Hover access token refreshed");
    Ok(refreshed.access_token)
}

// ---------------------------------------------------------------------------
// GET /hover/authorize
// ---------------------------------------------------------------------------

/// The URL the frontend should redirect the user to for authorization.
pub async fn authorize(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let client = hover_client(&state)?;
    let url = client.authorize_url(&Uuid::new_v4().to_string());
    Ok(Json(DataResponse {
        data: serde_json::json!({ "authorize_url": url }),
    }))
}

// ---------------------------------------------------------------------------
// GET /hover/callback?code=...
// ---------------------------------------------------------------------------

/// OAuth callback: exchange the code and persist the token set.
pub async fn callback(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<impl IntoResponse> {
    let client = hover_client(&state)?;
    let tokens = client.exchange_code(&params.code).await?;
    HoverTokenRepo::store(
        &state.pool,
        &tokens.access_token,
        &tokens.refresh_token,
        tokens.expires_at,
    )
    .await?;
    tracing::info!("Hover authorization completed");
    Ok(Json(DataResponse {
        data: serde_json::json!({ "authorized": true }),
    }))
}

// ---------------------------------------------------------------------------
// GET /hover/jobs?q=...
// ---------------------------------------------------------------------------

/// Search Hover jobs by free text.
pub async fn search_jobs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> AppResult<impl IntoResponse> {
    let client = hover_client(&state)?;
    let token = usable_access_token(&state, client).await?;
    let jobs = client.search_jobs(&token, &params.q).await?;
    Ok(Json(DataResponse { data: jobs }))
}

// ---------------------------------------------------------------------------
// GET /hover/models/{model_id}/measurements
// ---------------------------------------------------------------------------

/// Fetch the measurement payload for a model, passed through opaquely.
pub async fn fetch_measurements(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(model_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let client = hover_client(&state)?;
    let token = usable_access_token(&state, client).await?;
    let measurements = client.fetch_measurements(&token, model_id).await?;
    Ok(Json(DataResponse { data: measurements }))
}
