//! Handlers proxying Contractors Cloud lookups.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ridgeline_crm::contractors_cloud::ContractorsCloudClient;
use ridgeline_crm::CrmError;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AccountSearchParams {
    pub q: String,
}

fn cc_client(state: &AppState) -> AppResult<&ContractorsCloudClient> {
    state
        .services
        .contractors_cloud
        .as_deref()
        .ok_or(AppError::Crm(CrmError::NotConfigured("contractors cloud")))
}

// ---------------------------------------------------------------------------
// GET /crm/accounts?q=...
// ---------------------------------------------------------------------------

/// Search CRM accounts by free text, or by job number when the query is
/// exactly six digits. Matches come back enriched with job numbers.
pub async fn search_accounts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AccountSearchParams>,
) -> AppResult<impl IntoResponse> {
    let accounts = cc_client(&state)?.search_accounts(&params.q).await?;
    Ok(Json(DataResponse { data: accounts }))
}

// ---------------------------------------------------------------------------
// GET /crm/accounts/{account_id}/projects
// ---------------------------------------------------------------------------

/// List the projects under a CRM account.
pub async fn list_projects(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let projects = cc_client(&state)?.list_projects(&account_id).await?;
    Ok(Json(DataResponse { data: projects }))
}
