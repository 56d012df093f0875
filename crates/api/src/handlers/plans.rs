//! Handlers for production plans and their line items.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use ridgeline_core::error::CoreError;
use ridgeline_core::status::PlanStatus;
use ridgeline_core::trade::SectionFlags;
use ridgeline_core::types::DbId;
use ridgeline_db::models::plan::{CreatePlan, ProductionPlan, SignatureAudit, UpdatePlan};
use ridgeline_db::models::plan_line_item::{PlanItemInput, PlanLineItem};
use ridgeline_db::repositories::{PlanLineItemRepo, PlanRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::pipeline::{self, PdfDelivery};
use crate::response::DataResponse;
use crate::state::AppState;

/// A plan together with its line items.
#[derive(Debug, Serialize)]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: ProductionPlan,
    pub line_items: Vec<PlanLineItem>,
}

async fn ensure_plan_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<ProductionPlan> {
    PlanRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProductionPlan",
            id,
        }))
}

fn section_flags(plan: &ProductionPlan) -> SectionFlags {
    SectionFlags {
        has_roof: plan.has_roof,
        has_siding: plan.has_siding,
        has_guttering: plan.has_guttering,
        has_windows: plan.has_windows,
        has_small_jobs: plan.has_small_jobs,
    }
}

// ---------------------------------------------------------------------------
// GET /plans
// ---------------------------------------------------------------------------

/// List all production plans, newest first.
pub async fn list_plans(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let plans = PlanRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: plans }))
}

// ---------------------------------------------------------------------------
// POST /plans
// ---------------------------------------------------------------------------

/// Create a production plan directly (not via bid conversion).
pub async fn create_plan(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePlan>,
) -> AppResult<impl IntoResponse> {
    if input.client_name.trim().is_empty() {
        return Err(CoreError::Validation("client_name must not be empty".into()).into());
    }

    let plan = PlanRepo::create(&state.pool, &input, auth.user_id).await?;
    tracing::info!(id = plan.id, "Production plan created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

// ---------------------------------------------------------------------------
// GET /plans/{id}
// ---------------------------------------------------------------------------

/// Fetch a plan with its line items. The two reads run concurrently.
pub async fn get_plan(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (plan, line_items) = tokio::try_join!(
        PlanRepo::find_by_id(&state.pool, id),
        PlanLineItemRepo::list_for_plan(&state.pool, id),
    )?;

    let plan = plan.ok_or(AppError::Core(CoreError::NotFound {
        entity: "ProductionPlan",
        id,
    }))?;

    Ok(Json(DataResponse {
        data: PlanDetail { plan, line_items },
    }))
}

// ---------------------------------------------------------------------------
// PUT /plans/{id}
// ---------------------------------------------------------------------------

/// Partially update a plan.
///
/// A status change to `signed` captures the signature audit (client IP,
/// user agent, timestamp) server-side at the moment of transition. Any
/// other update leaves the audit columns untouched, and a plan already
/// signed can never be re-signed.
pub async fn update_plan(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
    Json(input): Json<UpdatePlan>,
) -> AppResult<impl IntoResponse> {
    let plan = ensure_plan_exists(&state.pool, id).await?;

    let mut audit: Option<SignatureAudit> = None;
    if let Some(next) = input.status {
        if next != plan.status && !plan.status.can_transition_to(next) {
            return Err(CoreError::Validation(format!(
                "plan cannot transition from {:?} to {:?}",
                plan.status, next
            ))
            .into());
        }
        if next == PlanStatus::Signed && plan.status != PlanStatus::Signed {
            audit = Some(SignatureAudit {
                ip: pipeline::client_ip(&headers),
                user_agent: headers
                    .get(axum::http::header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
            });
        }
    }

    let updated = PlanRepo::update(&state.pool, id, &input, audit.as_ref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProductionPlan",
            id,
        }))?;

    if audit.is_some() {
        tracing::info!(id, "Production plan signed");
    }
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /plans/{id}/line-items
// ---------------------------------------------------------------------------

/// The plan's line items, ordered by section then sort order.
pub async fn list_line_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_plan_exists(&state.pool, id).await?;
    let items = PlanLineItemRepo::list_for_plan(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// PUT /plans/{id}/line-items
// ---------------------------------------------------------------------------

/// Replace the plan's line items with the submitted list.
///
/// Every submitted item must belong to one of the plan's active
/// sections; a single out-of-section item rejects the whole request
/// before any write.
pub async fn reconcile_line_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(incoming): Json<Vec<PlanItemInput>>,
) -> AppResult<impl IntoResponse> {
    let plan = ensure_plan_exists(&state.pool, id).await?;

    let flags = section_flags(&plan);
    for item in &incoming {
        if !flags.allows(&item.section) {
            return Err(CoreError::Validation(format!(
                "section {:?} is not active on this plan",
                item.section
            ))
            .into());
        }
    }

    let items = PlanLineItemRepo::reconcile(&state.pool, id, incoming).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /plans/{id}/send
// ---------------------------------------------------------------------------

/// Finalize and send the plan: render its PDF, email it to the client
/// and the acting salesperson, best-effort file it with the linked CRM
/// project, and mark the plan sent.
pub async fn send_plan(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = pipeline::send_plan(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /plans/{id}/pdf
// ---------------------------------------------------------------------------

/// Render the plan to a PDF without sending it.
pub async fn plan_pdf(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (plan, items) = tokio::try_join!(
        PlanRepo::find_by_id(&state.pool, id),
        PlanLineItemRepo::list_for_plan(&state.pool, id),
    )?;
    let plan = plan.ok_or(AppError::Core(CoreError::NotFound {
        entity: "ProductionPlan",
        id,
    }))?;

    let terms = ridgeline_db::repositories::TermsRepo::active(&state.pool).await?;
    let payload = pipeline::build_plan_document(&plan, &items, terms.as_ref());
    let bytes = pipeline::render_pdf(&state, &payload).await?;

    let filename = format!("production-plan-{id}.pdf");
    let key = pipeline::artifact_key("plans", id);
    match pipeline::store_or_return(&state, &key, bytes).await {
        PdfDelivery::Url(url) => Ok(Json(DataResponse {
            data: serde_json::json!({ "url": url }),
        })
        .into_response()),
        PdfDelivery::Bytes(bytes) => Ok(pipeline::download_response(&filename, bytes)),
    }
}
