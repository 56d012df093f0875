//! Handlers for bids, their versions, and bid line items.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ridgeline_core::convert::{bid_to_plan, BidItemSnapshot, BidSnapshot};
use ridgeline_core::error::CoreError;
use ridgeline_core::types::DbId;
use ridgeline_db::models::bid::{Bid, CreateBid, UpdateBid};
use ridgeline_db::models::bid_line_item::{BidLineItem, LineItemInput};
use ridgeline_db::models::bid_version::{BidVersion, CreateVersion, UpdateVersionMeta};
use ridgeline_db::repositories::{
    BidLineItemRepo, BidRepo, BidVersionRepo, PlanLineItemRepo, PlanRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::pipeline::{self, PdfDelivery};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// A bid together with its current version and that version's line items.
#[derive(Debug, Serialize)]
pub struct BidDetail {
    #[serde(flatten)]
    pub bid: Bid,
    pub current_version: Option<BidVersion>,
    pub line_items: Vec<BidLineItem>,
}

/// Result of a bid-to-plan conversion.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub production_plan_id: DbId,
    /// `false` when the bid was already converted and the existing
    /// plan's identity was returned without any writes.
    pub created: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_bid_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Bid> {
    BidRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Bid", id }))
}

// ---------------------------------------------------------------------------
// GET /bids
// ---------------------------------------------------------------------------

/// List all bids, newest first.
pub async fn list_bids(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let bids = BidRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: bids }))
}

// ---------------------------------------------------------------------------
// POST /bids
// ---------------------------------------------------------------------------

/// Create a bid. Version 1 is created in the same transaction.
pub async fn create_bid(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBid>,
) -> AppResult<impl IntoResponse> {
    if input.client_name.trim().is_empty() {
        return Err(CoreError::Validation("client_name must not be empty".into()).into());
    }

    let bid = BidRepo::create(&state.pool, &input, auth.user_id).await?;
    tracing::info!(id = bid.id, trade = ?bid.trade, "Bid created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: bid })))
}

// ---------------------------------------------------------------------------
// GET /bids/{id}
// ---------------------------------------------------------------------------

/// Fetch a bid with its current version and line items.
pub async fn get_bid(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let bid = ensure_bid_exists(&state.pool, id).await?;

    let current_version = BidVersionRepo::current_for_bid(&state.pool, id).await?;
    let line_items = match &current_version {
        Some(version) => BidLineItemRepo::list_for_version(&state.pool, version.id).await?,
        None => Vec::new(),
    };

    Ok(Json(DataResponse {
        data: BidDetail {
            bid,
            current_version,
            line_items,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /bids/{id}
// ---------------------------------------------------------------------------

/// Partially update a bid. A requested status change is validated
/// against the bid status transition table before any write.
pub async fn update_bid(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBid>,
) -> AppResult<impl IntoResponse> {
    let bid = ensure_bid_exists(&state.pool, id).await?;

    if let Some(next) = input.status {
        if next != bid.status && !bid.status.can_transition_to(next) {
            return Err(CoreError::Validation(format!(
                "bid cannot transition from {:?} to {:?}",
                bid.status, next
            ))
            .into());
        }
    }

    let updated = BidRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Bid", id }))?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /bids/{id}/versions
// ---------------------------------------------------------------------------

/// List every version of a bid, newest first.
pub async fn list_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_bid_exists(&state.pool, id).await?;
    let versions = BidVersionRepo::list_for_bid(&state.pool, id).await?;
    Ok(Json(DataResponse { data: versions }))
}

// ---------------------------------------------------------------------------
// POST /bids/{id}/versions
// ---------------------------------------------------------------------------

/// Supersede the current version and create its successor, carrying
/// pricing and cloned line items forward.
pub async fn create_version(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateVersion>,
) -> AppResult<impl IntoResponse> {
    ensure_bid_exists(&state.pool, id).await?;

    let Some(version) =
        BidVersionRepo::create_new_version(&state.pool, id, input.notes.as_deref()).await?
    else {
        // A current version existing now means we lost a supersede race
        // rather than hitting a version-less bid.
        let message = if BidVersionRepo::current_for_bid(&state.pool, id).await?.is_some() {
            "a concurrent request superseded this version first, retry"
        } else {
            "bid has no current version to supersede"
        };
        return Err(AppError::Core(CoreError::Conflict(message.into())));
    };

    tracing::info!(bid_id = id, version = version.version_number, "Bid version created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

// ---------------------------------------------------------------------------
// PUT /bids/{id}/versions/{version_id}
// ---------------------------------------------------------------------------

/// Update a version's notes or status.
pub async fn update_version(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((id, version_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateVersionMeta>,
) -> AppResult<impl IntoResponse> {
    let version = BidVersionRepo::find_by_id(&state.pool, version_id)
        .await?
        .filter(|v| v.bid_id == id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BidVersion",
            id: version_id,
        }))?;

    if let Some(next) = input.status {
        if next != version.status && !version.status.can_transition_to(next) {
            return Err(CoreError::Validation(format!(
                "version cannot transition from {:?} to {:?}",
                version.status, next
            ))
            .into());
        }
    }

    let updated = BidVersionRepo::update_meta(&state.pool, version_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BidVersion",
            id: version_id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /bids/{id}/line-items
// ---------------------------------------------------------------------------

/// The current version's line items, ordered by section then sort order.
pub async fn list_line_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_bid_exists(&state.pool, id).await?;

    let items = match BidVersionRepo::current_for_bid(&state.pool, id).await? {
        Some(version) => BidLineItemRepo::list_for_version(&state.pool, version.id).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// PUT /bids/{id}/line-items
// ---------------------------------------------------------------------------

/// Replace the current version's line items with the submitted list.
///
/// Persisted rows absent from the list are deleted, rows carrying a
/// persisted id are updated, and the rest are inserted. The response is
/// the fresh, re-read list.
pub async fn reconcile_line_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(incoming): Json<Vec<LineItemInput>>,
) -> AppResult<impl IntoResponse> {
    ensure_bid_exists(&state.pool, id).await?;

    let version = BidVersionRepo::current_for_bid(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("bid has no current version".into()))
        })?;

    let items = BidLineItemRepo::reconcile(&state.pool, version.id, id, incoming).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /bids/{id}/convert
// ---------------------------------------------------------------------------

/// Convert a bid into a production plan.
///
/// A bid converts at most once: when `production_plan_id` is already
/// set the existing plan's identity is returned with zero writes. A bid
/// with no current version still converts, producing a plan with no
/// line items.
pub async fn convert_bid(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let bid = ensure_bid_exists(&state.pool, id).await?;

    if let Some(plan_id) = bid.production_plan_id {
        return Ok((
            StatusCode::OK,
            Json(DataResponse {
                data: ConvertResponse {
                    production_plan_id: plan_id,
                    created: false,
                },
            }),
        ));
    }

    let items = match BidVersionRepo::current_for_bid(&state.pool, id).await? {
        Some(version) => BidLineItemRepo::list_for_version(&state.pool, version.id).await?,
        None => Vec::new(),
    };

    let snapshot = BidSnapshot {
        trade: bid.trade,
        client_name: bid.client_name.clone(),
        client_email: bid.client_email.clone(),
        client_phone: bid.client_phone.clone(),
        client_address: bid.client_address.clone(),
        grand_total: bid.grand_total,
    };
    let item_snapshots: Vec<BidItemSnapshot> = items
        .iter()
        .map(|item| BidItemSnapshot {
            description: item.description.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            line_total: item.line_total,
            price_list_item_id: item.price_list_item_id,
        })
        .collect();

    let (draft, item_drafts) = bid_to_plan(&snapshot, &item_snapshots);

    let plan = PlanRepo::create_from_draft(&state.pool, &draft, auth.user_id).await?;
    PlanLineItemRepo::insert_drafts(&state.pool, plan.id, &item_drafts).await?;

    let linked = BidRepo::link_production_plan(&state.pool, id, plan.id).await?;
    if !linked {
        // A concurrent conversion won the set-once link. The plan
        // created above is orphaned; surface the winner's identity.
        tracing::warn!(bid_id = id, orphan_plan_id = plan.id,
            "Concurrent conversion detected, returning existing plan");
        let fresh = ensure_bid_exists(&state.pool, id).await?;
        let plan_id = fresh.production_plan_id.ok_or_else(|| {
            AppError::InternalError("conversion link lost but no plan recorded".into())
        })?;
        return Ok((
            StatusCode::OK,
            Json(DataResponse {
                data: ConvertResponse {
                    production_plan_id: plan_id,
                    created: false,
                },
            }),
        ));
    }

    tracing::info!(bid_id = id, plan_id = plan.id, "Bid converted to production plan");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ConvertResponse {
                production_plan_id: plan.id,
                created: true,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /bids/{id}/pdf
// ---------------------------------------------------------------------------

/// Render the bid's current version to a PDF.
///
/// When artifact storage is available the response is a JSON body with
/// the stored URL; otherwise the raw bytes come back with a download
/// header.
pub async fn bid_pdf(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let bid = ensure_bid_exists(&state.pool, id).await?;

    let items = match BidVersionRepo::current_for_bid(&state.pool, id).await? {
        Some(version) => BidLineItemRepo::list_for_version(&state.pool, version.id).await?,
        None => Vec::new(),
    };

    let payload = pipeline::build_bid_document(&bid, &items);
    let bytes = pipeline::render_pdf(&state, &payload).await?;

    let filename = format!("bid-{id}.pdf");
    let key = pipeline::artifact_key("bids", id);
    match pipeline::store_or_return(&state, &key, bytes).await {
        PdfDelivery::Url(url) => Ok(Json(DataResponse {
            data: serde_json::json!({ "url": url }),
        })
        .into_response()),
        PdfDelivery::Bytes(bytes) => Ok(pipeline::download_response(&filename, bytes)),
    }
}
