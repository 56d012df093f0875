//! Handlers for reference data and user administration.
//!
//! Reads are open to any authenticated user (salespeople price bids
//! from the same catalogs); writes require the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ridgeline_core::error::CoreError;
use ridgeline_core::roles::{ROLE_ADMIN, ROLE_SALES};
use ridgeline_core::types::DbId;
use ridgeline_db::models::price_list::{CreatePriceListItem, UpdatePriceListItem};
use ridgeline_db::models::reference::{
    UpsertPaymentNoteTemplate, UpsertStartDateWindow, UpsertTaxRate,
};
use ridgeline_db::models::terms::CreateTerms;
use ridgeline_db::models::user::{CreateUser, UpdateUser};
use ridgeline_db::repositories::{PriceListRepo, ReferenceRepo, TermsRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ===========================================================================
// PRICE LIST
// ===========================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PriceListParams {
    #[serde(default)]
    pub active_only: bool,
}

/// GET /price-list
pub async fn list_price_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PriceListParams>,
) -> AppResult<impl IntoResponse> {
    let items = PriceListRepo::list(&state.pool, params.active_only).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /admin/price-list
pub async fn create_price_item(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreatePriceListItem>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()).into());
    }
    let item = PriceListRepo::create(&state.pool, &input).await?;
    tracing::info!(id = item.id, name = %item.name, "Price list item created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /admin/price-list/{id}
pub async fn update_price_item(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePriceListItem>,
) -> AppResult<impl IntoResponse> {
    let item = PriceListRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PriceListItem",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /admin/price-list/{id} -- soft delete via deactivation.
pub async fn deactivate_price_item(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !PriceListRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PriceListItem",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ===========================================================================
// TERMS & CONDITIONS
// ===========================================================================

/// GET /terms/active -- the terms text embedded into plan PDFs.
pub async fn active_terms(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let terms = TermsRepo::active(&state.pool).await?;
    Ok(Json(DataResponse { data: terms }))
}

/// GET /admin/terms
pub async fn list_terms(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let terms = TermsRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: terms }))
}

/// POST /admin/terms -- insert the next version, optionally activating it.
pub async fn create_terms(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTerms>,
) -> AppResult<impl IntoResponse> {
    if input.content.trim().is_empty() {
        return Err(CoreError::Validation("content must not be empty".into()).into());
    }
    let terms = TermsRepo::create(&state.pool, &input).await?;
    tracing::info!(id = terms.id, version = terms.version, "Terms version created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: terms })))
}

/// POST /admin/terms/{id}/activate
pub async fn activate_terms(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TermsRepo::activate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TermsConditions",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ===========================================================================
// TAX RATES
// ===========================================================================

/// GET /tax-rates
pub async fn list_tax_rates(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rates = ReferenceRepo::list_tax_rates(&state.pool).await?;
    Ok(Json(DataResponse { data: rates }))
}

/// PUT /admin/tax-rates -- regions are unique, so this upserts.
pub async fn upsert_tax_rate(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertTaxRate>,
) -> AppResult<impl IntoResponse> {
    if input.rate_pct < 0.0 {
        return Err(CoreError::Validation("rate_pct must not be negative".into()).into());
    }
    let rate = ReferenceRepo::upsert_tax_rate(&state.pool, &input).await?;
    Ok(Json(DataResponse { data: rate }))
}

// ===========================================================================
// PAYMENT NOTE TEMPLATES
// ===========================================================================

/// GET /payment-notes
pub async fn list_payment_notes(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let notes = ReferenceRepo::list_payment_notes(&state.pool).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /admin/payment-notes
pub async fn create_payment_note(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertPaymentNoteTemplate>,
) -> AppResult<impl IntoResponse> {
    let note = ReferenceRepo::create_payment_note(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// DELETE /admin/payment-notes/{id}
pub async fn delete_payment_note(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ReferenceRepo::delete_payment_note(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PaymentNoteTemplate",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ===========================================================================
// START DATE WINDOWS
// ===========================================================================

/// GET /start-windows
pub async fn list_start_windows(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let windows = ReferenceRepo::list_start_windows(&state.pool).await?;
    Ok(Json(DataResponse { data: windows }))
}

/// POST /admin/start-windows
pub async fn create_start_window(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertStartDateWindow>,
) -> AppResult<impl IntoResponse> {
    if input.weeks_out_min > input.weeks_out_max {
        return Err(
            CoreError::Validation("weeks_out_min must not exceed weeks_out_max".into()).into(),
        );
    }
    let window = ReferenceRepo::create_start_window(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: window })))
}

/// DELETE /admin/start-windows/{id}
pub async fn delete_start_window(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ReferenceRepo::delete_start_window(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "StartDateWindow",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ===========================================================================
// USERS
// ===========================================================================

/// GET /admin/users
pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /admin/users
pub async fn create_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    if input.password.len() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ))
        .into());
    }
    let role = input.role.as_deref().unwrap_or(ROLE_SALES);
    if role != ROLE_ADMIN && role != ROLE_SALES {
        return Err(CoreError::Validation(format!("unknown role: {role}")).into());
    }

    let hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;
    let user =
        UserRepo::create(&state.pool, &input.email, &hash, &input.display_name, role).await?;
    tracing::info!(id = user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// PUT /admin/users/{id}
pub async fn update_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if let Some(role) = input.role.as_deref() {
        if role != ROLE_ADMIN && role != ROLE_SALES {
            return Err(CoreError::Validation(format!("unknown role: {role}")).into());
        }
    }
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user }))
}
