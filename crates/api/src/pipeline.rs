//! Document finalization pipeline.
//!
//! Everything between "the user clicked send" and "the plan is marked
//! sent" lives here: document assembly, PDF rendering, artifact
//! storage with a raw-bytes fallback, email delivery, and the
//! best-effort CRM upload side channel.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use ridgeline_core::error::CoreError;
use ridgeline_core::status::PlanStatus;
use ridgeline_core::types::DbId;
use ridgeline_db::models::bid::Bid;
use ridgeline_db::models::bid_line_item::BidLineItem;
use ridgeline_db::models::plan::ProductionPlan;
use ridgeline_db::models::plan_line_item::PlanLineItem;
use ridgeline_db::models::terms::TermsConditions;
use ridgeline_db::repositories::{PlanLineItemRepo, PlanRepo, TermsRepo, UserRepo};
use ridgeline_documents::pdf::{DocumentKind, DocumentPayload, DocumentRow, PdfError};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Client metadata capture
// ---------------------------------------------------------------------------

/// The originating client IP, as reported by proxy headers.
///
/// The first entry of `x-forwarded-for` wins; `x-real-ip` is the
/// fallback. Absent both, no IP is recorded.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Document assembly
// ---------------------------------------------------------------------------

/// Assemble the printable document for a bid's current line items.
pub fn build_bid_document(bid: &Bid, items: &[BidLineItem]) -> DocumentPayload {
    DocumentPayload {
        kind: DocumentKind::Bid,
        title: format!("Bid #{}", bid.id),
        client_name: bid.client_name.clone(),
        client_email: bid.client_email.clone(),
        client_address: bid.client_address.clone(),
        rows: items
            .iter()
            .map(|item| DocumentRow {
                section: item.section.clone(),
                description: item.description.clone(),
                amount: item.line_total,
            })
            .collect(),
        total: bid.grand_total,
        terms: None,
    }
}

/// Assemble the printable document for a plan, appending the active
/// terms & conditions text when one exists.
pub fn build_plan_document(
    plan: &ProductionPlan,
    items: &[PlanLineItem],
    terms: Option<&TermsConditions>,
) -> DocumentPayload {
    DocumentPayload {
        kind: DocumentKind::ProductionPlan,
        title: format!("Production Plan #{}", plan.id),
        client_name: plan.client_name.clone(),
        client_email: plan.client_email.clone(),
        client_address: plan.client_address.clone(),
        rows: items
            .iter()
            .map(|item| DocumentRow {
                section: item.section.clone(),
                description: item.description.clone(),
                amount: item.amount,
            })
            .collect(),
        total: plan.sale_price,
        terms: terms.map(|t| t.content.clone()),
    }
}

/// Render a document through the configured render service.
pub async fn render_pdf(state: &AppState, payload: &DocumentPayload) -> AppResult<Vec<u8>> {
    let renderer = state
        .services
        .renderer
        .as_ref()
        .ok_or(AppError::Pdf(PdfError::NotConfigured))?;
    Ok(renderer.render(payload).await?)
}

// ---------------------------------------------------------------------------
// Artifact delivery
// ---------------------------------------------------------------------------

/// How a rendered PDF reaches the caller: a stored artifact's URL, or
/// the raw bytes when storage is unavailable or the upload failed.
pub enum PdfDelivery {
    Url(String),
    Bytes(Vec<u8>),
}

/// A unique storage key derived from document identity and the current
/// timestamp.
pub fn artifact_key(prefix: &str, id: DbId) -> String {
    format!("{prefix}/{id}-{}.pdf", Utc::now().timestamp())
}

/// Store the PDF if artifact storage is configured, falling back to
/// handing the bytes straight back on any storage failure.
pub async fn store_or_return(state: &AppState, key: &str, bytes: Vec<u8>) -> PdfDelivery {
    let Some(store) = state.services.artifacts.as_ref() else {
        return PdfDelivery::Bytes(bytes);
    };
    match store.put_pdf(key, bytes.clone()).await {
        Ok(url) => PdfDelivery::Url(url),
        Err(err) => {
            tracing::warn!(key, error = %err, "PDF upload failed, returning bytes");
            PdfDelivery::Bytes(bytes)
        }
    }
}

/// A raw-bytes response with a download header.
pub fn download_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Send pipeline
// ---------------------------------------------------------------------------

/// Outcome of the best-effort CRM upload side channel, reported
/// separately from the primary send result so a failed filing never
/// masquerades as a failed send.
#[derive(Debug, Serialize)]
pub struct CrmUploadOutcome {
    /// Whether an upload was attempted at all (plans without a linked
    /// CRM account skip the step entirely).
    pub attempted: bool,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrmUploadOutcome {
    fn skipped() -> Self {
        Self {
            attempted: false,
            success: false,
            error: None,
        }
    }

    fn succeeded() -> Self {
        Self {
            attempted: true,
            success: true,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            attempted: true,
            success: false,
            error: Some(error),
        }
    }
}

/// The full result of a plan send.
#[derive(Debug, Serialize)]
pub struct SendOutcome {
    pub plan: ProductionPlan,
    pub crm_upload: CrmUploadOutcome,
}

/// Finalize and send a production plan.
///
/// Email delivery is the success criterion: a rendering or email
/// failure fails the whole operation, while artifact storage and the
/// CRM upload are best-effort. The plan is marked sent only after the
/// email goes out.
pub async fn send_plan(state: &AppState, plan_id: DbId, sender_id: DbId) -> AppResult<SendOutcome> {
    let (plan, items) = tokio::try_join!(
        PlanRepo::find_by_id(&state.pool, plan_id),
        PlanLineItemRepo::list_for_plan(&state.pool, plan_id),
    )?;
    let plan = plan.ok_or(AppError::Core(CoreError::NotFound {
        entity: "ProductionPlan",
        id: plan_id,
    }))?;

    // A signed plan never transitions again; re-sending a sent plan is
    // allowed.
    if plan.status == PlanStatus::Signed {
        return Err(AppError::Core(CoreError::Conflict(
            "a signed plan cannot be re-sent".into(),
        )));
    }

    let client_email = plan
        .client_email
        .clone()
        .ok_or_else(|| AppError::Core(CoreError::Validation("plan has no client email".into())))?;

    let sender = UserRepo::find_by_id(&state.pool, sender_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: sender_id,
        }))?;

    let terms = TermsRepo::active(&state.pool).await?;
    let payload = build_plan_document(&plan, &items, terms.as_ref());
    let bytes = render_pdf(state, &payload).await?;
    let filename = format!("production-plan-{plan_id}.pdf");

    // Email is fatal on failure.
    let mailer = state
        .services
        .mailer
        .as_ref()
        .ok_or_else(|| AppError::InternalError("email transport is not configured".into()))?;
    let recipients = vec![client_email, sender.email.clone()];
    mailer
        .send_with_attachment(
            &recipients,
            &format!("Production Plan for {}", plan.client_name),
            &format!(
                "Hi {},\n\nPlease find your production plan attached.\n\nRegards,\n{}",
                plan.client_name, sender.display_name
            ),
            &filename,
            &bytes,
        )
        .await?;
    tracing::info!(plan_id, recipients = recipients.len(), "Plan emailed");

    // Best-effort side channel: file the PDF with the linked CRM project.
    let crm_upload = match &plan.cc_account_id {
        None => CrmUploadOutcome::skipped(),
        Some(account_id) => match upload_to_crm(state, account_id, &filename, bytes.clone()).await
        {
            Ok(()) => CrmUploadOutcome::succeeded(),
            Err(err) => {
                tracing::warn!(plan_id, error = %err, "CRM upload failed");
                CrmUploadOutcome::failed(err.to_string())
            }
        },
    };

    // Artifact storage is also best-effort; a failed upload just leaves
    // pdf_url empty.
    let pdf_url = match store_or_return(state, &artifact_key("plans", plan_id), bytes).await {
        PdfDelivery::Url(url) => Some(url),
        PdfDelivery::Bytes(_) => None,
    };

    // The repo refuses to overwrite a signed row, so a signature landing
    // between the status check above and this write cannot be regressed.
    let plan = PlanRepo::mark_sent(&state.pool, plan_id, pdf_url.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "plan was signed while the send was in flight".into(),
            ))
        })?;

    Ok(SendOutcome { plan, crm_upload })
}

/// Upload the plan PDF into the first project of the linked CRM account.
async fn upload_to_crm(
    state: &AppState,
    account_id: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<(), ridgeline_crm::CrmError> {
    let client = state
        .services
        .contractors_cloud
        .as_ref()
        .ok_or(ridgeline_crm::CrmError::NotConfigured("contractors cloud"))?;

    let projects = client.list_projects(account_id).await?;
    let project = projects
        .first()
        .ok_or_else(|| ridgeline_crm::CrmError::ApiError {
            status: 404,
            body: format!("account {account_id} has no projects"),
        })?;

    client
        .upload_project_file(
            &project.id,
            filename,
            bytes,
            "production_plan",
            "Signed production plan",
            true,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ip_prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        headers.insert("x-real-ip", "10.0.0.2".parse().unwrap());
        assert_eq!(client_ip(&headers), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "198.51.100.4".parse().unwrap());
        assert_eq!(client_ip(&headers), Some("198.51.100.4".to_string()));
    }

    #[test]
    fn client_ip_absent_when_no_proxy_headers() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
    }

    #[test]
    fn skipped_upload_serializes_without_error_field() {
        let body = serde_json::to_value(CrmUploadOutcome::skipped()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "attempted": false, "success": false })
        );
    }

    #[test]
    fn failed_upload_carries_error_message() {
        let body = serde_json::to_value(CrmUploadOutcome::failed("boom".into())).unwrap();
        assert_eq!(body["attempted"], true);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "boom");
    }
}
