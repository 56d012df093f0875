//! Integration tests for bid-to-plan conversion and the signature audit.
//!
//! Conversion projects a bid's current line items into a new production
//! plan and links the bid to it exactly once. The signature audit is
//! captured server-side only at the moment a plan transitions to
//! `signed`.

use ridgeline_core::convert::{bid_to_plan, BidItemSnapshot, BidSnapshot};
use ridgeline_core::status::PlanStatus;
use ridgeline_core::trade::Trade;
use ridgeline_db::models::bid::{CreateBid, UpdateBid};
use ridgeline_db::models::bid_line_item::LineItemInput;
use ridgeline_db::models::plan::{SignatureAudit, UpdatePlan};
use ridgeline_db::models::price_list::CreatePriceListItem;
use ridgeline_db::repositories::{
    BidLineItemRepo, BidRepo, BidVersionRepo, PlanLineItemRepo, PlanRepo, PriceListRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool) -> i64 {
    UserRepo::create(pool, "sales@example.com", "not-a-real-hash", "Test Seller", "sales")
        .await
        .unwrap()
        .id
}

async fn seed_bid(pool: &PgPool, user_id: i64, trade: Trade, grand_total: f64) -> i64 {
    let bid = BidRepo::create(
        pool,
        &CreateBid {
            trade,
            client_name: "Dana Whitfield".to_string(),
            client_email: Some("dana@example.com".to_string()),
            client_phone: None,
            client_address: Some("14 Larch Ave".to_string()),
            default_margin_pct: None,
            waste_pct: None,
            tax_rate_pct: None,
        },
        user_id,
    )
    .await
    .unwrap();
    BidRepo::update(
        pool,
        bid.id,
        &UpdateBid {
            grand_total: Some(grand_total),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    bid.id
}

/// Run the conversion sequence the way the convert endpoint does.
async fn convert(pool: &PgPool, bid_id: i64, user_id: i64) -> i64 {
    let bid = BidRepo::find_by_id(pool, bid_id).await.unwrap().unwrap();
    let items = match BidVersionRepo::current_for_bid(pool, bid_id).await.unwrap() {
        Some(version) => BidLineItemRepo::list_for_version(pool, version.id).await.unwrap(),
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
    let plan = PlanRepo::create_from_draft(pool, &draft, user_id).await.unwrap();
    PlanLineItemRepo::insert_drafts(pool, plan.id, &item_drafts).await.unwrap();
    assert!(BidRepo::link_production_plan(pool, bid_id, plan.id).await.unwrap());
    plan.id
}

/// Run conversion the way the convert endpoint does, guard included: an
/// already-linked bid short-circuits to the existing plan's identity.
async fn convert_guarded(pool: &PgPool, bid_id: i64, user_id: i64) -> (i64, bool) {
    let bid = BidRepo::find_by_id(pool, bid_id).await.unwrap().unwrap();
    if let Some(plan_id) = bid.production_plan_id {
        return (plan_id, false);
    }
    (convert(pool, bid_id, user_id).await, true)
}

async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: the roof bid scenario end to end
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_roof_bid_conversion_scenario(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid_id = seed_bid(&pool, user_id, Trade::Roof, 12500.0).await;

    let catalog = PriceListRepo::create(
        &pool,
        &CreatePriceListItem {
            category: "roofing".to_string(),
            name: "Architectural shingles".to_string(),
            unit: Some("sq".to_string()),
            unit_price: 150.0,
            is_active: None,
        },
    )
    .await
    .unwrap();

    let version = BidVersionRepo::current_for_bid(&pool, bid_id).await.unwrap().unwrap();
    BidLineItemRepo::reconcile(
        &pool,
        version.id,
        bid_id,
        vec![
            LineItemInput {
                id: None,
                section: "roof".to_string(),
                description: "Architectural shingles".to_string(),
                quantity: 3.0,
                unit: Some("sq".to_string()),
                line_total: 450.0,
                price_list_item_id: Some(catalog.id),
                notes: None,
                sort_order: 0,
            },
            LineItemInput {
                id: None,
                section: "roof".to_string(),
                description: "Flashing repair".to_string(),
                quantity: 1.0,
                unit: None,
                line_total: 200.0,
                price_list_item_id: None,
                notes: None,
                sort_order: 1,
            },
        ],
    )
    .await
    .unwrap();

    let plan_id = convert(&pool, bid_id, user_id).await;

    let plan = PlanRepo::find_by_id(&pool, plan_id).await.unwrap().unwrap();
    assert!(plan.has_roof);
    assert!(!plan.has_siding);
    assert_eq!(plan.sale_price, 12500.0);
    assert_eq!(plan.client_name, "Dana Whitfield");

    let items = PlanLineItemRepo::list_for_plan(&pool, plan_id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.section == "roof"));

    let catalog_item = items
        .iter()
        .find(|i| i.price_list_item_id == Some(catalog.id))
        .unwrap();
    let options = catalog_item.options.as_ref().unwrap();
    assert_eq!(options["unit_price"], 150.0);

    let custom = items.iter().find(|i| i.price_list_item_id.is_none()).unwrap();
    assert_eq!(custom.field_key, "flashing_repair");
    assert_eq!(custom.amount, 200.0);
}

// ---------------------------------------------------------------------------
// Test: fascia_soffit collapses into the siding section
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_fascia_soffit_converts_to_siding(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid_id = seed_bid(&pool, user_id, Trade::FasciaSoffit, 3200.0).await;

    let plan_id = convert(&pool, bid_id, user_id).await;
    let plan = PlanRepo::find_by_id(&pool, plan_id).await.unwrap().unwrap();

    assert!(plan.has_siding);
    assert!(!plan.has_roof);
}

// ---------------------------------------------------------------------------
// Test: the set-once link rejects a second conversion
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_conversion_link_is_set_once(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid_id = seed_bid(&pool, user_id, Trade::Windows, 5000.0).await;

    let plan_id = convert(&pool, bid_id, user_id).await;

    // A competing link attempt must not claim the bid.
    assert!(!BidRepo::link_production_plan(&pool, bid_id, plan_id + 1).await.unwrap());

    let bid = BidRepo::find_by_id(&pool, bid_id).await.unwrap().unwrap();
    assert_eq!(bid.production_plan_id, Some(plan_id));
}

// ---------------------------------------------------------------------------
// Test: a second conversion returns the first plan with zero writes
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_second_conversion_returns_existing_plan_without_writes(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid_id = seed_bid(&pool, user_id, Trade::Roof, 4200.0).await;

    let version = BidVersionRepo::current_for_bid(&pool, bid_id).await.unwrap().unwrap();
    BidLineItemRepo::reconcile(
        &pool,
        version.id,
        bid_id,
        vec![LineItemInput {
            id: None,
            section: "roof".to_string(),
            description: "Ridge vent".to_string(),
            quantity: 1.0,
            unit: None,
            line_total: 420.0,
            price_list_item_id: None,
            notes: None,
            sort_order: 0,
        }],
    )
    .await
    .unwrap();

    let (first_plan_id, created) = convert_guarded(&pool, bid_id, user_id).await;
    assert!(created);

    let plans_before = count_rows(&pool, "production_plans").await;
    let items_before = count_rows(&pool, "plan_line_items").await;

    let (second_plan_id, created) = convert_guarded(&pool, bid_id, user_id).await;
    assert_eq!(second_plan_id, first_plan_id);
    assert!(!created);

    assert_eq!(count_rows(&pool, "production_plans").await, plans_before);
    assert_eq!(count_rows(&pool, "plan_line_items").await, items_before);
}

// ---------------------------------------------------------------------------
// Test: a bid with no current version still converts, empty
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_conversion_without_line_items(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid_id = seed_bid(&pool, user_id, Trade::Gutters, 900.0).await;

    let plan_id = convert(&pool, bid_id, user_id).await;
    let items = PlanLineItemRepo::list_for_plan(&pool, plan_id).await.unwrap();
    assert!(items.is_empty());

    let plan = PlanRepo::find_by_id(&pool, plan_id).await.unwrap().unwrap();
    assert!(plan.has_guttering);
    assert_eq!(plan.sale_price, 900.0);
}

// ---------------------------------------------------------------------------
// Test: signature audit is captured once and survives later edits
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_signature_audit_capture(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid_id = seed_bid(&pool, user_id, Trade::Roof, 7500.0).await;
    let plan_id = convert(&pool, bid_id, user_id).await;

    // Draft plans carry no audit.
    let plan = PlanRepo::find_by_id(&pool, plan_id).await.unwrap().unwrap();
    assert_eq!(plan.status, PlanStatus::Draft);
    assert!(plan.signed_ip.is_none());
    assert!(plan.signed_at.is_none());

    // Move to sent, then sign with audit capture.
    PlanRepo::update(
        &pool,
        plan_id,
        &UpdatePlan {
            status: Some(PlanStatus::Sent),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();

    let signed = PlanRepo::update(
        &pool,
        plan_id,
        &UpdatePlan {
            status: Some(PlanStatus::Signed),
            ..Default::default()
        },
        Some(&SignatureAudit {
            ip: Some("203.0.113.9".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        }),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(signed.status, PlanStatus::Signed);
    assert_eq!(signed.signed_ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(signed.signed_user_agent.as_deref(), Some("Mozilla/5.0"));
    assert!(signed.signed_at.is_some());

    // An unrelated edit must not blank the recorded audit.
    let edited = PlanRepo::update(
        &pool,
        plan_id,
        &UpdatePlan {
            client_phone: Some("555-0100".to_string()),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(edited.signed_ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(edited.signed_at, signed.signed_at);
}

// ---------------------------------------------------------------------------
// Test: mark_sent never regresses a signed plan
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_mark_sent_refuses_signed_plan(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid_id = seed_bid(&pool, user_id, Trade::Siding, 6100.0).await;
    let plan_id = convert(&pool, bid_id, user_id).await;

    // Draft plans mark sent normally.
    let sent = PlanRepo::mark_sent(&pool, plan_id, None).await.unwrap().unwrap();
    assert_eq!(sent.status, PlanStatus::Sent);
    assert!(sent.sent_at.is_some());

    PlanRepo::update(
        &pool,
        plan_id,
        &UpdatePlan {
            status: Some(PlanStatus::Signed),
            ..Default::default()
        },
        Some(&SignatureAudit::default()),
    )
    .await
    .unwrap();

    // Once signed, mark_sent must leave the row untouched.
    assert!(PlanRepo::mark_sent(&pool, plan_id, Some("https://example.com/p.pdf"))
        .await
        .unwrap()
        .is_none());

    let plan = PlanRepo::find_by_id(&pool, plan_id).await.unwrap().unwrap();
    assert_eq!(plan.status, PlanStatus::Signed);
    assert!(plan.pdf_url.is_none());
}
