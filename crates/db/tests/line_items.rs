//! Integration tests for line-item reconciliation.
//!
//! The reconcile endpoints converge persisted child rows to exactly
//! match a submitted full-replacement list: absent rows are deleted,
//! rows carrying a persisted id are updated, the rest are inserted.

use ridgeline_core::trade::Trade;
use ridgeline_db::models::bid::CreateBid;
use ridgeline_db::models::bid_line_item::LineItemInput;
use ridgeline_db::models::plan::CreatePlan;
use ridgeline_db::models::plan_line_item::PlanItemInput;
use ridgeline_db::repositories::{
    BidLineItemRepo, BidRepo, BidVersionRepo, PlanLineItemRepo, PlanRepo, UserRepo,
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

/// A bid plus the id of its current version.
async fn seed_bid(pool: &PgPool, user_id: i64) -> (i64, i64) {
    let bid = BidRepo::create(
        pool,
        &CreateBid {
            trade: Trade::Siding,
            client_name: "Reconcile Test".to_string(),
            client_email: None,
            client_phone: None,
            client_address: None,
            default_margin_pct: None,
            waste_pct: None,
            tax_rate_pct: None,
        },
        user_id,
    )
    .await
    .unwrap();
    let version = BidVersionRepo::current_for_bid(pool, bid.id)
        .await
        .unwrap()
        .unwrap();
    (bid.id, version.id)
}

fn item(id: Option<i64>, description: &str, line_total: f64, sort_order: i32) -> LineItemInput {
    LineItemInput {
        id,
        section: "siding".to_string(),
        description: description.to_string(),
        quantity: 1.0,
        unit: None,
        line_total,
        price_list_item_id: None,
        notes: None,
        sort_order,
    }
}

// ---------------------------------------------------------------------------
// Test: initial submission inserts everything
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_reconcile_inserts_into_empty_version(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let (bid_id, version_id) = seed_bid(&pool, user_id).await;

    let items = BidLineItemRepo::reconcile(
        &pool,
        version_id,
        bid_id,
        vec![item(None, "Vinyl panels", 4200.0, 0), item(None, "Trim", 600.0, 1)],
    )
    .await
    .unwrap();

    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.version_id == version_id));
    assert!(items.iter().all(|i| i.bid_id == bid_id));
}

// ---------------------------------------------------------------------------
// Test: mixed delete/update/insert in one submission
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_reconcile_mixed_submission(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let (bid_id, version_id) = seed_bid(&pool, user_id).await;

    let initial = BidLineItemRepo::reconcile(
        &pool,
        version_id,
        bid_id,
        vec![
            item(None, "A", 100.0, 0),
            item(None, "B", 200.0, 1),
            item(None, "C", 300.0, 2),
        ],
    )
    .await
    .unwrap();
    let a = initial.iter().find(|i| i.description == "A").unwrap();
    let b = initial.iter().find(|i| i.description == "B").unwrap();

    // Keep A unchanged, reprice B, drop C, add D.
    let result = BidLineItemRepo::reconcile(
        &pool,
        version_id,
        bid_id,
        vec![
            item(Some(a.id), "A", 100.0, 0),
            item(Some(b.id), "B repriced", 250.0, 1),
            item(None, "D", 400.0, 2),
        ],
    )
    .await
    .unwrap();

    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|i| i.description != "C"));

    let b_after = result.iter().find(|i| i.id == b.id).unwrap();
    assert_eq!(b_after.description, "B repriced");
    assert_eq!(b_after.line_total, 250.0);

    let d = result.iter().find(|i| i.description == "D").unwrap();
    assert!(d.id != a.id && d.id != b.id);
}

// ---------------------------------------------------------------------------
// Test: an empty submission empties the container
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_reconcile_empty_submission_deletes_all(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let (bid_id, version_id) = seed_bid(&pool, user_id).await;

    BidLineItemRepo::reconcile(
        &pool,
        version_id,
        bid_id,
        vec![item(None, "A", 100.0, 0), item(None, "B", 200.0, 1)],
    )
    .await
    .unwrap();

    let result = BidLineItemRepo::reconcile(&pool, version_id, bid_id, vec![]).await.unwrap();
    assert!(result.is_empty());

    let listed = BidLineItemRepo::list_for_version(&pool, version_id).await.unwrap();
    assert!(listed.is_empty());
}

// ---------------------------------------------------------------------------
// Test: an unknown id is treated as an insert, not an update
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_reconcile_unknown_id_becomes_insert(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let (bid_id, version_id) = seed_bid(&pool, user_id).await;

    let result = BidLineItemRepo::reconcile(
        &pool,
        version_id,
        bid_id,
        vec![item(Some(987654), "Phantom", 50.0, 0)],
    )
    .await
    .unwrap();

    assert_eq!(result.len(), 1);
    assert_ne!(result[0].id, 987654);
    assert_eq!(result[0].description, "Phantom");
}

// ---------------------------------------------------------------------------
// Test: plan line items reconcile the same way
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_plan_reconcile_round_trip(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let plan = PlanRepo::create(
        &pool,
        &CreatePlan {
            client_name: "Plan Reconcile".to_string(),
            client_email: None,
            client_phone: None,
            client_address: None,
            has_roof: true,
            has_siding: false,
            has_guttering: false,
            has_windows: false,
            has_small_jobs: false,
            sale_price: Some(8000.0),
            cc_account_id: None,
        },
        user_id,
    )
    .await
    .unwrap();

    let plan_item = |id: Option<i64>, key: &str, amount: f64| PlanItemInput {
        id,
        section: "roof".to_string(),
        field_key: key.to_string(),
        options: None,
        description: key.to_string(),
        amount,
        sort_order: 0,
        price_list_item_id: None,
    };

    let first = PlanLineItemRepo::reconcile(
        &pool,
        plan.id,
        vec![plan_item(None, "tear_off", 1500.0), plan_item(None, "shingles", 6500.0)],
    )
    .await
    .unwrap();
    assert_eq!(first.len(), 2);

    let keep = first.iter().find(|i| i.field_key == "shingles").unwrap();
    let second = PlanLineItemRepo::reconcile(
        &pool,
        plan.id,
        vec![plan_item(Some(keep.id), "shingles", 7000.0)],
    )
    .await
    .unwrap();

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, keep.id);
    assert_eq!(second[0].amount, 7000.0);
}
