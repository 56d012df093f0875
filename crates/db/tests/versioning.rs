//! Integration tests for the versioned bid store.
//!
//! Exercises the repository layer against a real database:
//! - Version 1 created together with the bid
//! - Superseding: new versions carry pricing and clone line items
//! - The single-current-version invariant
//! - Soft conditions (no current version)

use ridgeline_core::status::VersionStatus;
use ridgeline_core::trade::Trade;
use ridgeline_db::models::bid::CreateBid;
use ridgeline_db::models::bid_line_item::LineItemInput;
use ridgeline_db::repositories::{BidLineItemRepo, BidRepo, BidVersionRepo, UserRepo};
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

fn new_bid(client: &str) -> CreateBid {
    CreateBid {
        trade: Trade::Roof,
        client_name: client.to_string(),
        client_email: Some(format!("{}@example.com", client.to_lowercase())),
        client_phone: None,
        client_address: None,
        default_margin_pct: Some(20.0),
        waste_pct: None,
        tax_rate_pct: None,
    }
}

fn item(description: &str, quantity: f64, line_total: f64) -> LineItemInput {
    LineItemInput {
        id: None,
        section: "roof".to_string(),
        description: description.to_string(),
        quantity,
        unit: Some("sq".to_string()),
        line_total,
        price_list_item_id: None,
        notes: None,
        sort_order: 0,
    }
}

// ---------------------------------------------------------------------------
// Test: creating a bid creates version 1
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_bid_creation_creates_version_one(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid = BidRepo::create(&pool, &new_bid("Alpha"), user_id).await.unwrap();

    let current = BidVersionRepo::current_for_bid(&pool, bid.id)
        .await
        .unwrap()
        .expect("new bid must have a current version");
    assert_eq!(current.version_number, 1);
    assert_eq!(current.status, VersionStatus::Draft);
    assert_eq!(current.default_margin_pct, 20.0);
}

// ---------------------------------------------------------------------------
// Test: superseding produces exactly one current version
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_single_current_version_after_superseding(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid = BidRepo::create(&pool, &new_bid("Beta"), user_id).await.unwrap();

    let v2 = BidVersionRepo::create_new_version(&pool, bid.id, Some("rework"))
        .await
        .unwrap()
        .expect("superseding must produce a successor");
    assert_eq!(v2.version_number, 2);
    assert_eq!(v2.notes.as_deref(), Some("rework"));

    let v3 = BidVersionRepo::create_new_version(&pool, bid.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(v3.version_number, 3);

    let versions = BidVersionRepo::list_for_bid(&pool, bid.id).await.unwrap();
    assert_eq!(versions.len(), 3);

    let non_superseded: Vec<_> = versions
        .iter()
        .filter(|v| v.status != VersionStatus::Superseded)
        .collect();
    assert_eq!(non_superseded.len(), 1);
    assert_eq!(non_superseded[0].id, v3.id);

    let current = BidVersionRepo::current_for_bid(&pool, bid.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, v3.id);
}

// ---------------------------------------------------------------------------
// Test: a new version clones line items with fresh identity
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_new_version_clones_line_items(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid = BidRepo::create(&pool, &new_bid("Gamma"), user_id).await.unwrap();
    let v1 = BidVersionRepo::current_for_bid(&pool, bid.id)
        .await
        .unwrap()
        .unwrap();

    let v1_items = BidLineItemRepo::reconcile(
        &pool,
        v1.id,
        bid.id,
        vec![item("Shingles", 30.0, 9000.0), item("Underlayment", 30.0, 1200.0)],
    )
    .await
    .unwrap();
    assert_eq!(v1_items.len(), 2);

    let v2 = BidVersionRepo::create_new_version(&pool, bid.id, None)
        .await
        .unwrap()
        .unwrap();
    let v2_items = BidLineItemRepo::list_for_version(&pool, v2.id).await.unwrap();
    assert_eq!(v2_items.len(), 2);

    // Same content, fresh identity.
    for clone in &v2_items {
        assert_eq!(clone.version_id, v2.id);
        assert!(v1_items.iter().all(|orig| orig.id != clone.id));
        assert!(v1_items
            .iter()
            .any(|orig| orig.description == clone.description && orig.line_total == clone.line_total));
    }

    // Mutating the clone set leaves the predecessor untouched.
    BidLineItemRepo::reconcile(&pool, v2.id, bid.id, vec![]).await.unwrap();
    let v1_after = BidLineItemRepo::list_for_version(&pool, v1.id).await.unwrap();
    assert_eq!(v1_after.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: pricing carries forward onto the successor
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_new_version_carries_pricing(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let bid = BidRepo::create(&pool, &new_bid("Delta"), user_id).await.unwrap();

    let v1 = BidVersionRepo::current_for_bid(&pool, bid.id)
        .await
        .unwrap()
        .unwrap();
    let v2 = BidVersionRepo::create_new_version(&pool, bid.id, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(v2.default_margin_pct, v1.default_margin_pct);
    assert_eq!(v2.grand_total, v1.grand_total);
    assert_eq!(v2.materials_total, v1.materials_total);
}

// ---------------------------------------------------------------------------
// Test: no current version is a soft condition
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_supersede_without_current_version_returns_none(pool: PgPool) {
    let result = BidVersionRepo::create_new_version(&pool, 9999, None)
        .await
        .unwrap();
    assert!(result.is_none());
}
