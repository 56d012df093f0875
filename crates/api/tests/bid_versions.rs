//! Handler-level tests for bid version creation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use ridgeline_api::auth::jwt::JwtConfig;
use ridgeline_api::config::ServerConfig;
use ridgeline_api::error::AppError;
use ridgeline_api::handlers::bids;
use ridgeline_api::middleware::auth::AuthUser;
use ridgeline_api::state::{AppState, Services};
use ridgeline_core::error::CoreError;
use ridgeline_core::status::VersionStatus;
use ridgeline_core::trade::Trade;
use ridgeline_db::models::bid::CreateBid;
use ridgeline_db::models::bid_version::{CreateVersion, UpdateVersionMeta};
use ridgeline_db::repositories::{BidRepo, BidVersionRepo, UserRepo};
use sqlx::PgPool;

fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expiry_mins: 60,
            },
        }),
        services: Arc::new(Services {
            renderer: None,
            artifacts: None,
            mailer: None,
            contractors_cloud: None,
            hover: None,
        }),
    }
}

async fn seed_bid(pool: &PgPool) -> (i64, i64) {
    let user = UserRepo::create(pool, "sales@example.com", "not-a-real-hash", "Test Seller", "sales")
        .await
        .unwrap();
    let bid = BidRepo::create(
        pool,
        &CreateBid {
            trade: Trade::Roof,
            client_name: "Dana Whitfield".to_string(),
            client_email: None,
            client_phone: None,
            client_address: None,
            default_margin_pct: None,
            waste_pct: None,
            tax_rate_pct: None,
        },
        user.id,
    )
    .await
    .unwrap();
    (bid.id, user.id)
}

// ---------------------------------------------------------------------------
// Test: a version-less bid is reported as such, not as a race
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_version_reports_missing_current_version(pool: PgPool) {
    let (bid_id, user_id) = seed_bid(&pool).await;

    // Supersede version 1 directly so the bid has no current version.
    let version = BidVersionRepo::current_for_bid(&pool, bid_id).await.unwrap().unwrap();
    BidVersionRepo::update_meta(
        &pool,
        version.id,
        &UpdateVersionMeta {
            notes: None,
            status: Some(VersionStatus::Superseded),
        },
    )
    .await
    .unwrap();

    let result = bids::create_version(
        AuthUser {
            user_id,
            role: "sales".to_string(),
        },
        State(test_state(pool.clone())),
        Path(bid_id),
        Json(CreateVersion::default()),
    )
    .await;

    match result {
        Err(AppError::Core(CoreError::Conflict(msg))) => {
            assert!(msg.contains("no current version"));
            // The message must not claim a concurrent supersede.
            assert!(!msg.contains("concurrent"));
        }
        Err(other) => panic!("expected conflict, got {other:?}"),
        Ok(_) => panic!("expected conflict, got a created version"),
    }
}
