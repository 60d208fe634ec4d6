//! Test utilities and fixtures for Newsstand integration tests

#![allow(dead_code)]

use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub use newsstand::db::{init_db, queries, AppState, DbPool};
pub use newsstand::handlers;
pub use newsstand::models::Subscription;
pub use newsstand::payments::StripeVerifier;

/// Signing secret used by all test fixtures
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test123secret456";

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// In-memory pool with a single connection so every request in a test
/// sees the same database.
pub fn setup_test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to create test pool");
    {
        let conn = pool.get().expect("Failed to get test connection");
        init_db(&conn).expect("Failed to initialize schema");
    }
    pool
}

pub fn test_state() -> AppState {
    AppState {
        db: setup_test_pool(),
        stripe: StripeVerifier::new(TEST_WEBHOOK_SECRET),
    }
}

/// Build the full application router backed by an in-memory database.
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = handlers::router().with_state(state.clone());
    (app, state)
}

pub fn compute_stripe_signature(payload: &[u8], secret: &str, timestamp: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Full `stripe-signature` header value for a payload, signed now.
pub fn stripe_signature_header(payload: &[u8], secret: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = compute_stripe_signature(payload, secret, &timestamp);
    format!("t={},v1={}", timestamp, signature)
}

/// Count rows in the subscriptions table (to assert persistence was or
/// was not invoked).
pub fn subscription_count(state: &AppState) -> i64 {
    let conn = state.db.get().expect("Failed to get test connection");
    conn.query_row("SELECT COUNT(*) FROM subscriptions", [], |row| row.get(0))
        .expect("Failed to count subscriptions")
}
