mod schema;
pub mod queries;

pub use schema::init_db;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::payments::StripeVerifier;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state holding the database pool and webhook configuration
#[derive(Clone)]
pub struct AppState {
    /// Subscription mirror database pool
    pub db: DbPool,
    /// Stripe webhook signature verifier (holds the signing secret)
    pub stripe: StripeVerifier,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder().max_size(10).build(manager)
}
