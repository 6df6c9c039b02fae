//! Persistence layer: row models, Postgres repositories, and the store
//! traits the API is written against.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{Store, StoreError, StoreResult};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
