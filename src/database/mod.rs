pub mod favorites_repo;
pub mod schema;
pub mod user_repo;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub async fn connect(database_url: &str) -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    schema::init_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied. Every
/// connection to `:memory:` is its own database, so the pool never opens a
/// second one.
pub async fn connect_in_memory() -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    schema::init_schema(&pool).await?;
    Ok(pool)
}
