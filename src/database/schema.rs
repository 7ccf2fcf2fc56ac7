use sqlx::SqlitePool;

const SQL_CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

// UNIQUE(user_id, place_id) backs the toggle logic in favorites_repo.
const SQL_CREATE_FAVORITES: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    place_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (user_id, place_id)
)
"#;

const SQL_CREATE_FAVORITES_USER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites (user_id)
"#;

pub async fn init_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in [
        SQL_CREATE_USERS,
        SQL_CREATE_FAVORITES,
        SQL_CREATE_FAVORITES_USER_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
