use sqlx::SqlitePool;

use crate::models::UsersRow;

pub const SQL_INSERT_USER: &str = r#"
INSERT INTO users (username, password_hash)
VALUES (?1, ?2)
"#;

pub const SQL_FIND_BY_USERNAME: &str = r#"
SELECT
    id,
    username,
    password_hash
FROM users
WHERE username = ?1
LIMIT 1
"#;

pub const SQL_FIND_BY_ID: &str = r#"
SELECT
    id,
    username,
    password_hash
FROM users
WHERE id = ?1
LIMIT 1
"#;

pub async fn insert_user(pool: &SqlitePool, username: &str, password_hash: &str) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT_USER)
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(res.last_insert_rowid())
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> sqlx::Result<Option<UsersRow>> {
    sqlx::query_as::<_, UsersRow>(SQL_FIND_BY_USERNAME)
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<UsersRow>> {
    sqlx::query_as::<_, UsersRow>(SQL_FIND_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
}
