use sqlx::SqlitePool;

use crate::models::{FavoriteRow, FavoriteToggle};

const SQL_DELETE_FAVORITE: &str = r#"
DELETE FROM favorites
WHERE user_id = ?1
  AND place_id = ?2
"#;

const SQL_INSERT_FAVORITE: &str = r#"
INSERT OR IGNORE INTO favorites (user_id, place_id)
VALUES (?1, ?2)
"#;

const SQL_LIST_PLACE_IDS: &str = r#"
SELECT place_id
FROM favorites
WHERE user_id = ?1
ORDER BY id ASC
"#;

/// Removes the favorite if present, otherwise adds it. Runs in one
/// transaction so two toggles cannot both insert.
pub async fn toggle_favorite(
    pool: &SqlitePool,
    user_id: i64,
    place_id: &str,
) -> sqlx::Result<FavoriteToggle> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(SQL_DELETE_FAVORITE)
        .bind(user_id)
        .bind(place_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let outcome = if deleted > 0 {
        FavoriteToggle::Removed
    } else {
        sqlx::query(SQL_INSERT_FAVORITE)
            .bind(user_id)
            .bind(place_id)
            .execute(&mut *tx)
            .await?;
        FavoriteToggle::Added
    };

    tx.commit().await?;
    Ok(outcome)
}

pub async fn list_place_ids(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<String>> {
    let rows = sqlx::query_as::<_, FavoriteRow>(SQL_LIST_PLACE_IDS)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.place_id).collect())
}
