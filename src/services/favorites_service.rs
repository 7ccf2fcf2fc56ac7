use sqlx::SqlitePool;
use tracing::debug;

use crate::database::favorites_repo;
use crate::models::FavoriteToggle;

const MAX_PLACE_ID_LEN: usize = 128;

#[derive(Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled(FavoriteToggle),
    InvalidPlaceId,
}

pub async fn toggle(pool: &SqlitePool, user_id: i64, place_id: &str) -> sqlx::Result<ToggleOutcome> {
    let place_id = place_id.trim();
    if place_id.is_empty() || place_id.len() > MAX_PLACE_ID_LEN {
        return Ok(ToggleOutcome::InvalidPlaceId);
    }

    let outcome = favorites_repo::toggle_favorite(pool, user_id, place_id).await?;
    debug!(user_id, place_id, status = outcome.as_str(), "Favorite toggled");
    Ok(ToggleOutcome::Toggled(outcome))
}

pub async fn list(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<String>> {
    favorites_repo::list_place_ids(pool, user_id).await
}
