use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::AppError;
use crate::services::favorites_service::{self, ToggleOutcome};
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct FavoriteBody {
    place_id: String,
}

/// `POST /favorite`. Always answers 200 with a `status` field.
pub async fn toggle_favorite_handler(
    State(pool): State<SqlitePool>,
    user: Option<Extension<AuthenticatedUser>>,
    body: Result<Json<FavoriteBody>, JsonRejection>,
) -> Json<Value> {
    let Some(Extension(user)) = user else {
        return status("unauthorized");
    };

    let body = match body {
        Ok(Json(body)) => body,
        Err(e) => {
            warn!(user_id = user.id, "Favorite toggle with bad body: {}", e);
            return status("error");
        }
    };

    match favorites_service::toggle(&pool, user.id, &body.place_id).await {
        Ok(ToggleOutcome::Toggled(outcome)) => status(outcome.as_str()),
        Ok(ToggleOutcome::InvalidPlaceId) => status("error"),
        Err(e) => {
            warn!(user_id = user.id, "Favorite toggle failed: {}", e);
            status("error")
        }
    }
}

/// `GET /favorites`. Anonymous callers get an empty list.
pub async fn list_favorites_handler(
    State(pool): State<SqlitePool>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Json<Vec<String>>, AppError> {
    let Some(Extension(user)) = user else {
        return Ok(Json(Vec::new()));
    };

    let ids = favorites_service::list(&pool, user.id).await?;
    Ok(Json(ids))
}

fn status(value: &str) -> Json<Value> {
    Json(json!({ "status": value }))
}
