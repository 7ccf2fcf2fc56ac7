use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::Place;
use crate::services::places_service::PlacesError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlacesQuery {
    lat: Option<String>,
    lng: Option<String>,
    mood: Option<String>,
}

/// `GET /get_places`. Upstream trouble answers with an empty list; only a
/// bad origin is reported as a client error.
pub async fn get_places_handler(
    State(state): State<AppState>,
    Query(query): Query<PlacesQuery>,
) -> Result<Json<Vec<Place>>, AppError> {
    let lat = parse_coordinate("lat", query.lat.as_deref())?;
    let lng = parse_coordinate("lng", query.lng.as_deref())?;
    let mood = query.mood.as_deref().unwrap_or("");

    match state.places.get_places(lat, lng, mood).await {
        Ok(places) => Ok(Json(places.to_vec())),
        Err(PlacesError::InvalidOrigin(e)) => Err(AppError::InvalidInput(e.to_string())),
        Err(PlacesError::Source(e)) => {
            warn!(
                source = state.places.source_name(),
                lat,
                lng,
                mood,
                "📍 Places upstream unavailable: {}",
                e
            );
            Ok(Json(Vec::new()))
        }
    }
}

fn parse_coordinate(name: &str, raw: Option<&str>) -> Result<f64, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", name)))?;

    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::InvalidInput(format!("{} must be a number", name)))
}
