use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::services::place_source::build_place_source;
use crate::services::places_service::{PlacesService, PlacesSettings};
use crate::web::session::SessionKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub places: Arc<PlacesService>,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(pool: SqlitePool, places: Arc<PlacesService>, sessions: SessionKeys) -> Self {
        Self {
            pool,
            places,
            sessions,
        }
    }

    pub fn from_config(config: &Config, pool: SqlitePool) -> Result<Self, reqwest::Error> {
        let source = build_place_source(config)?;
        let places = PlacesService::new(source, PlacesSettings::from_config(config));
        let sessions = SessionKeys::new(&config.session_secret, config.session_ttl);
        Ok(Self::new(pool, Arc::new(places), sessions))
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
