use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use moka::future::Cache;
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{Place, RawPlace};
use crate::services::geo::{haversine_km, Coordinates, InvalidCoordinates};
use crate::services::mood::category_for_mood;
use crate::services::place_source::{PlaceQuery, PlaceSource, PlaceSourceError};
use crate::services::rating::estimate_rating;

const KEY_SCALE: f64 = 100_000.0;

/// Upper bound on places returned per lookup, whatever the settings ask for.
pub const MAX_PLACES: usize = 25;

#[derive(Debug, Clone, Copy)]
pub struct PlacesSettings {
    pub limit: usize,
    pub radius_m: u32,
    pub cache_capacity: u64,
    pub cache_ttl: Option<Duration>,
}

impl PlacesSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            limit: config.places_limit,
            radius_m: config.search_radius_m,
            cache_capacity: config.cache_capacity,
            cache_ttl: config.cache_ttl,
        }
    }
}

impl Default for PlacesSettings {
    fn default() -> Self {
        Self {
            limit: MAX_PLACES,
            radius_m: 8000,
            cache_capacity: 1024,
            cache_ttl: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error(transparent)]
    InvalidOrigin(#[from] InvalidCoordinates),

    #[error("place source failed: {0}")]
    Source(#[from] Arc<PlaceSourceError>),
}

/// Origin rounded to 5 decimals (about a meter) plus the normalized mood.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    lat_e5: i64,
    lon_e5: i64,
    mood: String,
}

impl CacheKey {
    fn new(origin: Coordinates, mood: &str) -> Self {
        Self {
            lat_e5: (origin.lat() * KEY_SCALE).round() as i64,
            lon_e5: (origin.lon() * KEY_SCALE).round() as i64,
            mood: mood.trim().to_lowercase(),
        }
    }
}

/// Fetches, ranks and memoizes places per (origin, mood).
///
/// Results stay in the cache until evicted by capacity (or by the optional
/// time-to-live), so a hit can be older than what the upstream would return
/// now. Concurrent misses on the same key share a single upstream call.
/// Failed upstream calls are never cached.
pub struct PlacesService {
    source: Arc<dyn PlaceSource>,
    cache: Cache<CacheKey, Arc<Vec<Place>>>,
    rng: Mutex<StdRng>,
    limit: usize,
    radius_m: u32,
}

impl PlacesService {
    pub fn new(source: Arc<dyn PlaceSource>, settings: PlacesSettings) -> Self {
        Self::with_rng(source, settings, StdRng::from_entropy())
    }

    pub fn with_rng(source: Arc<dyn PlaceSource>, settings: PlacesSettings, rng: StdRng) -> Self {
        let mut builder = Cache::builder().max_capacity(settings.cache_capacity);
        if let Some(ttl) = settings.cache_ttl {
            builder = builder.time_to_live(ttl);
        }

        let limit = settings.limit.clamp(1, MAX_PLACES);
        if limit != settings.limit {
            warn!(requested = settings.limit, limit, "Places limit out of range, clamped");
        }

        Self {
            source,
            cache: builder.build(),
            rng: Mutex::new(rng),
            limit,
            radius_m: settings.radius_m,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn get_places(
        &self,
        lat: f64,
        lng: f64,
        mood: &str,
    ) -> Result<Arc<Vec<Place>>, PlacesError> {
        let origin = Coordinates::new(lat, lng)?;
        let key = CacheKey::new(origin, mood);
        let category = category_for_mood(mood);

        let entry = self
            .cache
            .entry(key)
            .or_try_insert_with(self.load(origin, category))
            .await?;

        debug!(
            lat,
            lng,
            mood,
            cached = !entry.is_fresh(),
            "📍 Places lookup"
        );
        Ok(entry.into_value())
    }

    async fn load(
        &self,
        origin: Coordinates,
        category: &'static str,
    ) -> Result<Arc<Vec<Place>>, PlaceSourceError> {
        let query = PlaceQuery {
            origin,
            category,
            radius_m: self.radius_m,
        };
        let candidates = self.source.fetch(&query).await?;
        debug!(
            source = self.source.name(),
            candidates = candidates.len(),
            category,
            "📍 Place source answered"
        );
        Ok(Arc::new(self.rank(origin, candidates)))
    }

    fn rank(&self, origin: Coordinates, candidates: Vec<RawPlace>) -> Vec<Place> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let mut places: Vec<Place> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let at = Coordinates::new(candidate.lat, candidate.lon).ok()?;
                Some(Place {
                    distance: haversine_km(origin, at),
                    rating: estimate_rating(&candidate.category, &mut *rng),
                    id: candidate.id,
                    name: candidate.name,
                    category: candidate.category,
                    lat: candidate.lat,
                    lon: candidate.lon,
                })
            })
            .collect();

        // sort_by is stable: equal distances keep provider order.
        places.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        places.truncate(self.limit);
        places
    }
}
