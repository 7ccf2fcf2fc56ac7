use async_trait::async_trait;

use super::{PlaceQuery, PlaceSource, PlaceSourceError};
use crate::models::RawPlace;
use crate::services::mood::category_label;

pub const MOCK_PLACE_COUNT: usize = 10;

const KM_PER_DEGREE: f64 = 111.32;
const FIRST_RING_KM: f64 = 0.3;
const RING_STEP_KM: f64 = 0.4;
const ANGLE_STEP_DEG: f64 = 36.0;

/// Generates places on a spiral around the origin. Needs no network and
/// always answers with the same layout for the same query.
pub struct MockSource {
    count: usize,
}

impl MockSource {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new(MOCK_PLACE_COUNT)
    }
}

#[async_trait]
impl PlaceSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, query: &PlaceQuery) -> Result<Vec<RawPlace>, PlaceSourceError> {
        Ok(generate(query, self.count))
    }
}

fn generate(query: &PlaceQuery, count: usize) -> Vec<RawPlace> {
    let lat0 = query.origin.lat();
    let lon0 = query.origin.lon();
    let lon_scale = lat0.to_radians().cos().abs().max(0.01);
    let label = category_label(query.category);

    (0..count)
        .map(|i| {
            let step = i as f64;
            let distance_km = FIRST_RING_KM + RING_STEP_KM * step;
            let angle = (ANGLE_STEP_DEG * step).to_radians();
            let lat = (lat0 + distance_km / KM_PER_DEGREE * angle.cos()).clamp(-90.0, 90.0);
            let lon = wrap_longitude(lon0 + distance_km / (KM_PER_DEGREE * lon_scale) * angle.sin());

            RawPlace {
                id: format!("mock_{}_{}", query.category, i + 1),
                name: format!("{} #{}", label, i + 1),
                category: query.category.to_string(),
                lat,
                lon,
            }
        })
        .collect()
}

fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}
