use async_trait::async_trait;
use serde::Deserialize;

use super::{read_json, try_endpoints, PlaceQuery, PlaceSource, PlaceSourceError};
use crate::models::{place::coordinate_id, RawPlace};

const KM_PER_DEGREE: f64 = 111.32;
const RESULT_LIMIT: &str = "50";

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: Option<String>,
    lon: Option<String>,
    name: Option<String>,
    display_name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub struct NominatimSource {
    client: reqwest::Client,
    endpoints: Vec<String>,
}

impl NominatimSource {
    pub fn new(client: reqwest::Client, endpoints: Vec<String>) -> Self {
        Self { client, endpoints }
    }
}

#[async_trait]
impl PlaceSource for NominatimSource {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn fetch(&self, query: &PlaceQuery) -> Result<Vec<RawPlace>, PlaceSourceError> {
        let viewbox = viewbox(query);
        let hits: Vec<NominatimHit> = try_endpoints(&self.endpoints, |endpoint| {
            let url = format!("{}/search", endpoint);
            let request = self.client.get(&url).query(&[
                ("q", query.category),
                ("format", "jsonv2"),
                ("limit", RESULT_LIMIT),
                ("bounded", "1"),
                ("viewbox", viewbox.as_str()),
            ]);
            async move { read_json(&endpoint, request).await }
        })
        .await?;

        Ok(normalize(hits, query.category))
    }
}

/// `left,top,right,bottom` box covering the search radius around the origin.
fn viewbox(query: &PlaceQuery) -> String {
    let radius_km = query.radius_m as f64 / 1000.0;
    let lat = query.origin.lat();
    let lon = query.origin.lon();
    let dlat = radius_km / KM_PER_DEGREE;
    let dlon = radius_km / (KM_PER_DEGREE * lat.to_radians().cos().abs().max(0.01));

    format!(
        "{:.6},{:.6},{:.6},{:.6}",
        (lon - dlon).max(-180.0),
        (lat + dlat).min(90.0),
        (lon + dlon).min(180.0),
        (lat - dlat).max(-90.0),
    )
}

fn normalize(hits: Vec<NominatimHit>, fallback_category: &str) -> Vec<RawPlace> {
    hits.into_iter()
        .filter_map(|hit| {
            let lat = hit.lat.as_deref()?.trim().parse::<f64>().ok()?;
            let lon = hit.lon.as_deref()?.trim().parse::<f64>().ok()?;

            let name = hit
                .name
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    hit.display_name
                        .as_deref()
                        .and_then(|d| d.split(',').next())
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                })
                .unwrap_or_else(|| "Unnamed Place".to_string());

            let category = hit
                .kind
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| fallback_category.to_string());

            Some(RawPlace {
                id: coordinate_id(lat, lon),
                name,
                category,
                lat,
                lon,
            })
        })
        .collect()
}
