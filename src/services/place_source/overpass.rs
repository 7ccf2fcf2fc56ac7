use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;

use super::{read_json, try_endpoints, PlaceQuery, PlaceSource, PlaceSourceError};
use crate::models::{place::coordinate_id, RawPlace};

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

pub struct OverpassSource {
    client: reqwest::Client,
    endpoints: Vec<String>,
    server_timeout: Duration,
}

impl OverpassSource {
    pub fn new(client: reqwest::Client, endpoints: Vec<String>, server_timeout: Duration) -> Self {
        Self {
            client,
            endpoints,
            server_timeout,
        }
    }

    fn build_query(&self, query: &PlaceQuery) -> String {
        format!(
            "[out:json][timeout:{}];node[amenity={}](around:{},{},{});out;",
            self.server_timeout.as_secs().max(1),
            query.category,
            query.radius_m,
            query.origin.lat(),
            query.origin.lon(),
        )
    }
}

#[async_trait]
impl PlaceSource for OverpassSource {
    fn name(&self) -> &'static str {
        "overpass"
    }

    async fn fetch(&self, query: &PlaceQuery) -> Result<Vec<RawPlace>, PlaceSourceError> {
        let body = self.build_query(query);
        let response: OverpassResponse = try_endpoints(&self.endpoints, |endpoint| {
            let request = self.client.post(&endpoint).form(&[("data", body.as_str())]);
            async move { read_json(&endpoint, request).await }
        })
        .await?;

        Ok(normalize(response))
    }
}

fn normalize(response: OverpassResponse) -> Vec<RawPlace> {
    response
        .elements
        .into_iter()
        .filter_map(|mut element| {
            let lat = element.lat?;
            let lon = element.lon?;
            let name = element
                .tags
                .remove("name")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Unnamed Place".to_string());
            let category = element
                .tags
                .remove("amenity")
                .unwrap_or_else(|| "unknown".to_string());

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
