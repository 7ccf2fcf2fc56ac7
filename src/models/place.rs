use serde::Serialize;

/// A candidate returned by a place source, before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    pub id: String,
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub lat: f64,
    pub lon: f64,
    pub distance: f64,
    pub rating: f64,
}

pub fn coordinate_id(lat: f64, lon: f64) -> String {
    format!("{}_{}", lat, lon)
}
