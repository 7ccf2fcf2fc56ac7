//! Upstream place providers.
//!
//! Every provider turns a [`PlaceQuery`] into a list of [`RawPlace`]s. The
//! HTTP-backed providers walk their configured endpoints in order and stop at
//! the first one that answers with a decodable payload; a provider only
//! reports [`PlaceSourceError::Unavailable`] once every endpoint has failed.

pub mod mock;
pub mod nominatim;
pub mod overpass;

use std::{future::Future, str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::RawPlace;
use crate::services::geo::Coordinates;

pub use mock::MockSource;
pub use nominatim::NominatimSource;
pub use overpass::OverpassSource;

const USER_AGENT: &str = concat!("spotfinder/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub origin: Coordinates,
    pub category: &'static str,
    pub radius_m: u32,
}

#[derive(Debug, Error)]
pub enum PlaceSourceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("all {attempts} endpoints failed, last error: {last}")]
    Unavailable {
        attempts: usize,
        last: Box<PlaceSourceError>,
    },
}

#[async_trait]
pub trait PlaceSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, query: &PlaceQuery) -> Result<Vec<RawPlace>, PlaceSourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceSourceKind {
    Overpass,
    Nominatim,
    Mock,
}

impl FromStr for PlaceSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overpass" => Ok(PlaceSourceKind::Overpass),
            "nominatim" => Ok(PlaceSourceKind::Nominatim),
            "mock" => Ok(PlaceSourceKind::Mock),
            other => Err(format!(
                "unknown place source '{other}' (expected overpass, nominatim or mock)"
            )),
        }
    }
}

pub fn build_place_source(config: &Config) -> Result<Arc<dyn PlaceSource>, reqwest::Error> {
    let source: Arc<dyn PlaceSource> = match config.place_source {
        PlaceSourceKind::Overpass => Arc::new(OverpassSource::new(
            http_client(config)?,
            config.overpass_urls.clone(),
            config.upstream_timeout,
        )),
        PlaceSourceKind::Nominatim => Arc::new(NominatimSource::new(
            http_client(config)?,
            config.nominatim_urls.clone(),
        )),
        PlaceSourceKind::Mock => Arc::new(MockSource::default()),
    };
    Ok(source)
}

fn http_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.upstream_timeout)
        .build()
}

/// Runs `attempt` against each endpoint in order, returning the first success.
pub(crate) async fn try_endpoints<T, F, Fut>(
    endpoints: &[String],
    mut attempt: F,
) -> Result<T, PlaceSourceError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, PlaceSourceError>>,
{
    let mut last = None;
    for endpoint in endpoints {
        match attempt(endpoint.clone()).await {
            Ok(value) => {
                debug!(endpoint = %endpoint, "Place upstream answered");
                return Ok(value);
            }
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "📍 Place upstream failed, trying next");
                last = Some(e);
            }
        }
    }

    match last {
        Some(e) => Err(PlaceSourceError::Unavailable {
            attempts: endpoints.len(),
            last: Box::new(e),
        }),
        None => Err(PlaceSourceError::NoEndpoints),
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, PlaceSourceError> {
    let resp = request
        .send()
        .await
        .map_err(|source| PlaceSourceError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PlaceSourceError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp
        .bytes()
        .await
        .map_err(|source| PlaceSourceError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

    serde_json::from_slice(&body).map_err(|e| PlaceSourceError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}
