use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::services::place_source::PlaceSourceKind;
use crate::services::places_service::MAX_PLACES;

const DEFAULT_OVERPASS_URLS: &str =
    "https://overpass-api.de/api/interpreter,https://overpass.kumi.systems/api/interpreter";
const DEFAULT_NOMINATIM_URLS: &str = "https://nominatim.openstreetmap.org";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub session_ttl: Duration,
    pub place_source: PlaceSourceKind,
    pub overpass_urls: Vec<String>,
    pub nominatim_urls: Vec<String>,
    pub upstream_timeout: Duration,
    pub search_radius_m: u32,
    pub places_limit: usize,
    pub cache_capacity: u64,
    pub cache_ttl: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so callers can feed
    /// values from somewhere other than the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_secret = lookup("SESSION_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        if session_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "SESSION_SECRET",
                value: "<redacted>".to_string(),
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }

        let session_ttl_hours: u64 = try_load(&lookup, "SESSION_TTL_HOURS", "168")?;
        let session_ttl_secs = session_ttl_hours
            .checked_mul(60 * 60)
            .ok_or_else(|| ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
                reason: "too large".to_string(),
            })?;

        let timeout_secs: u64 = try_load(&lookup, "UPSTREAM_TIMEOUT_SECS", "20")?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "UPSTREAM_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        let cache_ttl = lookup("PLACES_CACHE_TTL_SECS")
            .map(|v| parse_value::<u64>("PLACES_CACHE_TTL_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);

        let places_limit: usize = try_load(&lookup, "PLACES_LIMIT", "25")?;
        if !(1..=MAX_PLACES).contains(&places_limit) {
            return Err(ConfigError::Invalid {
                key: "PLACES_LIMIT",
                value: places_limit.to_string(),
                reason: format!("must be between 1 and {MAX_PLACES}"),
            });
        }

        let overpass_urls = url_list(&lookup, "OVERPASS_URLS", DEFAULT_OVERPASS_URLS)?;
        let nominatim_urls = url_list(&lookup, "NOMINATIM_URLS", DEFAULT_NOMINATIM_URLS)?;

        Ok(Self {
            database_url: try_load(&lookup, "DATABASE_URL", "sqlite://spotfinder.db")?,
            host: try_load(&lookup, "HOST", "127.0.0.1")?,
            port: try_load(&lookup, "PORT", "3000")?,
            session_secret,
            session_ttl: Duration::from_secs(session_ttl_secs),
            place_source: try_load(&lookup, "PLACE_SOURCE", "overpass")?,
            overpass_urls,
            nominatim_urls,
            upstream_timeout: Duration::from_secs(timeout_secs),
            search_radius_m: try_load(&lookup, "SEARCH_RADIUS_M", "8000")?,
            places_limit,
            cache_capacity: try_load(&lookup, "PLACES_CACHE_CAPACITY", "1024")?,
            cache_ttl,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_value(key, &raw)
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })
}

fn url_list<F>(lookup: &F, key: &'static str, default: &str) -> Result<Vec<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    let urls: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    if urls.is_empty() {
        return Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "no endpoints listed".to_string(),
        });
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = config_from(&[("SESSION_SECRET", SECRET)]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.place_source, PlaceSourceKind::Overpass);
        assert_eq!(config.overpass_urls.len(), 2);
        assert_eq!(config.upstream_timeout, Duration::from_secs(20));
        assert_eq!(config.search_radius_m, 8000);
        assert_eq!(config.places_limit, 25);
        assert!(config.cache_ttl.is_none());
    }

    #[test]
    fn missing_secret_is_rejected() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SESSION_SECRET")));
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = config_from(&[("SESSION_SECRET", "short")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SESSION_SECRET", .. }));
    }

    #[test]
    fn bad_port_is_reported_with_its_key() {
        let err = config_from(&[("SESSION_SECRET", SECRET), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn endpoint_lists_are_split_and_trimmed() {
        let config = config_from(&[
            ("SESSION_SECRET", SECRET),
            ("OVERPASS_URLS", " http://a.test/api/ , ,http://b.test/api"),
            ("PLACE_SOURCE", "mock"),
            ("PLACES_CACHE_TTL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(
            config.overpass_urls,
            vec!["http://a.test/api".to_string(), "http://b.test/api".to_string()]
        );
        assert_eq!(config.place_source, PlaceSourceKind::Mock);
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn limit_outside_range_is_rejected() {
        for raw in ["0", "26", "100"] {
            let err = config_from(&[("SESSION_SECRET", SECRET), ("PLACES_LIMIT", raw)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "PLACES_LIMIT", .. }), "{raw}");
        }
        let config = config_from(&[("SESSION_SECRET", SECRET), ("PLACES_LIMIT", "25")]).unwrap();
        assert_eq!(config.places_limit, 25);
    }

    #[test]
    fn huge_session_ttl_is_rejected() {
        let hours = u64::MAX.to_string();
        let err = config_from(&[("SESSION_SECRET", SECRET), ("SESSION_TTL_HOURS", &hours)]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SESSION_TTL_HOURS", .. }));

        let config = config_from(&[("SESSION_SECRET", SECRET), ("SESSION_TTL_HOURS", "2")]).unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(7200));
    }

    #[test]
    fn zero_upstream_timeout_is_rejected() {
        let err = config_from(&[("SESSION_SECRET", SECRET), ("UPSTREAM_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "UPSTREAM_TIMEOUT_SECS", .. }));
    }
}
