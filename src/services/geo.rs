use thiserror::Error;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, PartialEq)]
#[error("invalid coordinates: lat={lat}, lon={lon}")]
pub struct InvalidCoordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinates> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Great-circle distance in kilometers, rounded to 2 decimals.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    round_to(EARTH_RADIUS_KM * c, 2)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
