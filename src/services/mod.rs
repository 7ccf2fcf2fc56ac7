pub mod favorites_service;
pub mod geo;
pub mod mood;
pub mod password;
pub mod place_source;
pub mod places_service;
pub mod rating;
pub mod user_service;
