//! Mood-based place recommendations.
//!
//! Users sign up, pick a mood and get nearby places of the matching category
//! ranked by distance, each with an estimated rating. Favorites are kept per
//! user in sqlite.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use state::AppState;
pub use web::build_router;
