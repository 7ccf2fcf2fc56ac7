pub mod auth;
pub mod favorites;
pub mod home;
pub mod places;
