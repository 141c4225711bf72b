//! Weather lookup client for Skycast
//!
//! Provides geocoding and current/forecast weather data via the OpenWeather
//! API, plus a system location seam for coordinate-based lookups.

pub mod client;
pub mod location;
pub mod types;

pub use client::WeatherClient;
pub use location::{LocationSource, SystemLocation};
pub use types::*;
