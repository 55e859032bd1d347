//! Error types for route-planner

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for route-planner operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Location error: {0}")]
    Location(String),
}

/// Result type alias for route-planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// User-facing planning failures
///
/// None of these end a session: a new search or map selection can always be
/// issued afterwards. `Display` is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PlanningError {
    #[error("Destination not found.")]
    DestinationNotFound,

    #[error(
        "Route distance exceeds {}km limit for free API. Please choose a closer destination.",
        .limit_meters / 1000.0
    )]
    DistanceExceeded {
        distance_meters: f64,
        limit_meters: f64,
    },

    #[error("No route found.")]
    NoRoute,

    #[error("Error fetching route.")]
    ProviderUnavailable,

    #[error("Location unavailable or denied.")]
    LocationUnavailable,
}
