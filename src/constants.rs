//! Centralized constants for the route-planner crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (spherical model)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Decimal places used when a coordinate stands in for a place name
    pub const LABEL_PRECISION: usize = 5;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// OpenRouteService API (free tier requires an API key)
    pub const OPENROUTESERVICE_URL: &str = "https://api.openrouteservice.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent to every external service
    pub const USER_AGENT: &str = concat!("route-planner/", env!("CARGO_PKG_VERSION"));
}

/// Routing limits
pub mod routing {
    /// Maximum great-circle distance the free routing tier accepts
    pub const DISTANCE_LIMIT_METERS: f64 = 150_000.0;

    /// Number of alternative routes requested per search
    pub const MAX_ALTERNATIVES: usize = 3;
}

/// Fallback origin used until (or unless) a live position is known
pub mod origin {
    /// Lagos, Nigeria
    pub const DEFAULT_LAT: f64 = 6.5244;
    pub const DEFAULT_LNG: f64 = 3.3792;
    pub const DEFAULT_LABEL: &str = "Lagos, Nigeria";
}
