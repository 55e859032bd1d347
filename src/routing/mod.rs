//! Route providers
//!
//! This module defines the `RouteProvider` trait, the route types the rest of
//! the crate works with, and the normalization from a provider's GeoJSON
//! features into ranked candidates.
//!
//! ## Flex Point
//! Adding a new routing service requires:
//! 1. Create `src/routing/{service}.rs` implementing `RouteProvider`
//! 2. Add `pub mod {service};` below
//! 3. Convert its payload into [`Feature`]s and call [`normalize`]

pub mod openroute;

use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One complete path with its duration estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    /// 1 is the primary route; lower ranks are drawn more prominently
    pub rank: u32,
    pub duration_minutes: u32,
    /// At least two points, in (lat, lng) order
    pub path: Vec<Coordinate>,
    pub label: String,
}

impl RouteCandidate {
    pub fn is_primary(&self) -> bool {
        self.rank == 1
    }
}

/// Alternatives for one (origin, destination) pair
///
/// Built in one piece by [`normalize`] and only ever replaced whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSet {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub candidates: Vec<RouteCandidate>,
}

impl RouteSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Routing request failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The provider answered but had no route between the points
    #[error("No route found")]
    NoRoute,

    /// Network failure, non-success status or malformed payload
    #[error("Routing provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Trait for routing services
///
/// Implementations are stateless with respect to the planning session: a call
/// may be repeated and never mutates anything but its own connection pool.
pub trait RouteProvider: Send + Sync {
    /// Request up to `max_alternatives` driving routes from `origin` to
    /// `destination`; candidates are labelled "Route N to {destination_label}"
    fn fetch_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        max_alternatives: usize,
        destination_label: &str,
    ) -> impl std::future::Future<Output = Result<RouteSet, RouteError>> + Send;
}

/// GeoJSON feature as returned by directions services
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub properties: FeatureProperties,
    pub geometry: FeatureGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureProperties {
    pub summary: FeatureSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureSummary {
    /// Seconds; omitted by some providers when zero
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureGeometry {
    /// `[lng, lat]` pairs
    pub coordinates: Vec<[f64; 2]>,
}

/// Label for the route ranked `rank`
pub fn route_label(rank: u32, destination_label: &str) -> String {
    format!("Route {} to {}", rank, destination_label)
}

/// Whole minutes, rounded half up
pub fn duration_minutes(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds / 60.0).round() as u32
}

/// Turn provider features into a ranked route set
///
/// Features are ranked in response order. Features with fewer than two path
/// points are dropped; at most `max_alternatives` candidates are kept.
pub fn normalize(
    features: Vec<Feature>,
    origin: Coordinate,
    destination: Coordinate,
    max_alternatives: usize,
    destination_label: &str,
) -> Result<RouteSet, RouteError> {
    let candidates: Vec<RouteCandidate> = features
        .into_iter()
        .filter(|feature| feature.geometry.coordinates.len() >= 2)
        .take(max_alternatives)
        .zip(1u32..)
        .map(|(feature, rank)| RouteCandidate {
            rank,
            duration_minutes: duration_minutes(feature.properties.summary.duration),
            path: feature
                .geometry
                .coordinates
                .into_iter()
                .map(Coordinate::from_lng_lat)
                .collect(),
            label: route_label(rank, destination_label),
        })
        .collect();

    if candidates.is_empty() {
        return Err(RouteError::NoRoute);
    }

    Ok(RouteSet {
        origin,
        destination,
        candidates,
    })
}
