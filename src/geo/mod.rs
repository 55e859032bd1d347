//! Geocoding module
//!
//! Turns free text into a place (forward) and a map point into a name
//! (reverse). Every call is a fresh lookup; nothing is cached.

pub mod nominatim;

use crate::coord::Coordinate;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// A resolved destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub coordinate: Coordinate,
    /// Display name (address or description)
    pub label: String,
}

impl ResolvedPlace {
    pub fn new(coordinate: Coordinate, label: impl Into<String>) -> Self {
        Self {
            coordinate,
            label: label.into(),
        }
    }
}

/// Forward geocoding produced no usable match
///
/// Covers both "zero matches" and "service unreachable": the remedy offered
/// to the user is the same.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No match for '{query}'")]
pub struct NotFound {
    pub query: String,
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to coordinates
    ///
    /// Returns the best match for the query, or None if not found
    fn geocode(&self, query: &str) -> impl std::future::Future<Output = Result<Option<ResolvedPlace>>> + Send;

    /// Reverse geocode coordinates to a location name
    fn reverse_geocode(&self, point: Coordinate) -> impl std::future::Future<Output = Result<Option<ResolvedPlace>>> + Send;
}

/// Resolves destinations through a [`GeoBackend`], applying the first-match
/// and fallback-label policies
#[derive(Debug, Clone)]
pub struct GeoResolver<B> {
    backend: B,
}

impl<B: GeoBackend> GeoResolver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve free text to a place, taking the first match
    pub async fn resolve_forward(&self, query: &str) -> std::result::Result<ResolvedPlace, NotFound> {
        let not_found = || NotFound {
            query: query.to_string(),
        };

        let query = query.trim();
        if query.is_empty() {
            return Err(not_found());
        }

        match self.backend.geocode(query).await {
            Ok(Some(place)) => {
                debug!(%query, coordinate = %place.coordinate, "Geocoded destination");
                Ok(place)
            }
            Ok(None) => {
                debug!(%query, "Geocoder returned no matches");
                Err(not_found())
            }
            Err(e) => {
                warn!(%query, error = %e, "Geocoding failed");
                Err(not_found())
            }
        }
    }

    /// Resolve a map point to a named place
    ///
    /// Never fails: when the service is down or knows no name for the point,
    /// the label falls back to the coordinate itself. The returned coordinate
    /// is always `point`, not the geocoder's nearest feature.
    pub async fn resolve_reverse(&self, point: Coordinate) -> ResolvedPlace {
        let label = match self.backend.reverse_geocode(point).await {
            Ok(Some(place)) if !place.label.trim().is_empty() => place.label,
            Ok(_) => {
                debug!(%point, "No name for point, using coordinate label");
                point.label()
            }
            Err(e) => {
                warn!(%point, error = %e, "Reverse geocoding failed, using coordinate label");
                point.label()
            }
        };

        ResolvedPlace::new(point, label)
    }
}
