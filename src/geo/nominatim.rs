//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::config::GeocodingConfig;
use crate::constants::api::USER_AGENT;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, ResolvedPlace};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim reverse response
///
/// Points with nothing nearby come back as `200 {"error": "Unable to geocode"}`.
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    error: Option<String>,
}

impl NominatimBackend {
    /// Create a new Nominatim backend
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Geocoding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse lat/lng strings to a coordinate
    fn parse_coords(lat: &str, lng: &str) -> Result<Coordinate> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lng)))?;
        let coordinate = Coordinate::new(lat, lng);
        coordinate.validate()?;
        Ok(coordinate)
    }
}

impl GeoBackend for NominatimBackend {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<ResolvedPlace>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        match results.into_iter().next() {
            Some(result) => {
                let coordinate = Self::parse_coords(&result.lat, &result.lon)?;
                Ok(Some(ResolvedPlace::new(coordinate, result.display_name)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(&self, point: Coordinate) -> Result<Option<ResolvedPlace>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url, point.lat, point.lng
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: NominatimReverse = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        if let Some(message) = result.error {
            tracing::debug!(%message, "Nominatim has no name for point");
            return Ok(None);
        }

        Ok(result
            .display_name
            .map(|name| ResolvedPlace::new(point, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> NominatimBackend {
        let config = GeocodingConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        };
        NominatimBackend::new(&config).unwrap()
    }

    #[test]
    fn test_parse_coords() {
        let c = NominatimBackend::parse_coords("6.4281", "3.4219").unwrap();
        assert!((c.lat - 6.4281).abs() < 0.0001);
        assert!((c.lng - 3.4219).abs() < 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimBackend::parse_coords("invalid", "0").is_err());
        assert!(NominatimBackend::parse_coords("0", "invalid").is_err());
        assert!(NominatimBackend::parse_coords("91", "0").is_err());
    }

    #[tokio::test]
    async fn test_geocode_takes_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Lagos Island"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "6.4281", "lon": "3.4219", "display_name": "Lagos Island, Lagos"},
                {"lat": "1.0", "lon": "1.0", "display_name": "Somewhere else"}
            ])))
            .mount(&server)
            .await;

        let place = backend_for(&server)
            .geocode("Lagos Island")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(place.label, "Lagos Island, Lagos");
        assert_eq!(place.coordinate, Coordinate::new(6.4281, 3.4219));
    }

    #[tokio::test]
    async fn test_geocode_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        assert!(backend_for(&server).geocode("Atlantis").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(backend_for(&server).geocode("Ikeja").await.is_err());
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lat": "6.52",
                "lon": "3.37",
                "display_name": "Yaba, Lagos"
            })))
            .mount(&server)
            .await;

        let point = Coordinate::new(6.5244, 3.3792);
        let place = backend_for(&server).reverse_geocode(point).await.unwrap().unwrap();
        assert_eq!(place.label, "Yaba, Lagos");
        assert_eq!(place.coordinate, point);
    }

    #[tokio::test]
    async fn test_reverse_geocode_unable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"error": "Unable to geocode"})),
            )
            .mount(&server)
            .await;

        let result = backend_for(&server)
            .reverse_geocode(Coordinate::new(0.0, -30.0))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
