//! OpenRouteService directions backend
//!
//! Uses the GeoJSON flavour of the directions endpoint:
//! `POST {base_url}/v2/directions/{profile}/geojson`
//!
//! The free tier needs an API key (sent as the `Authorization` header) and
//! rejects very long routes, which is why the planner gates on distance
//! before calling in here.

use crate::config::RoutingConfig;
use crate::constants::api::USER_AGENT;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::routing::{normalize, Feature, RouteError, RouteProvider, RouteSet};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// OpenRouteService client
#[derive(Debug, Clone)]
pub struct OpenRouteClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    share_factor: f64,
    weight_factor: f64,
}

/// Directions request body
#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: [[f64; 2]; 2],
    instructions: bool,
    alternative_routes: AlternativeRoutes,
}

#[derive(Debug, Serialize)]
struct AlternativeRoutes {
    target_count: usize,
    share_factor: f64,
    weight_factor: f64,
}

/// Directions response; only the features are used
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

/// Error body, e.g. `{"error": {"code": 2010, "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: serde_json::Value,
}

impl OpenRouteClient {
    /// Create a new client
    pub fn new(config: &RoutingConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Routing(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/v2/directions/{}/geojson",
            config.base_url.trim_end_matches('/'),
            config.profile
        );

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            share_factor: config.share_factor,
            weight_factor: config.weight_factor,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        max_alternatives: usize,
    ) -> DirectionsRequest {
        DirectionsRequest {
            coordinates: [origin.to_lng_lat(), destination.to_lng_lat()],
            instructions: false,
            alternative_routes: AlternativeRoutes {
                target_count: max_alternatives,
                share_factor: self.share_factor,
                weight_factor: self.weight_factor,
            },
        }
    }
}

impl RouteProvider for OpenRouteClient {
    #[instrument(skip(self))]
    async fn fetch_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        max_alternatives: usize,
        destination_label: &str,
    ) -> std::result::Result<RouteSet, RouteError> {
        let body = self.request_body(origin, destination, max_alternatives);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenRouteService request failed");
                RouteError::ProviderUnavailable(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.error.to_string(),
                Err(_) => String::from("no error body"),
            };
            warn!(%status, %detail, "OpenRouteService returned an error");
            return Err(RouteError::ProviderUnavailable(format!(
                "status {}: {}",
                status, detail
            )));
        }

        let collection: FeatureCollection = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse OpenRouteService response");
            RouteError::ProviderUnavailable(format!("malformed response: {}", e))
        })?;

        debug!(features = collection.features.len(), "OpenRouteService answered");
        normalize(
            collection.features,
            origin,
            destination,
            max_alternatives,
            destination_label,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenRouteClient {
        let config = RoutingConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            ..RoutingConfig::default()
        };
        OpenRouteClient::new(&config, "test-key").unwrap()
    }

    fn origin() -> Coordinate {
        Coordinate::new(6.5244, 3.3792)
    }

    fn destination() -> Coordinate {
        Coordinate::new(6.4281, 3.4219)
    }

    fn two_routes() -> serde_json::Value {
        serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"summary": {"distance": 14000.0, "duration": 925.0}},
                    "geometry": {"type": "LineString", "coordinates": [[3.3792, 6.5244], [3.40, 6.47], [3.4219, 6.4281]]}
                },
                {
                    "type": "Feature",
                    "properties": {"summary": {"distance": 16500.0, "duration": 1110.0}},
                    "geometry": {"type": "LineString", "coordinates": [[3.3792, 6.5244], [3.4219, 6.4281]]}
                }
            ]
        })
    }

    #[test]
    fn test_endpoint() {
        let config = RoutingConfig {
            base_url: "https://api.example.org/".to_string(),
            ..RoutingConfig::default()
        };
        let client = OpenRouteClient::new(&config, "").unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.example.org/v2/directions/driving-car/geojson"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = OpenRouteClient::new(&RoutingConfig::default(), "").unwrap();
        let body = serde_json::to_value(client.request_body(origin(), destination(), 3)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "coordinates": [[3.3792, 6.5244], [3.4219, 6.4281]],
                "instructions": false,
                "alternative_routes": {"target_count": 3, "share_factor": 0.6, "weight_factor": 1.4}
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_routes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/directions/driving-car/geojson"))
            .and(header("Authorization", "test-key"))
            .and(body_json(serde_json::json!({
                "coordinates": [[3.3792, 6.5244], [3.4219, 6.4281]],
                "instructions": false,
                "alternative_routes": {"target_count": 3, "share_factor": 0.6, "weight_factor": 1.4}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(two_routes()))
            .expect(1)
            .mount(&server)
            .await;

        let set = client_for(&server)
            .fetch_routes(origin(), destination(), 3, "Lagos Island")
            .await
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.candidates[0].duration_minutes, 15);
        assert_eq!(set.candidates[1].duration_minutes, 19);
        assert_eq!(set.candidates[0].path[0], origin());
        assert_eq!(set.candidates[1].label, "Route 2 to Lagos Island");
    }

    #[tokio::test]
    async fn test_no_features_is_no_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"type": "FeatureCollection", "features": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_routes(origin(), destination(), 3, "x")
            .await
            .unwrap_err();
        assert_eq!(err, RouteError::NoRoute);
    }

    #[tokio::test]
    async fn test_error_status_is_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": "Access to this API has been disallowed"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_routes(origin(), destination(), 3, "x")
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_routes(origin(), destination(), 3, "x")
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_is_provider_unavailable() {
        let config = RoutingConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..RoutingConfig::default()
        };
        let client = OpenRouteClient::new(&config, "").unwrap();

        let err = client
            .fetch_routes(origin(), destination(), 3, "x")
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::ProviderUnavailable(_)));
    }
}
