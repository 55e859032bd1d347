//! IP-based position source
//!
//! Uses ip-api.com. Accuracy is city level at best, so fixes carry no
//! accuracy radius. Every fix is a fresh lookup.

use crate::constants::api::USER_AGENT;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::location::{FixOptions, LocationError, PositionFix, PositionSource};
use serde::Deserialize;
use tracing::{debug, instrument};

/// ip-api.com position source
#[derive(Debug, Clone)]
pub struct IpPositionSource {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpPositionSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Location(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn lookup(&self) -> std::result::Result<Coordinate, LocationError> {
        let unavailable = LocationError::PositionUnavailable;

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| unavailable(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(unavailable(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("Failed to parse IP location response: {}", e)))?;

        if data.status != "success" {
            return Err(unavailable(
                data.message.unwrap_or_else(|| "IP location lookup failed".to_string()),
            ));
        }

        let (Some(lat), Some(lng)) = (data.lat, data.lon) else {
            return Err(unavailable("No coordinates in response".to_string()));
        };

        let coordinate = Coordinate::new(lat, lng);
        coordinate
            .validate()
            .map_err(|e| unavailable(e.to_string()))?;
        Ok(coordinate)
    }
}

impl PositionSource for IpPositionSource {
    #[instrument(skip_all)]
    async fn current_position(
        &self,
        _options: &FixOptions,
    ) -> std::result::Result<PositionFix, LocationError> {
        let coordinate = self.lookup().await?;
        debug!(%coordinate, "IP location resolved");
        Ok(PositionFix::now(coordinate, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_answering(response: ResponseTemplate) -> (MockServer, IpPositionSource) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(response)
            .mount(&server)
            .await;
        let source = IpPositionSource::new(format!("{}/json", server.uri())).unwrap();
        (server, source)
    }

    #[tokio::test]
    async fn test_successful_lookup() {
        let (_server, source) = source_answering(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({
                "status": "success",
                "lat": 6.4474,
                "lon": 3.3903,
                "city": "Lagos",
                "country": "Nigeria"
            }),
        ))
        .await;

        let fix = source.current_position(&FixOptions::default()).await.unwrap();
        assert_eq!(fix.coordinate, Coordinate::new(6.4474, 3.3903));
        assert!(fix.accuracy_meters.is_none());
    }

    #[tokio::test]
    async fn test_failed_status_is_unavailable() {
        let (_server, source) = source_answering(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": "fail", "message": "reserved range"}),
        ))
        .await;

        let err = source.current_position(&FixOptions::default()).await.unwrap_err();
        assert_eq!(err, LocationError::PositionUnavailable("reserved range".to_string()));
    }

    #[tokio::test]
    async fn test_http_error_is_unavailable() {
        let (_server, source) = source_answering(ResponseTemplate::new(503)).await;

        let err = source.current_position(&FixOptions::default()).await.unwrap_err();
        assert!(matches!(err, LocationError::PositionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_coordinates_is_unavailable() {
        let (_server, source) = source_answering(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "success"})),
        )
        .await;

        let err = source.current_position(&FixOptions::default()).await.unwrap_err();
        assert!(matches!(err, LocationError::PositionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_every_fix_is_a_fresh_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"status": "success", "lat": 6.5, "lon": 3.4}),
            ))
            .expect(2)
            .mount(&server)
            .await;
        let source = IpPositionSource::new(server.uri()).unwrap();

        source.current_position(&FixOptions::default()).await.unwrap();
        source.current_position(&FixOptions::default()).await.unwrap();
    }
}
