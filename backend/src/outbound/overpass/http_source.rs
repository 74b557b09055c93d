//! Reqwest-backed Overpass source adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout and
//! HTTP error mapping, and JSON decoding into raw elements.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::OverpassResponseDto;
use crate::domain::explore::{OverpassQuery, RawElement};
use crate::domain::ports::{GeoFeatureSource, GeoFeatureSourceError};

/// Public Overpass interpreter.
pub const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
const DEFAULT_USER_AGENT: &str = concat!("pawscout/", env!("CARGO_PKG_VERSION"));

/// Overpass source adapter that performs HTTP POST requests against one endpoint.
pub struct OverpassHttpSource {
    client: Client,
    endpoint: Url,
}

impl OverpassHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl GeoFeatureSource for OverpassHttpSource {
    async fn fetch_elements(
        &self,
        query: &OverpassQuery,
    ) -> Result<Vec<RawElement>, GeoFeatureSourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let elements = parse_elements(body.as_ref())?;
        debug!(
            count = elements.len(),
            bytes = body.len(),
            "decoded Overpass response"
        );
        Ok(elements)
    }
}

fn parse_elements(body: &[u8]) -> Result<Vec<RawElement>, GeoFeatureSourceError> {
    let decoded: OverpassResponseDto = serde_json::from_slice(body).map_err(|error| {
        GeoFeatureSourceError::decode(format!("invalid Overpass JSON payload: {error}"))
    })?;
    Ok(decoded.into_raw_elements())
}

fn map_transport_error(error: reqwest::Error) -> GeoFeatureSourceError {
    if error.is_timeout() {
        GeoFeatureSourceError::timeout(error.to_string())
    } else {
        GeoFeatureSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeoFeatureSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => GeoFeatureSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeoFeatureSourceError::timeout(message)
        }
        _ if status.is_client_error() => GeoFeatureSourceError::rejected(message),
        _ => GeoFeatureSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
