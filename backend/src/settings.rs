//! Runtime settings loaded via OrthoConfig.
//!
//! Every field is optional; accessors fall back to the documented defaults.
//! Values come from `PAWSCOUT_*` environment variables, CLI flags, or a
//! configuration file.

use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::explore::DEFAULT_DEBOUNCE;
use crate::inbound::ws::origin::OriginAllowList;
use crate::outbound::overpass::DEFAULT_OVERPASS_ENDPOINT;
use crate::outbound::petfinder::{ClientCredentials, DEFAULT_PETFINDER_BASE_URL};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_OVERPASS_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PETFINDER_TIMEOUT_SECS: u64 = 15;

/// Server and adapter configuration.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PAWSCOUT")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Overpass interpreter URL.
    pub overpass_endpoint: Option<String>,
    /// Transport timeout for Overpass requests, in seconds.
    pub overpass_timeout_secs: Option<u64>,
    /// Quiet period before a viewport change triggers a fetch, in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Adoption provider API root.
    pub petfinder_base_url: Option<String>,
    pub petfinder_client_id: Option<String>,
    pub petfinder_client_secret: Option<String>,
    /// Comma-separated WebSocket origins; unset allows localhost with a port.
    pub allowed_origins: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("overpass_endpoint", &self.overpass_endpoint)
            .field("overpass_timeout_secs", &self.overpass_timeout_secs)
            .field("debounce_ms", &self.debounce_ms)
            .field("petfinder_base_url", &self.petfinder_base_url)
            .field("petfinder_client_id", &self.petfinder_client_id)
            .field(
                "petfinder_client_secret",
                &self.petfinder_client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

impl AppSettings {
    /// Bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    /// Overpass interpreter endpoint.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed URL.
    pub fn overpass_endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.overpass_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_OVERPASS_ENDPOINT),
        )
    }

    pub fn overpass_timeout(&self) -> Duration {
        Duration::from_secs(
            self.overpass_timeout_secs
                .unwrap_or(DEFAULT_OVERPASS_TIMEOUT_SECS),
        )
    }

    pub fn debounce(&self) -> Duration {
        self.debounce_ms
            .map_or(DEFAULT_DEBOUNCE, Duration::from_millis)
    }

    /// Adoption provider API root.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed URL.
    pub fn petfinder_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.petfinder_base_url
                .as_deref()
                .unwrap_or(DEFAULT_PETFINDER_BASE_URL),
        )
    }

    pub fn petfinder_timeout(&self) -> Duration {
        Duration::from_secs(DEFAULT_PETFINDER_TIMEOUT_SECS)
    }

    /// Provider credentials when both parts are set and non-blank.
    pub fn petfinder_credentials(&self) -> Option<ClientCredentials> {
        match (&self.petfinder_client_id, &self.petfinder_client_secret) {
            (Some(id), Some(secret)) => ClientCredentials::new(id.as_str(), secret.as_str()),
            _ => None,
        }
    }

    /// WebSocket origin allow-list.
    ///
    /// # Errors
    ///
    /// Returns the parse error of the first malformed entry.
    pub fn origin_allow_list(&self) -> Result<OriginAllowList, url::ParseError> {
        match self.allowed_origins.as_deref() {
            Some(raw) if !raw.trim().is_empty() => OriginAllowList::from_entries(raw.split(',')),
            _ => Ok(OriginAllowList::local_dev()),
        }
    }
}
