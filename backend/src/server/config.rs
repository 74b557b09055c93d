//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use pawscout::domain::explore::ExploreSessionConfig;
use pawscout::domain::ports::{AdoptionCredentialIssuer, AdoptionListingSource, GeoFeatureSource};
use pawscout::inbound::ws::origin::OriginAllowList;

/// Adapters and tunables the server wires into its handlers.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) geo_source: Arc<dyn GeoFeatureSource>,
    pub(crate) credential_issuer: Arc<dyn AdoptionCredentialIssuer>,
    pub(crate) listing_source: Arc<dyn AdoptionListingSource>,
    pub(crate) session_config: ExploreSessionConfig,
    pub(crate) allowed_origins: OriginAllowList,
}

impl ServerConfig {
    /// Construct a configuration around the outbound adapters.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        geo_source: Arc<dyn GeoFeatureSource>,
        credential_issuer: Arc<dyn AdoptionCredentialIssuer>,
        listing_source: Arc<dyn AdoptionListingSource>,
    ) -> Self {
        Self {
            bind_addr,
            geo_source,
            credential_issuer,
            listing_source,
            session_config: ExploreSessionConfig::default(),
            allowed_origins: OriginAllowList::default(),
        }
    }

    /// Override explore-session tunables such as the debounce window.
    #[must_use]
    pub fn with_session_config(mut self, session_config: ExploreSessionConfig) -> Self {
        self.session_config = session_config;
        self
    }

    /// Override the WebSocket origin allow-list.
    #[must_use]
    pub fn with_allowed_origins(mut self, allowed_origins: OriginAllowList) -> Self {
        self.allowed_origins = allowed_origins;
        self
    }
}
