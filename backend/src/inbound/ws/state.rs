//! Shared WebSocket adapter state.
//!
//! Upgrades depend on the outbound map-data port and session tunables
//! only, so tests can drive sessions with scripted sources.

use std::sync::Arc;

use crate::domain::explore::ExploreSessionConfig;
use crate::domain::ports::GeoFeatureSource;
use crate::inbound::ws::origin::OriginAllowList;

/// Dependency bundle for explore sessions.
#[derive(Clone)]
pub struct WsState {
    pub source: Arc<dyn GeoFeatureSource>,
    pub session_config: ExploreSessionConfig,
    pub allowed_origins: OriginAllowList,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        source: Arc<dyn GeoFeatureSource>,
        session_config: ExploreSessionConfig,
        allowed_origins: OriginAllowList,
    ) -> Self {
        Self {
            source,
            session_config,
            allowed_origins,
        }
    }
}
