//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they stay testable without network I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdoptionListings, ExploreQuery, FixtureAdoptionListings, FixtureExploreQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub explore: Arc<dyn ExploreQuery>,
    pub adoption: Arc<dyn AdoptionListings>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use pawscout::domain::ports::{FixtureAdoptionListings, FixtureExploreQuery};
    /// use pawscout::inbound::http::state::HttpState;
    ///
    /// let _state = HttpState::new(Arc::new(FixtureExploreQuery), Arc::new(FixtureAdoptionListings));
    /// ```
    pub fn new(explore: Arc<dyn ExploreQuery>, adoption: Arc<dyn AdoptionListings>) -> Self {
        Self { explore, adoption }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureExploreQuery),
            Arc::new(FixtureAdoptionListings),
        )
    }
}
