//! Driving port for one-shot explore lookups.
//!
//! Backs the REST endpoints and the CLI. Live map sessions use
//! [`crate::domain::explore::ExploreSession`] instead.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::explore::{CategorySet, City, RegionCode, Spot, Viewport};

/// One spot search.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotSearchRequest {
    pub viewport: Viewport,
    pub categories: CategorySet,
    /// Free-text name filter; empty matches everything.
    pub text: String,
}

/// Domain use-case port for explore lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExploreQuery: Send + Sync {
    /// Spots inside the viewport, filtered by category and name.
    async fn search_spots(&self, request: &SpotSearchRequest) -> Result<Vec<Spot>, Error>;

    /// Named localities in a US region, sorted by name.
    async fn cities_for_region(&self, region: RegionCode) -> Result<Vec<City>, Error>;
}

/// Fixture query returning no results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExploreQuery;

#[async_trait]
impl ExploreQuery for FixtureExploreQuery {
    async fn search_spots(&self, _request: &SpotSearchRequest) -> Result<Vec<Spot>, Error> {
        Ok(Vec::new())
    }

    async fn cities_for_region(&self, _region: RegionCode) -> Result<Vec<City>, Error> {
        Ok(Vec::new())
    }
}
