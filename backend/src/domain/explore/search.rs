//! One-shot explore lookups backing the REST endpoints and the CLI.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{
    City, RegionCode, Spot, build_city_query, build_spot_query, collect_cities, filter_spots,
    normalize_elements,
};
use crate::domain::Error;
use crate::domain::ports::{ExploreQuery, GeoFeatureSource, GeoFeatureSourceError, SpotSearchRequest};

/// Explore query service over a [`GeoFeatureSource`].
#[derive(Clone)]
pub struct SpotSearchService {
    source: Arc<dyn GeoFeatureSource>,
}

impl SpotSearchService {
    #[must_use]
    pub fn new(source: Arc<dyn GeoFeatureSource>) -> Self {
        Self { source }
    }
}

fn map_source_error(error: GeoFeatureSourceError) -> Error {
    warn!(%error, "feature source lookup failed");
    if error.is_transient() {
        Error::service_unavailable("map data provider is unavailable")
    } else {
        Error::upstream_failed("map data provider returned an unusable response")
    }
}

#[async_trait]
impl ExploreQuery for SpotSearchService {
    async fn search_spots(&self, request: &SpotSearchRequest) -> Result<Vec<Spot>, Error> {
        let query = match build_spot_query(&request.viewport, &request.categories) {
            Ok(query) => query,
            Err(error) => {
                debug!(%error, "no categories requested; skipping lookup");
                return Ok(Vec::new());
            }
        };
        let elements = self
            .source
            .fetch_elements(&query)
            .await
            .map_err(map_source_error)?;
        let spots = normalize_elements(&elements);
        Ok(filter_spots(&spots, &request.categories, &request.text)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn cities_for_region(&self, region: RegionCode) -> Result<Vec<City>, Error> {
        let elements = self
            .source
            .fetch_elements(&build_city_query(&region))
            .await
            .map_err(map_source_error)?;
        Ok(collect_cities(&elements))
    }
}
