//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod adoption_api;
mod adoption_listings;
mod explore_query;
mod geo_feature_source;

#[cfg(test)]
pub use adoption_api::{MockAdoptionCredentialIssuer, MockAdoptionListingSource};
pub use adoption_api::{
    AdoptionApiError, AdoptionCredentialIssuer, AdoptionListingSource, FixtureAdoptionProvider,
};
#[cfg(test)]
pub use adoption_listings::MockAdoptionListings;
pub use adoption_listings::{AdoptionListings, FixtureAdoptionListings};
#[cfg(test)]
pub use explore_query::MockExploreQuery;
pub use explore_query::{ExploreQuery, FixtureExploreQuery, SpotSearchRequest};
#[cfg(test)]
pub use geo_feature_source::MockGeoFeatureSource;
pub use geo_feature_source::{FixtureGeoFeatureSource, GeoFeatureSource, GeoFeatureSourceError};
