//! Driving port for the adoption-listing proxy.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Error;
use crate::domain::adoption::PetQuery;

/// Domain use-case port for listing adoptable pets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdoptionListings: Send + Sync {
    /// Provider listing body for `query`, unchanged.
    async fn list_pets(&self, query: &PetQuery) -> Result<Value, Error>;
}

/// Fixture returning an empty listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdoptionListings;

#[async_trait]
impl AdoptionListings for FixtureAdoptionListings {
    async fn list_pets(&self, _query: &PetQuery) -> Result<Value, Error> {
        Ok(serde_json::json!({ "animals": [] }))
    }
}
