//! Adoption-listing proxy: validated filters, token caching, and the service
//! that ties them to the provider ports.

mod query;
mod service;
mod token;

pub use query::{
    DEFAULT_ANIMAL_TYPE, DEFAULT_LIMIT, DEFAULT_LOCATION, MAX_LIMIT, PetQuery, PetQueryError,
};
pub use service::{AdoptionProxyService, UPSTREAM_FAILURE_MESSAGE};
pub use token::{AccessToken, TokenCache, TokenGrant};
