//! Petfinder outbound adapter implementing the adoption provider ports.

mod credentials;
mod http_client;

pub use credentials::ClientCredentials;
pub use http_client::{DEFAULT_PETFINDER_BASE_URL, PetfinderHttpClient};
