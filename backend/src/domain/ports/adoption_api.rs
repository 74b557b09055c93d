//! Driven ports for the third-party adoption-listing provider.
//!
//! Credentials never cross this boundary: the issuer adapter owns the client
//! secret and the domain only ever sees short-lived bearer tokens.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::adoption::{AccessToken, PetQuery, TokenGrant};

define_port_error! {
    /// Errors surfaced while calling the adoption provider.
    pub enum AdoptionApiError {
        /// No client credentials are configured.
        MissingCredentials => "adoption provider credentials are not configured",
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "adoption provider transport failed: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "adoption provider rejected request with status {status}: {message}",
        /// The provider body could not be decoded.
        Decode { message: String } =>
            "adoption provider response decode failed: {message}",
    }
}

/// Port for exchanging client credentials for a bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdoptionCredentialIssuer: Send + Sync {
    /// Request a fresh token.
    async fn issue_token(&self) -> Result<TokenGrant, AdoptionApiError>;
}

/// Port for listing adoptable animals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdoptionListingSource: Send + Sync {
    /// Fetch one page of listings; the body is returned untouched.
    async fn list_animals(
        &self,
        token: &AccessToken,
        query: &PetQuery,
    ) -> Result<Value, AdoptionApiError>;
}

/// Fixture provider with no credentials configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAdoptionProvider;

#[async_trait]
impl AdoptionCredentialIssuer for FixtureAdoptionProvider {
    async fn issue_token(&self) -> Result<TokenGrant, AdoptionApiError> {
        Err(AdoptionApiError::missing_credentials())
    }
}

#[async_trait]
impl AdoptionListingSource for FixtureAdoptionProvider {
    async fn list_animals(
        &self,
        _token: &AccessToken,
        _query: &PetQuery,
    ) -> Result<Value, AdoptionApiError> {
        Ok(serde_json::json!({ "animals": [] }))
    }
}
