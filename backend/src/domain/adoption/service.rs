//! Adoption listing proxy service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, warn};

use super::{PetQuery, TokenCache};
use crate::domain::Error;
use crate::domain::ports::{
    AdoptionApiError, AdoptionCredentialIssuer, AdoptionListingSource, AdoptionListings,
};

/// Message returned when the provider refuses a listing request.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch pets from Petfinder";

/// Proxies listing requests, attaching a cached bearer token.
pub struct AdoptionProxyService {
    issuer: Arc<dyn AdoptionCredentialIssuer>,
    listings: Arc<dyn AdoptionListingSource>,
    tokens: Arc<TokenCache>,
}

impl AdoptionProxyService {
    #[must_use]
    pub fn new(
        issuer: Arc<dyn AdoptionCredentialIssuer>,
        listings: Arc<dyn AdoptionListingSource>,
        tokens: Arc<TokenCache>,
    ) -> Self {
        Self {
            issuer,
            listings,
            tokens,
        }
    }
}

fn map_token_error(err: AdoptionApiError) -> Error {
    match err {
        AdoptionApiError::MissingCredentials => {
            warn!("adoption listing requested without configured credentials");
            Error::service_unavailable("adoption listings are not configured")
        }
        other => {
            error!(error = %other, "adoption token request failed");
            Error::upstream_failed(format!("Failed to fetch Petfinder token: {other}"))
        }
    }
}

fn map_listing_error(err: AdoptionApiError) -> Error {
    match err {
        AdoptionApiError::Rejected { status, message } => {
            error!(status, body = %message, "adoption provider rejected listing request");
            Error::upstream_failed(UPSTREAM_FAILURE_MESSAGE)
        }
        AdoptionApiError::MissingCredentials => {
            Error::service_unavailable("adoption listings are not configured")
        }
        other => {
            error!(error = %other, "adoption listing request failed");
            Error::upstream_failed(UPSTREAM_FAILURE_MESSAGE)
        }
    }
}

#[async_trait]
impl AdoptionListings for AdoptionProxyService {
    async fn list_pets(&self, query: &PetQuery) -> Result<Value, Error> {
        let token = self
            .tokens
            .get_or_refresh(|| self.issuer.issue_token())
            .await
            .map_err(map_token_error)?;
        let result = self.listings.list_animals(&token, query).await;
        if let Err(AdoptionApiError::Rejected { status: 401, .. }) = &result {
            // Provider revoked the token early; the next call fetches a new one.
            self.tokens.invalidate().await;
        }
        result.map_err(map_listing_error)
    }
}
