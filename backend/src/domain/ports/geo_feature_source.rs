//! Driven port for the geographic feature provider.
//!
//! Adapters post a rendered [`OverpassQuery`] and hand back decoded elements.
//! Decoding is per element: a single bad record becomes
//! [`RawElement::Malformed`] instead of failing the whole response.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::explore::{OverpassQuery, RawElement};

define_port_error! {
    /// Errors surfaced while calling the feature provider.
    pub enum GeoFeatureSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "feature source transport failed: {message}",
        /// The provider or the client timed out.
        Timeout { message: String } =>
            "feature source timeout: {message}",
        /// The provider rate-limited the request.
        RateLimited { message: String } =>
            "feature source rate limited request: {message}",
        /// The response body was not a feature collection.
        Decode { message: String } =>
            "feature source response decode failed: {message}",
        /// The provider refused the query.
        Rejected { message: String } =>
            "feature source rejected query: {message}",
    }
}

impl GeoFeatureSourceError {
    /// Whether the failure is likely transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for running feature queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoFeatureSource: Send + Sync {
    /// Execute `query` and return every element in the response.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use pawscout::domain::explore::OverpassQuery;
    /// use pawscout::domain::ports::{FixtureGeoFeatureSource, GeoFeatureSource};
    ///
    /// let source = FixtureGeoFeatureSource;
    /// let elements = source
    ///     .fetch_elements(&OverpassQuery::new("[out:json];out;"))
    ///     .await?;
    /// assert!(elements.is_empty());
    /// # Ok::<(), pawscout::domain::ports::GeoFeatureSourceError>(())
    /// ```
    async fn fetch_elements(
        &self,
        query: &OverpassQuery,
    ) -> Result<Vec<RawElement>, GeoFeatureSourceError>;
}

/// Fixture implementation returning no elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureGeoFeatureSource;

#[async_trait]
impl GeoFeatureSource for FixtureGeoFeatureSource {
    async fn fetch_elements(
        &self,
        _query: &OverpassQuery,
    ) -> Result<Vec<RawElement>, GeoFeatureSourceError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GeoFeatureSourceError::transport("reset"), true)]
    #[case(GeoFeatureSourceError::timeout("slow"), true)]
    #[case(GeoFeatureSourceError::rate_limited("429"), true)]
    #[case(GeoFeatureSourceError::decode("not json"), false)]
    #[case(GeoFeatureSourceError::rejected("bad query"), false)]
    fn classifies_transient_failures(#[case] error: GeoFeatureSourceError, #[case] expected: bool) {
        assert_eq!(error.is_transient(), expected);
    }

    #[tokio::test]
    async fn fixture_returns_no_elements() {
        let elements = FixtureGeoFeatureSource
            .fetch_elements(&OverpassQuery::new("[out:json];out;"))
            .await
            .expect("fixture never fails");
        assert!(elements.is_empty());
    }
}
