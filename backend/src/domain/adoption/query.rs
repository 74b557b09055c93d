//! Listing filters forwarded to the adoption provider.

use serde::{Deserialize, Serialize};

/// Animal type requested when the caller gives none.
pub const DEFAULT_ANIMAL_TYPE: &str = "dog";
/// Page size requested when the caller gives none.
pub const DEFAULT_LIMIT: u32 = 20;
/// Postal code searched when the caller gives none.
pub const DEFAULT_LOCATION: &str = "10001";
/// Largest page size the provider accepts.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures for [`PetQuery`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetQueryError {
    #[error("limit must be between 1 and {MAX_LIMIT}, got {0}")]
    LimitOutOfRange(u32),
}

/// Validated adoption listing filters.
///
/// # Examples
/// ```
/// use pawscout::domain::adoption::PetQuery;
///
/// let query = PetQuery::new(None, None, Some("94110".to_owned())).expect("valid query");
/// assert_eq!(query.animal_type(), "dog");
/// assert_eq!(query.limit(), 20);
/// assert_eq!(query.location(), "94110");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetQuery {
    #[serde(rename = "type")]
    animal_type: String,
    limit: u32,
    location: String,
}

fn non_blank(value: Option<String>, fallback: &str) -> String {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

impl PetQuery {
    /// Build a query, substituting defaults for missing or blank values.
    ///
    /// # Errors
    ///
    /// Returns [`PetQueryError::LimitOutOfRange`] for limits outside
    /// `1..=MAX_LIMIT`.
    pub fn new(
        animal_type: Option<String>,
        limit: Option<u32>,
        location: Option<String>,
    ) -> Result<Self, PetQueryError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PetQueryError::LimitOutOfRange(limit));
        }
        Ok(Self {
            animal_type: non_blank(animal_type, DEFAULT_ANIMAL_TYPE),
            limit,
            location: non_blank(location, DEFAULT_LOCATION),
        })
    }

    #[must_use]
    pub fn animal_type(&self) -> &str {
        &self.animal_type
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Query-string pairs in provider order.
    #[must_use]
    pub fn to_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("type", self.animal_type.clone()),
            ("limit", self.limit.to_string()),
            ("location", self.location.clone()),
        ]
    }
}

impl Default for PetQuery {
    fn default() -> Self {
        Self {
            animal_type: DEFAULT_ANIMAL_TYPE.to_owned(),
            limit: DEFAULT_LIMIT,
            location: DEFAULT_LOCATION.to_owned(),
        }
    }
}
