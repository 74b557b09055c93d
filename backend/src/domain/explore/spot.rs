//! Normalised points of interest shown on the explore map.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of spot categories.
///
/// The declaration order is the canonical order used when rendering queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotCategory {
    /// Off-leash recreation areas and dog parks.
    Park,
    /// Pet-friendly eateries.
    Cafe,
    /// Walking trails.
    Trail,
}

impl SpotCategory {
    /// Every category in canonical order.
    pub const ALL: [Self; 3] = [Self::Park, Self::Cafe, Self::Trail];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Park => "park",
            Self::Cafe => "cafe",
            Self::Trail => "trail",
        }
    }

    /// Map marker colour as a hex triplet.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Park => "#7C8A6A",
            Self::Cafe => "#C98B6B",
            Self::Trail => "#D8C3A5",
        }
    }

    /// Display name used when the source record has none.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Trail => "Trail",
            Self::Park | Self::Cafe => "Unnamed",
        }
    }
}

impl fmt::Display for SpotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a category name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown spot category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for SpotCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "park" => Ok(Self::Park),
            "cafe" => Ok(Self::Cafe),
            "trail" => Ok(Self::Trail),
            other => Err(UnknownCategory(other.to_owned())),
        }
    }
}

/// Set of active categories, iterated in canonical order.
///
/// # Examples
/// ```
/// use pawscout::domain::explore::{CategorySet, SpotCategory};
///
/// let set = CategorySet::parse_list("trail, park").expect("valid list");
/// let ordered: Vec<_> = set.iter().collect();
/// assert_eq!(ordered, [SpotCategory::Park, SpotCategory::Trail]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<SpotCategory>);

impl CategorySet {
    /// Set holding every category.
    #[must_use]
    pub fn all() -> Self {
        SpotCategory::ALL.into_iter().collect()
    }

    /// Parse a comma-separated list; blank entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCategory`] for the first unrecognised entry.
    pub fn parse_list(raw: &str) -> Result<Self, UnknownCategory> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(SpotCategory::from_str)
            .collect()
    }

    /// Whether `category` is selected.
    #[must_use]
    pub fn contains(&self, category: SpotCategory) -> bool {
        self.0.contains(&category)
    }

    /// True when no category is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = SpotCategory> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<SpotCategory> for CategorySet {
    fn from_iter<I: IntoIterator<Item = SpotCategory>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Pair the components without validating them.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and inside WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Amenity labels derived from source tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amenity {
    #[serde(rename = "Outdoor Seating")]
    OutdoorSeating,
    #[serde(rename = "Dogs Allowed")]
    DogsAllowed,
    #[serde(rename = "Water")]
    Water,
}

impl Amenity {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutdoorSeating => "Outdoor Seating",
            Self::DogsAllowed => "Dogs Allowed",
            Self::Water => "Water",
        }
    }
}

/// Normalised point of interest.
///
/// ## Invariants
/// - `coordinates` are finite and inside WGS84 ranges.
/// - `id` has the form `<element type>:<numeric id>`.
/// - `amenities` follow the order outdoor seating, dogs allowed, water.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    /// Stable `<element type>:<numeric id>` key.
    pub id: String,
    /// Source name, or the category's default name.
    pub name: String,
    pub category: SpotCategory,
    pub coordinates: Coordinates,
    pub amenities: Vec<Amenity>,
    /// Raw attribute keys carried by the source record.
    pub source_tags: BTreeSet<String>,
}

impl Spot {
    /// Marker colour for this spot's category.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        self.category.color()
    }
}
