//! US regions and the localities inside them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Coordinates, RawElement};

const US_REGIONS: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Raised for codes outside the 50 states and DC.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown US region code: {0}")]
pub struct UnknownRegion(pub String);

/// Two-letter US state (or DC) code, stored upper-case.
///
/// # Examples
/// ```
/// use pawscout::domain::explore::RegionCode;
///
/// let region: RegionCode = "ny".parse().expect("known region");
/// assert_eq!(region.as_str(), "NY");
/// assert_eq!(region.name(), "New York");
/// assert!("ZZ".parse::<RegionCode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionCode {
    index: usize,
}

impl RegionCode {
    /// Every supported region in alphabetical order of name.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..US_REGIONS.len()).map(|index| Self { index })
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        US_REGIONS[self.index].0
    }

    /// Full region name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        US_REGIONS[self.index].1
    }
}

impl FromStr for RegionCode {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        US_REGIONS
            .iter()
            .position(|(candidate, _)| *candidate == code)
            .map(|index| Self { index })
            .ok_or(UnknownRegion(code))
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RegionCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RegionCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Named locality with a focus point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Place name as tagged by the source.
    pub name: String,
    pub coordinates: Coordinates,
}

/// Extract named localities, de-duplicated by name and sorted.
///
/// Coordinates prefer the provider centroid and fall back to the element's
/// own point. The first element seen for a name wins.
#[must_use]
pub fn collect_cities(elements: &[RawElement]) -> Vec<City> {
    let mut seen = HashSet::new();
    let mut cities: Vec<City> = elements
        .iter()
        .filter_map(|element| match element {
            RawElement::WellFormed(feature) => Some(feature),
            RawElement::Malformed { .. } => None,
        })
        .filter_map(|feature| {
            let name = feature.tags.get("name")?.trim();
            let coordinates = feature.center.or(feature.point)?;
            (!name.is_empty() && coordinates.is_valid()).then(|| City {
                name: name.to_owned(),
                coordinates,
            })
        })
        .filter(|city| seen.insert(city.name.clone()))
        .collect();
    cities.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    cities
}
