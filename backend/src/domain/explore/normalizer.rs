//! Mapping of raw geographic records into [`Spot`]s.
//!
//! Records arrive weakly typed; anything that fails to decode becomes
//! [`RawElement::Malformed`] and is dropped here.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::debug;

use super::{Amenity, Coordinates, Spot, SpotCategory};

/// Overpass element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Single point.
    Node,
    /// Open or closed line; positioned by its centre.
    Way,
    /// Group of members; positioned by its centre.
    Relation,
}

impl ElementKind {
    /// Wire name used in spot ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded element with optional geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub kind: ElementKind,
    /// Provider id, unique within `kind`.
    pub id: i64,
    /// Own coordinates, present on nodes.
    pub point: Option<Coordinates>,
    /// Centroid computed by the provider for ways and relations.
    pub center: Option<Coordinates>,
    /// Free-form key/value tags.
    pub tags: BTreeMap<String, String>,
}

impl RawFeature {
    fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    fn has_tag_value(&self, key: &str, value: &str) -> bool {
        self.tag(key) == Some(value)
    }

    fn has_non_empty_tag(&self, key: &str) -> bool {
        self.tag(key).is_some_and(|value| !value.is_empty())
    }

    /// Nodes resolve through their own point, everything else through the
    /// provider centroid.
    fn resolve_coordinates(&self) -> Option<Coordinates> {
        let coords = match self.kind {
            ElementKind::Node => self.point,
            ElementKind::Way | ElementKind::Relation => self.center,
        }?;
        coords.is_valid().then_some(coords)
    }

    fn infer_category(&self) -> Option<SpotCategory> {
        let mut category = None;
        if matches!(self.tag("leisure"), Some("park" | "dog_park")) {
            category = Some(SpotCategory::Park);
        }
        let eatery = matches!(self.tag("amenity"), Some("cafe" | "restaurant"));
        if eatery
            && (self.has_non_empty_tag("outdoor_seating") || self.has_tag_value("dogs", "yes"))
        {
            category = category.or(Some(SpotCategory::Cafe));
        }
        // Trail wins over any earlier assignment.
        let trail_way = self.kind == ElementKind::Way
            && matches!(self.tag("highway"), Some("path" | "footway" | "track"));
        if trail_way || self.has_tag_value("route", "hiking") {
            category = Some(SpotCategory::Trail);
        }
        category
    }

    fn amenities(&self) -> Vec<Amenity> {
        let mut amenities = Vec::new();
        if self.has_non_empty_tag("outdoor_seating") {
            amenities.push(Amenity::OutdoorSeating);
        }
        if self.has_tag_value("dogs", "yes") {
            amenities.push(Amenity::DogsAllowed);
        }
        if self.has_tag_value("drinking_water", "yes") {
            amenities.push(Amenity::Water);
        }
        amenities
    }

    /// Stable identifier, `<type>:<id>`.
    #[must_use]
    pub fn spot_id(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }
}

/// Element as received from the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum RawElement {
    WellFormed(RawFeature),
    Malformed { reason: String },
}

/// Reasons an element produced no spot.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DropReason<'a> {
    Malformed(&'a str),
    NoCoordinates,
    NoCategory,
}

fn classify(element: &RawElement) -> Result<Spot, DropReason<'_>> {
    let feature = match element {
        RawElement::WellFormed(feature) => feature,
        RawElement::Malformed { reason } => return Err(DropReason::Malformed(reason)),
    };
    let coordinates = feature
        .resolve_coordinates()
        .ok_or(DropReason::NoCoordinates)?;
    let category = feature.infer_category().ok_or(DropReason::NoCategory)?;
    let name = feature
        .tag("name")
        .filter(|name| !name.is_empty())
        .unwrap_or(category.default_name())
        .to_owned();
    Ok(Spot {
        id: feature.spot_id(),
        name,
        category,
        coordinates,
        amenities: feature.amenities(),
        source_tags: feature.tags.keys().cloned().collect(),
    })
}

/// Normalise one element, or `None` when it cannot be displayed.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use pawscout::domain::explore::{
///     normalize_element, Coordinates, ElementKind, RawElement, RawFeature, SpotCategory,
/// };
///
/// let element = RawElement::WellFormed(RawFeature {
///     kind: ElementKind::Node,
///     id: 7,
///     point: Some(Coordinates::new(40.7, -74.0)),
///     center: None,
///     tags: BTreeMap::from([("leisure".to_owned(), "dog_park".to_owned())]),
/// });
/// let spot = normalize_element(&element).expect("park spot");
/// assert_eq!(spot.id, "node:7");
/// assert_eq!(spot.category, SpotCategory::Park);
/// assert_eq!(spot.name, "Unnamed");
/// ```
#[must_use]
pub fn normalize_element(element: &RawElement) -> Option<Spot> {
    classify(element).ok()
}

/// Normalise a fetch result, keeping the first spot seen for each id.
#[must_use]
pub fn normalize_elements(elements: &[RawElement]) -> Vec<Spot> {
    let mut seen = HashSet::new();
    let mut spots = Vec::with_capacity(elements.len());
    for element in elements {
        match classify(element) {
            Ok(spot) => {
                if seen.insert(spot.id.clone()) {
                    spots.push(spot);
                } else {
                    debug!(spot_id = %spot.id, "dropping duplicate element");
                }
            }
            Err(DropReason::Malformed(reason)) => {
                debug!(%reason, "dropping malformed element");
            }
            Err(reason) => {
                debug!(?reason, "dropping element without spot mapping");
            }
        }
    }
    spots
}
