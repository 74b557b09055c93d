//! Client-side style filtering of a fetched spot list.

use super::{CategorySet, Spot};

/// Spots matching `categories` whose name contains `query`, case-insensitively.
///
/// Order is preserved and an empty query matches every name.
///
/// # Examples
/// ```
/// use pawscout::domain::explore::{filter_spots, CategorySet};
///
/// assert!(filter_spots(&[], &CategorySet::all(), "bark").is_empty());
/// ```
#[must_use]
pub fn filter_spots<'a>(spots: &'a [Spot], categories: &CategorySet, query: &str) -> Vec<&'a Spot> {
    let needle = query.to_lowercase();
    spots
        .iter()
        .filter(|spot| categories.contains(spot.category))
        .filter(|spot| needle.is_empty() || spot.name.to_lowercase().contains(&needle))
        .collect()
}
