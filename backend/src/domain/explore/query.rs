//! Overpass QL query construction.
//!
//! Each requested category contributes an independent group of statements;
//! output is deterministic for a given viewport and category set.

use std::fmt;

use super::{CategorySet, RegionCode, SpotCategory, Viewport};

/// Server-side evaluation limit embedded in every query.
pub const QUERY_TIMEOUT_SECONDS: u32 = 25;

/// Rendered Overpass QL query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverpassQuery(String);

impl OverpassQuery {
    /// Wrap pre-rendered query text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failures raised while building a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryBuildError {
    /// No category was requested, so there is nothing to ask for.
    #[error("at least one spot category is required")]
    EmptyCategorySet,
}

fn category_statements(category: SpotCategory, bbox: &str) -> Vec<String> {
    match category {
        SpotCategory::Park => ["node", "way", "relation"]
            .into_iter()
            .map(|kind| format!(r#"{kind}["leisure"~"^(park|dog_park)$"]{bbox};"#))
            .collect(),
        SpotCategory::Cafe => [r#"["outdoor_seating"]"#, r#"["dogs"="yes"]"#]
            .into_iter()
            .flat_map(|filter| {
                ["node", "way"].into_iter().map(move |kind| {
                    format!(r#"{kind}["amenity"~"^(cafe|restaurant)$"]{filter}["name"]{bbox};"#)
                })
            })
            .collect(),
        SpotCategory::Trail => vec![
            format!(r#"way["highway"~"^(path|footway|track)$"]{bbox};"#),
            format!(r#"relation["route"="hiking"]{bbox};"#),
        ],
    }
}

/// Build the spot query for `viewport` and `categories`.
///
/// # Errors
///
/// Returns [`QueryBuildError::EmptyCategorySet`] when `categories` is empty.
///
/// # Examples
/// ```
/// use pawscout::domain::explore::{build_spot_query, CategorySet, SpotCategory, Viewport};
///
/// let viewport = Viewport::new(1.0, 2.0, 3.0, 4.0).expect("valid bounds");
/// let categories: CategorySet = [SpotCategory::Trail].into_iter().collect();
/// let query = build_spot_query(&viewport, &categories).expect("non-empty set");
/// assert!(query.as_str().starts_with("[out:json][timeout:25];("));
/// assert!(query.as_str().contains(r#"relation["route"="hiking"](1,2,3,4);"#));
/// ```
pub fn build_spot_query(
    viewport: &Viewport,
    categories: &CategorySet,
) -> Result<OverpassQuery, QueryBuildError> {
    if categories.is_empty() {
        return Err(QueryBuildError::EmptyCategorySet);
    }
    let bbox = viewport.bbox_clause();
    let statements: Vec<String> = categories
        .iter()
        .flat_map(|category| category_statements(category, &bbox))
        .collect();
    Ok(OverpassQuery(format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECONDS}];(\n{}\n);out center tags;",
        statements.join("\n")
    )))
}

/// Build the locality query for a US region.
#[must_use]
pub fn build_city_query(region: &RegionCode) -> OverpassQuery {
    let code = region.as_str();
    OverpassQuery(format!(
        concat!(
            "[out:json][timeout:{timeout}];\n",
            "area[\"ISO3166-2\"=\"US-{code}\"]->.state;\n",
            "(\n",
            "node[\"place\"~\"city|town\"](area.state);\n",
            "way[\"place\"~\"city|town\"](area.state);\n",
            "relation[\"place\"~\"city|town\"](area.state);\n",
            ");\n",
            "out center tags;"
        ),
        timeout = QUERY_TIMEOUT_SECONDS,
        code = code,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn viewport() -> Viewport {
        Viewport::new(40.7, -74.0, 40.8, -73.9).expect("valid bounds")
    }

    fn set(categories: &[SpotCategory]) -> CategorySet {
        categories.iter().copied().collect()
    }

    #[rstest]
    fn empty_category_set_is_rejected(viewport: Viewport) {
        assert_eq!(
            build_spot_query(&viewport, &CategorySet::default()),
            Err(QueryBuildError::EmptyCategorySet)
        );
    }

    #[rstest]
    fn cafe_only_query_has_no_other_clauses(viewport: Viewport) {
        let query = build_spot_query(&viewport, &set(&[SpotCategory::Cafe])).expect("query");
        let text = query.as_str();
        assert!(!text.contains("leisure"));
        assert!(!text.contains("highway"));
        assert!(!text.contains("route"));
        assert_eq!(
            text,
            concat!(
                "[out:json][timeout:25];(\n",
                "node[\"amenity\"~\"^(cafe|restaurant)$\"][\"outdoor_seating\"][\"name\"](40.7,-74,40.8,-73.9);\n",
                "way[\"amenity\"~\"^(cafe|restaurant)$\"][\"outdoor_seating\"][\"name\"](40.7,-74,40.8,-73.9);\n",
                "node[\"amenity\"~\"^(cafe|restaurant)$\"][\"dogs\"=\"yes\"][\"name\"](40.7,-74,40.8,-73.9);\n",
                "way[\"amenity\"~\"^(cafe|restaurant)$\"][\"dogs\"=\"yes\"][\"name\"](40.7,-74,40.8,-73.9);\n",
                ");out center tags;"
            )
        );
    }

    #[rstest]
    fn park_clause_covers_all_element_types(viewport: Viewport) {
        let query = build_spot_query(&viewport, &set(&[SpotCategory::Park])).expect("query");
        for kind in ["node", "way", "relation"] {
            assert!(
                query
                    .as_str()
                    .contains(&format!(r#"{kind}["leisure"~"^(park|dog_park)$"](40.7,-74,40.8,-73.9);"#)),
                "missing {kind} park statement"
            );
        }
        assert!(!query.as_str().contains("amenity"));
    }

    #[rstest]
    fn trail_clause_has_no_name_requirement(viewport: Viewport) {
        let query = build_spot_query(&viewport, &set(&[SpotCategory::Trail])).expect("query");
        assert!(!query.as_str().contains(r#"["name"]"#));
    }

    #[rstest]
    fn query_is_deterministic_regardless_of_insertion_order(viewport: Viewport) {
        let forward = set(&[SpotCategory::Park, SpotCategory::Cafe, SpotCategory::Trail]);
        let backward = set(&[SpotCategory::Trail, SpotCategory::Cafe, SpotCategory::Park]);
        let a = build_spot_query(&viewport, &forward).expect("query");
        let b = build_spot_query(&viewport, &backward).expect("query");
        assert_eq!(a, b);
        let text = a.as_str();
        let park = text.find("leisure").expect("park clause");
        let cafe = text.find("amenity").expect("cafe clause");
        let trail = text.find("highway").expect("trail clause");
        assert!(park < cafe && cafe < trail);
    }

    #[test]
    fn city_query_targets_region_area() {
        let region: RegionCode = "ca".parse().expect("valid region");
        let query = build_city_query(&region);
        assert!(query.as_str().contains(r#"area["ISO3166-2"="US-CA"]->.state;"#));
        assert!(query.as_str().contains(r#"relation["place"~"city|town"](area.state);"#));
        assert!(query.as_str().ends_with("out center tags;"));
    }
}
