//! DTOs for decoding Overpass JSON responses.
//!
//! The envelope must decode; each element is then decoded on its own so a
//! single bad record becomes [`RawElement::Malformed`].

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::explore::{Coordinates, ElementKind, RawElement, RawFeature};

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OverpassElementDto {
    #[serde(rename = "type")]
    element_type: String,
    id: i64,
    lon: Option<f64>,
    lat: Option<f64>,
    center: Option<OverpassElementCenterDto>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassElementCenterDto {
    lon: f64,
    lat: f64,
}

impl OverpassResponseDto {
    pub(super) fn into_raw_elements(self) -> Vec<RawElement> {
        self.elements.into_iter().map(decode_element).collect()
    }
}

fn decode_element(value: Value) -> RawElement {
    match serde_json::from_value::<OverpassElementDto>(value) {
        Ok(dto) => dto.into_raw_element(),
        Err(error) => RawElement::Malformed {
            reason: error.to_string(),
        },
    }
}

impl OverpassElementDto {
    fn into_raw_element(self) -> RawElement {
        let kind = match self.element_type.as_str() {
            "node" => ElementKind::Node,
            "way" => ElementKind::Way,
            "relation" => ElementKind::Relation,
            other => {
                return RawElement::Malformed {
                    reason: format!("element {} has unknown type {other:?}", self.id),
                };
            }
        };
        let point = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };
        RawElement::WellFormed(RawFeature {
            kind,
            id: self.id,
            point,
            center: self
                .center
                .map(|center| Coordinates::new(center.lat, center.lon)),
            tags: self.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(body: Value) -> Vec<RawElement> {
        serde_json::from_value::<OverpassResponseDto>(body)
            .expect("envelope decodes")
            .into_raw_elements()
    }

    #[test]
    fn keeps_node_point_and_way_center() {
        let elements = decode(json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 1.5, "lon": 2.5, "tags": {"name": "A"}},
                {"type": "way", "id": 2, "center": {"lat": 3.0, "lon": 4.0}}
            ]
        }));

        let RawElement::WellFormed(node) = &elements[0] else {
            panic!("node should decode");
        };
        assert_eq!(node.kind, ElementKind::Node);
        assert_eq!(node.point, Some(Coordinates::new(1.5, 2.5)));
        assert_eq!(node.tags.get("name").map(String::as_str), Some("A"));

        let RawElement::WellFormed(way) = &elements[1] else {
            panic!("way should decode");
        };
        assert_eq!(way.point, None);
        assert_eq!(way.center, Some(Coordinates::new(3.0, 4.0)));
        assert!(way.tags.is_empty());
    }

    #[test]
    fn isolates_bad_elements() {
        let elements = decode(json!({
            "elements": [
                {"type": "area", "id": 3},
                {"type": "node", "lat": 1.0, "lon": 1.0},
                {"type": "node", "id": 4, "tags": {"name": 5}},
                "not an object",
                {"type": "node", "id": 5, "lat": 1.0, "lon": 1.0}
            ]
        }));

        assert_eq!(elements.len(), 5);
        assert!(
            elements[..4]
                .iter()
                .all(|element| matches!(element, RawElement::Malformed { .. }))
        );
        assert!(matches!(elements[4], RawElement::WellFormed(_)));
    }

    #[test]
    fn missing_elements_decode_as_empty() {
        assert!(decode(json!({"version": 0.6})).is_empty());
    }
}
