//! Wire-level message definitions for the explore WebSocket.
//!
//! Client frames decode into [`ClientMessage`] and turn into domain
//! commands; session updates turn into [`ServerMessage`] frames. Both are
//! JSON objects discriminated by a camelCase `type` field.

use serde::{Deserialize, Serialize};

use crate::domain::explore::{
    CategorySet, City, Coordinates, ExploreCommand, ExploreUpdate, GeolocationOutcome,
    RegionCode, SpotCategory, SpotView, Viewport,
};
use crate::domain::{Error, ErrorCode};

/// Inbound frame sent by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// The map settled on new bounds.
    ViewportChanged {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
    CategoriesChanged { categories: Vec<SpotCategory> },
    SearchChanged { text: String },
    /// The client's geolocation request produced a fix.
    LocationFound { lat: f64, lng: f64 },
    /// The client's geolocation request failed.
    LocationFailed {
        #[serde(default)]
        message: Option<String>,
    },
    LocationUnsupported,
    /// `null` or an absent region clears the selection.
    RegionSelected {
        #[serde(default)]
        region: Option<String>,
    },
    CitySelected { name: String },
}

impl ClientMessage {
    /// Convert into a session command.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_request` error for bounds that do not form a
    /// viewport or an unknown region code.
    pub fn into_command(self) -> Result<ExploreCommand, Error> {
        let command = match self {
            Self::ViewportChanged {
                south,
                west,
                north,
                east,
            } => ExploreCommand::ViewportChanged(
                Viewport::new(south, west, north, east)
                    .map_err(|err| Error::invalid_request(err.to_string()))?,
            ),
            Self::CategoriesChanged { categories } => {
                ExploreCommand::CategoriesChanged(categories.into_iter().collect::<CategorySet>())
            }
            Self::SearchChanged { text } => ExploreCommand::SearchChanged(text),
            Self::LocationFound { lat, lng } => ExploreCommand::GeolocationResolved(
                GeolocationOutcome::Fix(Coordinates::new(lat, lng)),
            ),
            Self::LocationFailed { message } => {
                ExploreCommand::GeolocationResolved(GeolocationOutcome::Failed { message })
            }
            Self::LocationUnsupported => {
                ExploreCommand::GeolocationResolved(GeolocationOutcome::Unsupported)
            }
            Self::RegionSelected { region } => {
                let region = match region.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(code) => Some(
                        code.parse::<RegionCode>()
                            .map_err(|err| Error::invalid_request(err.to_string()))?,
                    ),
                };
                ExploreCommand::RegionSelected(region)
            }
            Self::CitySelected { name } => ExploreCommand::CitySelected(name),
        };
        Ok(command)
    }
}

/// Spot entry in a `spots` frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotPayload {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: SpotCategory,
    pub lat: f64,
    pub lng: f64,
    pub amenities: Vec<&'static str>,
    pub tags: Vec<String>,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_label: Option<String>,
}

impl From<SpotView> for SpotPayload {
    fn from(view: SpotView) -> Self {
        let distance_label = view.distance_label();
        let SpotView { spot, distance_km } = view;
        Self {
            color: spot.color(),
            id: spot.id,
            name: spot.name,
            category: spot.category,
            lat: spot.coordinates.lat,
            lng: spot.coordinates.lng,
            amenities: spot.amenities.iter().map(|amenity| amenity.label()).collect(),
            tags: spot.source_tags.into_iter().collect(),
            distance_km,
            distance_label,
        }
    }
}

/// City entry in a `cities` frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityPayload {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<City> for CityPayload {
    fn from(city: City) -> Self {
        Self {
            name: city.name,
            lat: city.coordinates.lat,
            lng: city.coordinates.lng,
        }
    }
}

/// Outbound frame pushed to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Loading { loading: bool },
    Spots { spots: Vec<SpotPayload> },
    /// Move the map to these bounds.
    Focus {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
    Notice { message: String, ttl_ms: u64 },
    Cities { cities: Vec<CityPayload> },
    /// A client frame was understood but rejected.
    Error { code: ErrorCode, message: String },
}

impl From<ExploreUpdate> for ServerMessage {
    fn from(update: ExploreUpdate) -> Self {
        match update {
            ExploreUpdate::Loading(loading) => Self::Loading { loading },
            ExploreUpdate::Spots(spots) => Self::Spots {
                spots: spots.into_iter().map(SpotPayload::from).collect(),
            },
            ExploreUpdate::Focus(viewport) => Self::Focus {
                south: viewport.south(),
                west: viewport.west(),
                north: viewport.north(),
                east: viewport.east(),
            },
            ExploreUpdate::Notice(notice) => Self::Notice {
                message: notice.message,
                ttl_ms: u64::try_from(notice.ttl.as_millis()).unwrap_or(u64::MAX),
            },
            ExploreUpdate::Cities(cities) => Self::Cities {
                cities: cities.into_iter().map(CityPayload::from).collect(),
            },
        }
    }
}

impl From<Error> for ServerMessage {
    fn from(error: Error) -> Self {
        Self::Error {
            code: error.code(),
            message: error.message().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use insta::assert_json_snapshot;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::explore::{Amenity, Notice, Spot};

    fn sample_view(distance_km: Option<f64>) -> SpotView {
        SpotView {
            spot: Spot {
                id: "node:42".to_owned(),
                name: "Bean There".to_owned(),
                category: SpotCategory::Cafe,
                coordinates: Coordinates::new(40.7, -73.9),
                amenities: vec![Amenity::OutdoorSeating, Amenity::DogsAllowed],
                source_tags: BTreeSet::from([
                    "amenity".to_owned(),
                    "dog".to_owned(),
                    "name".to_owned(),
                ]),
            },
            distance_km,
        }
    }

    #[rstest]
    #[case::viewport(
        json!({"type": "viewportChanged", "south": 2.0, "west": 1.0, "north": 1.0, "east": 2.0}),
        ExploreCommand::ViewportChanged(Viewport::new(1.0, 1.0, 2.0, 2.0).expect("viewport"))
    )]
    #[case::categories(
        json!({"type": "categoriesChanged", "categories": ["trail", "park", "park"]}),
        ExploreCommand::CategoriesChanged(
            [SpotCategory::Park, SpotCategory::Trail].into_iter().collect()
        )
    )]
    #[case::no_categories(
        json!({"type": "categoriesChanged", "categories": []}),
        ExploreCommand::CategoriesChanged(CategorySet::default())
    )]
    #[case::search(
        json!({"type": "searchChanged", "text": "bark"}),
        ExploreCommand::SearchChanged("bark".to_owned())
    )]
    #[case::location(
        json!({"type": "locationFound", "lat": 40.0, "lng": -74.0}),
        ExploreCommand::GeolocationResolved(GeolocationOutcome::Fix(Coordinates::new(40.0, -74.0)))
    )]
    #[case::location_failed(
        json!({"type": "locationFailed"}),
        ExploreCommand::GeolocationResolved(GeolocationOutcome::Failed { message: None })
    )]
    #[case::unsupported(
        json!({"type": "locationUnsupported"}),
        ExploreCommand::GeolocationResolved(GeolocationOutcome::Unsupported)
    )]
    #[case::region(
        json!({"type": "regionSelected", "region": "ny"}),
        ExploreCommand::RegionSelected(Some("NY".parse().expect("region")))
    )]
    #[case::clear_region(
        json!({"type": "regionSelected", "region": null}),
        ExploreCommand::RegionSelected(None)
    )]
    #[case::city(
        json!({"type": "citySelected", "name": "Albany"}),
        ExploreCommand::CitySelected("Albany".to_owned())
    )]
    fn decodes_client_frames(#[case] frame: serde_json::Value, #[case] expected: ExploreCommand) {
        let message: ClientMessage = serde_json::from_value(frame).expect("decode");
        assert_eq!(message.into_command().expect("command"), expected);
    }

    #[rstest]
    #[case::degenerate(json!({"type": "viewportChanged", "south": 1.0, "west": 1.0, "north": 1.0, "east": 2.0}))]
    #[case::unknown_region(json!({"type": "regionSelected", "region": "PR"}))]
    fn rejects_invalid_commands(#[case] frame: serde_json::Value) {
        let message: ClientMessage = serde_json::from_value(frame).expect("decode");
        let err = message.into_command().expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case::unknown_type(json!({"type": "teleport"}))]
    #[case::unknown_category(json!({"type": "categoriesChanged", "categories": ["beach"]}))]
    #[case::missing_field(json!({"type": "searchChanged"}))]
    fn refuses_malformed_frames(#[case] frame: serde_json::Value) {
        assert!(serde_json::from_value::<ClientMessage>(frame).is_err());
    }

    #[test]
    fn serialises_spots_with_distance() {
        let message = ServerMessage::from(ExploreUpdate::Spots(vec![sample_view(Some(1.26))]));
        assert_json_snapshot!(message, @r###"
        {
          "type": "spots",
          "spots": [
            {
              "id": "node:42",
              "name": "Bean There",
              "type": "cafe",
              "lat": 40.7,
              "lng": -73.9,
              "amenities": [
                "Outdoor Seating",
                "Dogs Allowed"
              ],
              "tags": [
                "amenity",
                "dog",
                "name"
              ],
              "color": "#C98B6B",
              "distanceKm": 1.26,
              "distanceLabel": "1.3 km"
            }
          ]
        }
        "###);
    }

    #[test]
    fn omits_distance_without_user_location() {
        let message = ServerMessage::from(ExploreUpdate::Spots(vec![sample_view(None)]));
        let value = serde_json::to_value(&message).expect("serialise");
        assert!(value["spots"][0].get("distanceKm").is_none());
        assert!(value["spots"][0].get("distanceLabel").is_none());
    }

    #[test]
    fn serialises_notice() {
        let message = ServerMessage::from(ExploreUpdate::Notice(Notice {
            message: "Location permission denied".to_owned(),
            ttl: Duration::from_millis(2_500),
        }));
        assert_json_snapshot!(message, @r###"
        {
          "type": "notice",
          "message": "Location permission denied",
          "ttlMs": 2500
        }
        "###);
    }

    #[test]
    fn serialises_focus_and_loading() {
        let viewport = Viewport::new(1.0, 2.0, 3.0, 4.0).expect("viewport");
        assert_eq!(
            serde_json::to_value(ServerMessage::from(ExploreUpdate::Focus(viewport)))
                .expect("serialise"),
            json!({"type": "focus", "south": 1.0, "west": 2.0, "north": 3.0, "east": 4.0})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::from(ExploreUpdate::Loading(true)))
                .expect("serialise"),
            json!({"type": "loading", "loading": true})
        );
    }

    #[test]
    fn serialises_rejections() {
        let message = ServerMessage::from(Error::invalid_request("unknown region: PR"));
        assert_json_snapshot!(message, @r###"
        {
          "type": "error",
          "code": "invalid_request",
          "message": "unknown region: PR"
        }
        "###);
    }
}
