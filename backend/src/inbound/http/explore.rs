//! Explore lookup endpoints.
//!
//! ```text
//! GET /api/v1/explore/spots?south=&west=&north=&east=&categories=&q=
//! GET /api/v1/explore/cities?region=
//! GET /api/v1/explore/regions
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::explore::{CategorySet, City, RegionCode, Spot, Viewport};
use crate::domain::ports::SpotSearchRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ValidationCode, field_error, parse_number, require};

/// Spot as rendered for map and list clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotResponse {
    /// `<element type>:<numeric id>`.
    #[schema(example = "way:123")]
    pub id: String,
    #[schema(example = "Tompkins Square Dog Run")]
    pub name: String,
    /// Spot category.
    #[serde(rename = "type")]
    #[schema(example = "park")]
    pub category: String,
    pub lat: f64,
    pub lng: f64,
    /// Amenity labels in display order.
    #[schema(example = json!(["Dogs Allowed", "Water"]))]
    pub amenities: Vec<String>,
    /// Raw attribute keys from the source record.
    pub tags: Vec<String>,
    /// Marker colour.
    #[schema(example = "#7C8A6A")]
    pub color: String,
}

impl From<&Spot> for SpotResponse {
    fn from(spot: &Spot) -> Self {
        Self {
            id: spot.id.clone(),
            name: spot.name.clone(),
            category: spot.category.as_str().to_owned(),
            lat: spot.coordinates.lat,
            lng: spot.coordinates.lng,
            amenities: spot
                .amenities
                .iter()
                .map(|amenity| amenity.label().to_owned())
                .collect(),
            tags: spot.source_tags.iter().cloned().collect(),
            color: spot.color().to_owned(),
        }
    }
}

/// Named locality with a focus point.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CityResponse {
    #[schema(example = "Fresno")]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<&City> for CityResponse {
    fn from(city: &City) -> Self {
        Self {
            name: city.name.clone(),
            lat: city.coordinates.lat,
            lng: city.coordinates.lng,
        }
    }
}

/// Supported US region.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RegionResponse {
    #[schema(example = "CA")]
    pub code: String,
    #[schema(example = "California")]
    pub name: String,
}

/// Query parameters for spot search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SpotsParams {
    /// Southern latitude bound.
    #[param(value_type = f64)]
    pub south: Option<String>,
    /// Western longitude bound.
    #[param(value_type = f64)]
    pub west: Option<String>,
    /// Northern latitude bound.
    #[param(value_type = f64)]
    pub north: Option<String>,
    /// Eastern longitude bound.
    #[param(value_type = f64)]
    pub east: Option<String>,
    /// Comma-separated categories; omit for all, pass empty for none.
    #[param(example = "park,trail")]
    pub categories: Option<String>,
    /// Case-insensitive name filter.
    pub q: Option<String>,
}

/// Query parameters for city lookup.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CitiesParams {
    /// Two-letter US state code, or `DC`.
    #[param(example = "CA")]
    pub region: Option<String>,
}

fn parse_spot_request(params: &SpotsParams) -> Result<SpotSearchRequest, Error> {
    let south = parse_number("south", params.south.as_deref())?;
    let west = parse_number("west", params.west.as_deref())?;
    let north = parse_number("north", params.north.as_deref())?;
    let east = parse_number("east", params.east.as_deref())?;
    let viewport = Viewport::new(south, west, north, east)
        .map_err(|err| field_error("bounds", ValidationCode::InvalidValue, err.to_string()))?;
    let categories = match params.categories.as_deref() {
        None => CategorySet::all(),
        Some(raw) => CategorySet::parse_list(raw).map_err(|err| {
            field_error("categories", ValidationCode::InvalidValue, err.to_string())
        })?,
    };
    Ok(SpotSearchRequest {
        viewport,
        categories,
        text: params.q.clone().unwrap_or_default(),
    })
}

fn parse_region(params: &CitiesParams) -> Result<RegionCode, Error> {
    require("region", params.region.as_deref())?
        .parse()
        .map_err(|err: crate::domain::explore::UnknownRegion| {
            field_error("region", ValidationCode::InvalidValue, err.to_string())
        })
}

/// Search spots inside a bounding box.
#[utoipa::path(
    get,
    path = "/api/v1/explore/spots",
    params(SpotsParams),
    responses(
        (status = 200, description = "Matching spots", body = [SpotResponse]),
        (status = 400, description = "Invalid bounds or categories", body = ErrorSchema),
        (status = 502, description = "Map data provider failed", body = ErrorSchema),
        (status = 503, description = "Map data provider unavailable", body = ErrorSchema)
    ),
    tags = ["explore"],
    operation_id = "searchSpots"
)]
#[get("/explore/spots")]
pub async fn search_spots(
    state: web::Data<HttpState>,
    params: web::Query<SpotsParams>,
) -> ApiResult<web::Json<Vec<SpotResponse>>> {
    let request = parse_spot_request(&params)?;
    let spots = state.explore.search_spots(&request).await?;
    Ok(web::Json(spots.iter().map(SpotResponse::from).collect()))
}

/// List cities and towns in a US region.
#[utoipa::path(
    get,
    path = "/api/v1/explore/cities",
    params(CitiesParams),
    responses(
        (status = 200, description = "Cities sorted by name", body = [CityResponse]),
        (status = 400, description = "Missing or unknown region", body = ErrorSchema),
        (status = 502, description = "Map data provider failed", body = ErrorSchema),
        (status = 503, description = "Map data provider unavailable", body = ErrorSchema)
    ),
    tags = ["explore"],
    operation_id = "listCities"
)]
#[get("/explore/cities")]
pub async fn list_cities(
    state: web::Data<HttpState>,
    params: web::Query<CitiesParams>,
) -> ApiResult<web::Json<Vec<CityResponse>>> {
    let region = parse_region(&params)?;
    let cities = state.explore.cities_for_region(region).await?;
    Ok(web::Json(cities.iter().map(CityResponse::from).collect()))
}

/// List the supported US regions.
#[utoipa::path(
    get,
    path = "/api/v1/explore/regions",
    responses(
        (status = 200, description = "Supported regions", body = [RegionResponse])
    ),
    tags = ["explore"],
    operation_id = "listRegions"
)]
#[get("/explore/regions")]
pub async fn list_regions() -> HttpResponse {
    let regions: Vec<RegionResponse> = RegionCode::all()
        .map(|region| RegionResponse {
            code: region.as_str().to_owned(),
            name: region.name().to_owned(),
        })
        .collect();
    HttpResponse::Ok().json(regions)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::function;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::explore::{Amenity, Coordinates, SpotCategory};
    use crate::domain::ports::{FixtureAdoptionListings, MockExploreQuery};

    fn sample_spot() -> Spot {
        Spot {
            id: "way:123".to_owned(),
            name: "Bark Park".to_owned(),
            category: SpotCategory::Park,
            coordinates: Coordinates::new(40.72, -73.98),
            amenities: vec![Amenity::DogsAllowed, Amenity::Water],
            source_tags: BTreeSet::from(["leisure".to_owned(), "name".to_owned()]),
        }
    }

    async fn get_json(explore: MockExploreQuery, uri: &str) -> (StatusCode, Value) {
        let state = HttpState::new(Arc::new(explore), Arc::new(FixtureAdoptionListings));
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/api/v1")
                    .service(search_spots)
                    .service(list_cities)
                    .service(list_regions),
            ),
        )
        .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let status = response.status();
        let body = actix_test::read_body_json(response).await;
        (status, body)
    }

    #[actix_web::test]
    async fn search_spots_renders_client_shape() {
        let mut explore = MockExploreQuery::new();
        explore
            .expect_search_spots()
            .with(function(|request: &SpotSearchRequest| {
                request.viewport.south() == 40.7
                    && request.categories.iter().eq([SpotCategory::Park])
                    && request.text == "bark"
            }))
            .times(1)
            .returning(|_| Ok(vec![sample_spot()]));

        let (status, body) = get_json(
            explore,
            "/api/v1/explore/spots?south=40.8&west=-74&north=40.7&east=-73.9&categories=park&q=bark",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "id": "way:123",
                "name": "Bark Park",
                "type": "park",
                "lat": 40.72,
                "lng": -73.98,
                "amenities": ["Dogs Allowed", "Water"],
                "tags": ["leisure", "name"],
                "color": "#7C8A6A"
            }])
        );
    }

    #[actix_web::test]
    async fn search_spots_defaults_to_all_categories() {
        let mut explore = MockExploreQuery::new();
        explore
            .expect_search_spots()
            .with(function(|request: &SpotSearchRequest| {
                request.categories == CategorySet::all() && request.text.is_empty()
            }))
            .returning(|_| Ok(Vec::new()));

        let (status, body) =
            get_json(explore, "/api/v1/explore/spots?south=1&west=1&north=2&east=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[rstest::rstest]
    #[case("/api/v1/explore/spots?west=1&north=2&east=2", "south", "missing_field")]
    #[case("/api/v1/explore/spots?south=x&west=1&north=2&east=2", "south", "invalid_number")]
    #[case("/api/v1/explore/spots?south=1&west=1&north=1&east=2", "bounds", "invalid_value")]
    #[case("/api/v1/explore/spots?south=1&west=1&north=2&east=2&categories=beach", "categories", "invalid_value")]
    #[case("/api/v1/explore/cities", "region", "missing_field")]
    #[case("/api/v1/explore/cities?region=PR", "region", "invalid_value")]
    #[actix_web::test]
    async fn rejects_invalid_parameters(
        #[case] uri: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mut explore = MockExploreQuery::new();
        explore.expect_search_spots().never();
        explore.expect_cities_for_region().never();

        let (status, body) = get_json(explore, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn provider_outage_maps_to_service_unavailable() {
        let mut explore = MockExploreQuery::new();
        explore
            .expect_search_spots()
            .returning(|_| Err(Error::service_unavailable("map data provider is unavailable")));

        let (status, body) =
            get_json(explore, "/api/v1/explore/spots?south=1&west=1&north=2&east=2").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "service_unavailable");
    }

    #[actix_web::test]
    async fn list_cities_returns_names_and_points() {
        let mut explore = MockExploreQuery::new();
        explore
            .expect_cities_for_region()
            .with(function(|region: &RegionCode| region.as_str() == "CA"))
            .returning(|_| {
                Ok(vec![City {
                    name: "Fresno".to_owned(),
                    coordinates: Coordinates::new(36.74, -119.79),
                }])
            });

        let (status, body) = get_json(explore, "/api/v1/explore/cities?region=ca").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "Fresno", "lat": 36.74, "lng": -119.79}]));
    }

    #[actix_web::test]
    async fn list_regions_includes_dc() {
        let (status, body) = get_json(MockExploreQuery::new(), "/api/v1/explore/regions").await;
        assert_eq!(status, StatusCode::OK);
        let regions = body.as_array().expect("array");
        assert_eq!(regions.len(), 51);
        assert!(regions.contains(&json!({"code": "DC", "name": "District of Columbia"})));
    }
}
