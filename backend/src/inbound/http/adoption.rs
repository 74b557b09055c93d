//! Adoption-listing proxy endpoint.
//!
//! ```text
//! GET /api/pets?type=dog&limit=20&location=10001
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::domain::adoption::PetQuery;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ValidationCode, field_error, parse_optional_number};

/// Listing filters; blank values fall back to the defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PetsParams {
    /// Animal type, defaults to `dog`.
    #[serde(rename = "type")]
    #[param(rename = "type", example = "cat")]
    pub animal_type: Option<String>,
    /// Page size, defaults to 20.
    #[param(value_type = u32, example = 20)]
    pub limit: Option<String>,
    /// Postal code, defaults to `10001`.
    #[param(example = "94110")]
    pub location: Option<String>,
}

/// Proxy the adoption provider's listing.
///
/// The provider body is returned unchanged.
#[utoipa::path(
    get,
    path = "/api/pets",
    params(PetsParams),
    responses(
        (status = 200, description = "Provider listing body", body = Object),
        (status = 400, description = "Invalid limit", body = ErrorSchema),
        (status = 502, description = "Provider rejected the request", body = ErrorSchema),
        (status = 503, description = "Provider credentials are not configured", body = ErrorSchema)
    ),
    tags = ["adoption"],
    operation_id = "listPets"
)]
#[get("/pets")]
pub async fn list_pets(
    state: web::Data<HttpState>,
    params: web::Query<PetsParams>,
) -> ApiResult<web::Json<Value>> {
    let PetsParams {
        animal_type,
        limit,
        location,
    } = params.into_inner();
    let limit = parse_optional_number::<u32>("limit", limit.as_deref())?;
    let query = PetQuery::new(animal_type, limit, location)
        .map_err(|err| field_error("limit", ValidationCode::InvalidValue, err.to_string()))?;
    let body = state.adoption.list_pets(&query).await?;
    Ok(web::Json(body))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::{FixtureExploreQuery, MockAdoptionListings};

    async fn get_json(adoption: MockAdoptionListings, uri: &str) -> (StatusCode, Value) {
        let state = HttpState::new(Arc::new(FixtureExploreQuery), Arc::new(adoption));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(list_pets)),
        )
        .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let status = response.status();
        let body = actix_test::read_body_json(response).await;
        (status, body)
    }

    #[rstest]
    #[case::defaults("/api/pets", PetQuery::default())]
    #[case::blank_values("/api/pets?type=&limit=&location=", PetQuery::default())]
    #[case::explicit(
        "/api/pets?type=cat&limit=5&location=94110",
        PetQuery::new(Some("cat".to_owned()), Some(5), Some("94110".to_owned())).expect("query")
    )]
    #[actix_web::test]
    async fn forwards_filters_and_returns_body_unchanged(
        #[case] uri: &str,
        #[case] expected: PetQuery,
    ) {
        let body = json!({"animals": [{"id": 7, "name": "Rex"}], "pagination": {"count": 1}});
        let returned = body.clone();
        let mut adoption = MockAdoptionListings::new();
        adoption
            .expect_list_pets()
            .with(eq(expected))
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let (status, observed) = get_json(adoption, uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(observed, body);
    }

    #[rstest]
    #[case::not_a_number("/api/pets?limit=lots", "invalid_number")]
    #[case::zero("/api/pets?limit=0", "invalid_value")]
    #[case::too_large("/api/pets?limit=101", "invalid_value")]
    #[actix_web::test]
    async fn rejects_bad_limits(#[case] uri: &str, #[case] code: &str) {
        let mut adoption = MockAdoptionListings::new();
        adoption.expect_list_pets().never();

        let (status, body) = get_json(adoption, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "limit");
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn upstream_failure_surfaces_provider_message() {
        let mut adoption = MockAdoptionListings::new();
        adoption
            .expect_list_pets()
            .returning(|_| Err(Error::upstream_failed("Failed to fetch pets from Petfinder")));

        let (status, body) = get_json(adoption, "/api/pets").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Failed to fetch pets from Petfinder");
    }
}
