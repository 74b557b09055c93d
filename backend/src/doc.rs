//! OpenAPI documentation configuration.
//!
//! Registers every REST endpoint from the inbound layer plus the schema
//! wrappers for domain errors. Swagger UI serves it in debug builds.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PawScout API",
        description = "Dog-friendly spot search, city lookup, adoption listings, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::explore::search_spots,
        crate::inbound::http::explore::list_cities,
        crate::inbound::http::explore::list_regions,
        crate::inbound::http::adoption::list_pets,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "explore", description = "Map spot and city lookups"),
        (name = "adoption", description = "Adoption listing proxy"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
