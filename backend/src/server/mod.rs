//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use pawscout::Trace;
#[cfg(debug_assertions)]
use pawscout::doc::ApiDoc;
use pawscout::domain::adoption::{AdoptionProxyService, TokenCache};
use pawscout::domain::explore::SpotSearchService;
use pawscout::inbound::http::adoption::list_pets;
use pawscout::inbound::http::explore::{list_cities, list_regions, search_spots};
use pawscout::inbound::http::health::{HealthState, live, ready};
use pawscout::inbound::http::state::HttpState;
use pawscout::inbound::ws;
use pawscout::inbound::ws::state::WsState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(search_spots)
        .service(list_cities)
        .service(list_regions);
    let proxy = web::scope("/api").service(list_pets);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(Trace)
        .service(api)
        .service(proxy)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

fn build_http_state(config: &ServerConfig) -> HttpState {
    let explore = SpotSearchService::new(Arc::clone(&config.geo_source));
    let tokens = Arc::new(TokenCache::new(Arc::new(DefaultClock)));
    let adoption = AdoptionProxyService::new(
        Arc::clone(&config.credential_issuer),
        Arc::clone(&config.listing_source),
        tokens,
    );
    HttpState::new(Arc::new(explore), Arc::new(adoption))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The token cache is created here, so it lives exactly as long as the
/// server. Readiness flips once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        bind_addr,
        geo_source,
        credential_issuer: _,
        listing_source: _,
        session_config,
        allowed_origins,
    } = config;
    let ws_state = web::Data::new(WsState::new(geo_source, session_config, allowed_origins));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use pawscout::domain::ports::{FixtureAdoptionProvider, FixtureGeoFeatureSource};
    use rstest::rstest;

    fn fixture_config() -> ServerConfig {
        ServerConfig::new(
            "127.0.0.1:0".parse().expect("addr"),
            Arc::new(FixtureGeoFeatureSource),
            Arc::new(FixtureAdoptionProvider),
            Arc::new(FixtureAdoptionProvider),
        )
    }

    #[rstest]
    #[case("/api/v1/explore/spots?south=1&west=1&north=2&east=2", StatusCode::OK)]
    #[case("/api/v1/explore/cities?region=TX", StatusCode::OK)]
    #[case("/api/v1/explore/regions", StatusCode::OK)]
    #[case("/api/pets", StatusCode::SERVICE_UNAVAILABLE)]
    #[case("/health/live", StatusCode::OK)]
    #[actix_rt::test]
    async fn wires_every_route(#[case] uri: &str, #[case] expected: StatusCode) {
        let config = fixture_config();
        let deps = AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(build_http_state(&config)),
            ws_state: web::Data::new(WsState::new(
                config.geo_source.clone(),
                config.session_config.clone(),
                config.allowed_origins.clone(),
            )),
        };
        let app = actix_test::init_service(build_app(deps)).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(response.status(), expected);
        assert!(response.headers().contains_key("trace-id"));
    }
}
