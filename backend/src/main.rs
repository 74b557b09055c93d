//! Backend entry-point: loads settings, builds outbound adapters, and serves
//! REST endpoints, the explore WebSocket, and OpenAPI docs.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pawscout::domain::explore::ExploreSessionConfig;
use pawscout::inbound::http::health::HealthState;
use pawscout::outbound::overpass::OverpassHttpSource;
use pawscout::outbound::petfinder::PetfinderHttpClient;
use pawscout::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let config = build_server_config(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

fn build_server_config(settings: &AppSettings) -> io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| io::Error::other(format!("invalid bind address: {e}")))?;
    let overpass_endpoint = settings
        .overpass_endpoint()
        .map_err(|e| io::Error::other(format!("invalid Overpass endpoint: {e}")))?;
    let geo_source = OverpassHttpSource::new(overpass_endpoint, settings.overpass_timeout())
        .map_err(|e| io::Error::other(format!("failed to build Overpass client: {e}")))?;

    let credentials = settings.petfinder_credentials();
    match &credentials {
        Some(credentials) => info!(
            client_id = credentials.client_id(),
            secret_fingerprint = %credentials.secret_fingerprint(),
            "adoption provider credentials loaded"
        ),
        None => warn!("adoption provider credentials missing; /api/pets will answer 503"),
    }
    let petfinder_base_url = settings
        .petfinder_base_url()
        .map_err(|e| io::Error::other(format!("invalid Petfinder base URL: {e}")))?;
    let petfinder = Arc::new(
        PetfinderHttpClient::new(
            petfinder_base_url,
            settings.petfinder_timeout(),
            credentials,
        )
        .map_err(|e| io::Error::other(format!("failed to build Petfinder client: {e}")))?,
    );

    let allowed_origins = settings
        .origin_allow_list()
        .map_err(|e| io::Error::other(format!("invalid allowed origin: {e}")))?;
    let session_config = ExploreSessionConfig {
        debounce: settings.debounce(),
        ..ExploreSessionConfig::default()
    };

    info!(
        %bind_addr,
        overpass = %geo_source.endpoint(),
        debounce_ms = u64::try_from(session_config.debounce.as_millis()).unwrap_or(u64::MAX),
        "starting PawScout backend"
    );

    Ok(ServerConfig::new(
        bind_addr,
        Arc::new(geo_source),
        petfinder.clone(),
        petfinder,
    )
    .with_session_config(session_config)
    .with_allowed_origins(allowed_origins))
}
