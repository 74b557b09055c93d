//! WebSocket inbound adapter bridging explore sessions to browser clients.
//!
//! Responsibilities:
//! - validate upgrade requests against the origin allow-list
//! - start one explore session per connection
//! - keep framing and heartbeats at the edge

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, info, warn};
use url::Url;

use crate::domain::TraceId;
use crate::domain::explore::ExploreSession;

mod session;

pub mod messages;
pub mod origin;
pub mod state;

use origin::OriginAllowList;

/// Upgrade `/ws/explore` into an explore session.
#[get("/ws/explore")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(&state.allowed_origins, origin_header)?;

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;

    let (handle, updates) =
        ExploreSession::spawn(state.source.clone(), state.session_config.clone());
    let trace_id = TraceId::current().unwrap_or_else(TraceId::generate);
    info!(%trace_id, "explore WebSocket opened");
    actix_web::rt::spawn(TraceId::scope(
        trace_id,
        session::handle_ws_session(ws_session, messages, handle, updates),
    ));
    Ok(response)
}

fn validate_origin(
    allowed: &OriginAllowList,
    origin_header: &HeaderValue,
) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if allowed.is_allowed(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
