//! Per-connection WebSocket handler.
//!
//! Relays client frames into the explore session and session updates back
//! out as JSON frames. The public contract pings every 5s and considers a
//! connection idle after 10s without client traffic; tests shorten both.
//!
//! A decoded command waits in a single slot until the session has queue
//! space. Client reads pause meanwhile, but updates keep draining so the
//! session never stalls on a full update queue.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::explore::{
    CommandSlot, ExploreCommand, ExploreHandle, ExploreUpdate, SessionEnded,
};
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    session: Session,
    stream: MessageStream,
    explore: ExploreHandle,
    updates: mpsc::Receiver<ExploreUpdate>,
) {
    WsSession::new(explore).run(session, stream, updates).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    ExploreEnded,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    explore: ExploreHandle,
}

impl WsSession {
    fn new(explore: ExploreHandle) -> Self {
        Self { explore }
    }

    async fn run(
        &self,
        mut session: Session,
        mut stream: MessageStream,
        mut updates: mpsc::Receiver<ExploreUpdate>,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut pending: Option<ExploreCommand> = None;

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv(), if pending.is_none() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                        .map(|command| pending = command)
                }
                slot = self.explore.reserve(), if pending.is_some() => {
                    Self::forward(slot, pending.take())
                }
                update = updates.recv() => match update {
                    Some(update) => self
                        .send_json(&mut session, &ServerMessage::from(update))
                        .await
                        .map_err(SessionError::Network),
                    None => Err(SessionError::ExploreEnded),
                },
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<Option<ExploreCommand>, SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<Option<ExploreCommand>, SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(None)
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(None)
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Option<ExploreCommand>, SessionError> {
        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        match message.into_command() {
            Ok(command) => Ok(Some(command)),
            Err(error) => {
                debug!(error = %error, "Rejected explore command");
                self.send_json(session, &ServerMessage::from(error))
                    .await
                    .map(|()| None)
                    .map_err(SessionError::Network)
            }
        }
    }

    fn forward(
        slot: Result<CommandSlot<'_>, SessionEnded>,
        command: Option<ExploreCommand>,
    ) -> Result<(), SessionError> {
        let slot = slot.map_err(|_| SessionError::ExploreEnded)?;
        if let Some(command) = command {
            slot.send(command);
        }
        Ok(())
    }

    async fn send_json(&self, session: &mut Session, payload: &ServerMessage) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "Failed to serialize WebSocket payload");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::ExploreEnded => {
                warn!("Explore session stopped; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::ExploreEnded => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Error,
                description: Some("explore session ended".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
