//! WebSocket upgrade handler for the real-time channel.
//!
//! Connection lifecycle:
//! 1. HTTP upgrade to WebSocket
//! 2. Client sends a `join` frame; presence is registered for that user
//! 3. Typing frames are relayed, dispatched events are pushed outbound
//! 4. On disconnect (or socket error), the presence mapping is removed

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};

use crate::application::EventDispatcher;
use crate::ports::{ConnectionHandle, PresenceRegistry, PushEvent};

use super::messages::{ClientFrame, ServerFrame};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub registry: Arc<dyn PresenceRegistry>,
    pub dispatcher: EventDispatcher,
}

impl WebSocketState {
    /// Create WebSocket state over a shared presence registry.
    pub fn new(registry: Arc<dyn PresenceRegistry>) -> Self {
        let dispatcher = EventDispatcher::new(registry.clone());
        Self {
            registry,
            dispatcher,
        }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection: a spawned send task forwards
/// dispatched events outbound while the receive loop processes client
/// frames. Presence is registered lazily on the first `join` frame and
/// removed once either direction shuts down.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sink, mut stream) = socket.split();

    // Outbound path: dispatched events flow through this channel.
    let (tx, mut rx) = mpsc::unbounded_channel::<PushEvent>();

    // Set once the client joins; shared so cleanup runs whichever task
    // finishes first.
    let presence: Arc<Mutex<Option<ConnectionHandle>>> = Arc::new(Mutex::new(None));

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = ServerFrame::from_push_event(event);
            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!("failed to serialize outbound frame: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let registry = state.registry.clone();
    let dispatcher = state.dispatcher.clone();
    let presence_for_recv = presence.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    let frame = match serde_json::from_str::<ClientFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::debug!("ignoring malformed client frame: {}", e);
                            continue;
                        }
                    };

                    match frame {
                        ClientFrame::Join { user_id } => {
                            let handle = ConnectionHandle::new(user_id, tx.clone());
                            registry.connect(handle.clone()).await;
                            *presence_for_recv.lock().await = Some(handle);
                        }
                        ClientFrame::Typing {
                            user_id,
                            username,
                            receiver_id,
                        } => {
                            dispatcher
                                .emit(&receiver_id, PushEvent::UserTyping { user_id, username })
                                .await;
                        }
                        ClientFrame::StopTyping {
                            user_id,
                            receiver_id,
                        } => {
                            dispatcher
                                .emit(&receiver_id, PushEvent::UserStopTyping { user_id })
                                .await;
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    break;
                }
                Ok(_) => {
                    // Binary payloads and protocol ping/pong are ignored.
                }
                Err(e) => {
                    tracing::debug!("receive error: {}", e);
                    break;
                }
            }
        }
    });

    // Whichever direction ends first tears down the other.
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    let handle = presence.lock().await.take();
    if let Some(handle) = handle {
        state.registry.disconnect(&handle).await;
    }
}

/// Create the axum router for the WebSocket endpoint.
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/ws", get(ws_handler))
}
