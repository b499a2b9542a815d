pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;

use crate::protocol::ServerMessage;
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one UI connection. The engine serves a single client device, so
/// the connection drives the shared session directly.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Make sure a session exists before the first card is requested
    if state.session.read().await.is_none() {
        if let Err(e) = state.start_session().await {
            tracing::error!("Failed to start session: {}", e);
            let error = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Ok(json) = serde_json::to_string(&error) {
                let _ = sender.send(Message::Text(json.into())).await;
            }
            return;
        }
    }

    let welcome = ServerMessage::Welcome {
        protocol: "1.0".to_string(),
        server_now: chrono::Utc::now().to_rfc3339(),
        deck_size: state.deck_size().await,
        skips_remaining: state.skips_remaining().await,
        card: state.current_card().await,
    };

    if let Ok(msg) = serde_json::to_string(&welcome) {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            tracing::error!("Failed to send welcome message");
            return;
        }
    }

    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            continue;
        };

        let client_msg = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Unparseable client message: {}", e);
                continue;
            }
        };

        if let Some(reply) = handlers::handle_message(client_msg, &state).await {
            match serde_json::to_string(&reply) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!("Failed to serialize reply: {}", e),
            }
        }
    }

    tracing::info!("WebSocket disconnected");
}
