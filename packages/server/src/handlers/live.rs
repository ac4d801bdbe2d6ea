use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::debug;

use crate::notify::Notifier;
use crate::state::AppState;

/// WebSocket endpoint at the server root.
///
/// Push-only: the server forwards broadcast events to the client; anything
/// the client sends is logged and ignored.
pub async fn live_updates(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.notifier.clone()))
}

async fn handle_socket(socket: WebSocket, notifier: Arc<Notifier>) {
    let (id, mut events) = notifier.subscribe();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(payload) = event else { break };
                if sink.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        debug!("ignoring client message on live socket: {text}");
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    notifier.unsubscribe(id);
}
