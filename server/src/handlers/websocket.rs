//! WebSocket handler for live page updates.
//!
//! Pages connect to receive sync and add notifications, and can ask for the
//! current selector and view at any time.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::websocket::{ClientMessage, ConnectionManager, ServerMessage};
use crate::{with_book, SharedBook};

/// Handle an established WebSocket connection.
///
/// Registers the connection, forwards queued messages to the socket from a
/// separate task, answers client requests until the socket closes, then
/// unregisters.
pub async fn handle_websocket_connection(
    socket: WebSocket,
    book: SharedBook,
    conn_manager: Arc<ConnectionManager>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let conn_id = conn_manager.register(tx);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if let Err(e) = ws_sender.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send WebSocket message: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize WebSocket message: {}", e);
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let response = process_message(&text, &book).await;
                conn_manager.send_to(&conn_id, response);
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!("Binary messages not supported");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                tracing::debug!(conn_id = %conn_id, "WebSocket close frame received");
                break;
            }
            Err(e) => {
                tracing::warn!(conn_id = %conn_id, "WebSocket error: {}", e);
                break;
            }
        }
    }

    conn_manager.unregister(&conn_id);
    send_task.abort();

    tracing::debug!(
        active_connections = conn_manager.connection_count(),
        "WebSocket client disconnected"
    );
}

/// Process a client message and return the reply.
async fn process_message(text: &str, book: &SharedBook) -> ServerMessage {
    let client_msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => return ServerMessage::error(format!("Invalid message format: {}", e)),
    };

    match client_msg {
        ClientMessage::State => {
            let state = with_book(book, |book| {
                book.category_options()
                    .and_then(|categories| Ok(ServerMessage::state(categories, book.current_view()?)))
            })
            .await;
            match state {
                Ok(Ok(state)) => state,
                Ok(Err(e)) => ServerMessage::error(e.to_string()),
                Err(e) => ServerMessage::error(e.to_string()),
            }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    }
}
