//! WebSocket connection lifecycle management.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt, stream::SplitSink};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::http::routes::AppState;
use crate::room::relay::Outbound;

use super::session::Session;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (ws_tx, mut ws_rx) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Outbound>();
    // Cancelled by the writer when the room forces this socket closed.
    let closed = CancellationToken::new();
    let writer = tokio::spawn(write_frames(ws_tx, rx, closed.clone()));

    let mut session = Session::new(state.rooms.clone(), tx, state.background);
    let id = session.id();
    tracing::debug!(session = %id, "ws opened");

    loop {
        let frame = tokio::select! {
            _ = closed.cancelled() => break,
            frame = ws_rx.next() => frame,
        };
        match frame {
            Some(Ok(Message::Text(text))) => session.handle_text(&text),
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                tracing::warn!(session = %id, error = %err, "ws receive error");
                break;
            }
        }
    }

    // Leaving the room drops every sender but ours; dropping the session
    // drops the last one and lets the writer finish.
    session.close();
    drop(session);
    let _ = writer.await;
    tracing::debug!(session = %id, "ws closed");
}

async fn write_frames(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    closed: CancellationToken,
) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Message(message) => {
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to encode outbound frame");
                        continue;
                    }
                };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            Outbound::Close => {
                let _ = sink.send(Message::Close(None)).await;
                closed.cancel();
                break;
            }
        }
    }
}
