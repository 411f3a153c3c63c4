//! WebSocket transport shim.
//!
//! One inbound text message is one chat line; every outbound frame is sent
//! as one text message.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionHandle, ConnectionId, OutboundFrame},
    ui::state::AppState,
    usecase::{ConnectionLifecycle, LifecycleCoordinator},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, remote_addr))
}

/// Spawns a task that drains the connection's outbound queue into the WebSocket sink.
///
/// Ends when the queue is closed, a `Close` frame arrives or the peer
/// stops accepting writes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if let Err(e) = sender.send(Message::Text(text.into())).await {
                        tracing::debug!("WebSocket write failed: {}", e);
                        break;
                    }
                }
                OutboundFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    })
}

/// Feeds inbound text messages to the coordinator until the peer goes away.
async fn receive_loop(
    coordinator: &LifecycleCoordinator,
    lifecycle: &ConnectionLifecycle,
    mut receiver: SplitStream<WebSocket>,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                coordinator.on_transport_error(lifecycle, &e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!(
                    "Received text from '{}': {}",
                    lifecycle.handle().id(),
                    text.as_str()
                );
                coordinator.on_message(lifecycle, text.as_str()).await;
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", lifecycle.handle().id());
                break;
            }
            _ => {}
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, remote_addr: SocketAddr) {
    let (sender, receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(ConnectionId::generate(), remote_addr, tx);
    let mut lifecycle = ConnectionLifecycle::new(handle);
    tracing::info!(
        "WebSocket connection '{}' accepted from {}",
        lifecycle.handle().id(),
        remote_addr
    );

    // The writer must be running before the join announcement is queued
    let mut send_task = pusher_loop(rx, sender);
    let coordinator = state.coordinator.clone();
    coordinator.on_connect(&mut lifecycle).await;

    // If either side completes, stop the other
    tokio::select! {
        _ = receive_loop(&coordinator, &lifecycle, receiver) => send_task.abort(),
        _ = &mut send_task => {},
    };

    coordinator.on_disconnect(&mut lifecycle).await;
}
