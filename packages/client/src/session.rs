//! One WebSocket session with the relay.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    domain::{display_text, name_change_line},
    error::ClientError,
    ui::redisplay_prompt,
};

/// Run one session until the user quits or the connection drops.
///
/// # Returns
///
/// * `Ok(())` - the input channel closed (user exit)
/// * `Err(ClientError)` - the connection failed or was lost
pub async fn run_client_session(
    url: &str,
    name: Option<&str>,
    input: &mut mpsc::UnboundedReceiver<String>,
    prompt: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to chat relay!");
    println!("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    if let Some(name) = name {
        write
            .send(Message::text(name_change_line(name)))
            .await
            .map_err(|_| ClientError::ConnectionLost)?;
    }

    loop {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    print!("\r{}\n", display_text(text.as_str()));
                    redisplay_prompt(prompt);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionLost);
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost);
                }
                Some(Ok(_)) => {}
            },
            line = input.recv() => match line {
                Some(line) => {
                    if let Err(e) = write.send(Message::text(line)).await {
                        tracing::warn!("Failed to send message: {}", e);
                        return Err(ClientError::ConnectionLost);
                    }
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
            },
        }
    }
}
