//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::should_attempt_reconnect, error::ClientError, input::spawn_line_reader,
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic
///
/// When `name` is given it is announced to the relay on every (re)connect.
pub async fn run_client(url: String, name: Option<String>) -> Result<(), ClientError> {
    let prompt = format!("{}> ", name.as_deref().unwrap_or(""));
    let mut input = spawn_line_reader(prompt.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, name.as_deref(), &mut input, &prompt).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                return Ok(());
            }
            Err(e) => {
                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS - 1) {
                    tracing::error!("Giving up after {} attempts: {}", reconnect_count + 1, e);
                    return Err(e);
                }

                tracing::warn!("{}", e);
                reconnect_count += 1;
                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
