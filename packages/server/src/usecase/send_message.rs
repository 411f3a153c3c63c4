//! UseCase: a client sent a line (the broadcast engine)
//!
//! ## Behaviour
//!
//! - A line starting with `my name:` first renames the sender; the line is
//!   then relayed like any other, under the new name.
//! - Every connection in the registry snapshot receives one frame: the
//!   sender gets the self-echo, everyone else the relay frame.
//! - The sender's name is looked up for every frame rather than once per
//!   message.
//! - Delivery failures are logged and counted, never returned.

use std::sync::Arc;

use crate::domain::{
    ConnectionHandle, ConnectionRegistry, DeliveryReport, DisplayName, SessionDirectory, frame,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    directory: Arc<dyn SessionDirectory>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        directory: Arc<dyn SessionDirectory>,
    ) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// Fan `body` out from `sender` to every registered connection.
    ///
    /// # Returns
    ///
    /// How many recipients the frames were queued for and how many failed
    pub async fn execute(&self, sender: &ConnectionHandle, body: &str) -> DeliveryReport {
        if let Some(name) = frame::parse_name_change(body) {
            self.directory
                .set_name(sender, DisplayName::new(name))
                .await;
        }

        let mut report = DeliveryReport::default();
        for recipient in self.registry.snapshot().await {
            let name = self.directory.get_name(sender).await;
            let content = if recipient == *sender {
                frame::self_echo(&name, body)
            } else {
                frame::relay(&name, body)
            };

            let result = self.registry.push_to(&recipient.id(), &content).await;
            if let Err(e) = &result {
                tracing::warn!(
                    "Failed to deliver message from '{}' to '{}': {}",
                    sender.id(),
                    recipient.id(),
                    e
                );
            }
            report.record(&result);
        }

        tracing::debug!(
            "Message from '{}' delivered to {} of {} connections",
            sender.id(),
            report.delivered,
            report.attempted()
        );

        report
    }
}
