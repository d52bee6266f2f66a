//! Notification channels for service status announcements.
#![allow(clippy::uninlined_format_args)]

/// Webhook-backed channels
pub mod webhook;

pub use webhook::{DiscordWebhook, SlackWebhook};

use async_trait::async_trait;
use eyre::Result;
use tracing::{error, info};

/// A channel capable of delivering a plain-text status message.
///
/// Channels succeed or fail independently; the prober never cares which
/// concrete services are configured.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name used in logs.
    fn name(&self) -> &str;

    /// Deliver one status message.
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Deliver `message` to every channel, sequentially.
///
/// Delivery failures are logged per channel and never propagated: a broken
/// webhook must not disturb the prober's persisted state or exit status.
pub async fn broadcast(channels: &[Box<dyn Notifier>], message: &str) {
    if channels.is_empty() {
        info!("no notification channels configured; skipping announcement");
        return;
    }

    for channel in channels {
        match channel.notify(message).await {
            Ok(()) => info!(channel = channel.name(), "posted status announcement"),
            Err(e) => {
                error!(channel = channel.name(), error = %e, "failed to post status announcement")
            }
        }
    }
}
