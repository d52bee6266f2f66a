//! Sharescope driver - runs one check and announces state changes.
use std::time::Duration;

use config::Opts;
use dexcom::{ShareClient, ShareConfig, ShareCredentials};
use eyre::Result;
use notify::{DiscordWebhook, Notifier, SlackWebhook, broadcast};
use tracing::info;

use crate::{
    probe::check_availability,
    state::{FileStatusStore, ServiceStatus, StatusStore},
};

/// Message announced when the service transitions to down.
pub const MESSAGE_SERVICE_DOWN: &str = "The Dexcom Share service appears to be down.";
/// Message announced when the service transitions back to up.
pub const MESSAGE_SERVICE_RESTORED: &str =
    "The Dexcom Share service appears to have been restored.";

/// Driver that runs one availability check, compares it against the persisted
/// status of the previous run and announces transitions.
pub struct Driver {
    client: ShareClient,
    store: Box<dyn StatusStore>,
    channels: Vec<Box<dyn Notifier>>,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver").field("channels", &self.channels.len()).finish_non_exhaustive()
    }
}

impl Driver {
    /// Create a new driver with the given configuration.
    pub fn new(opts: Opts) -> Result<Self> {
        let credentials = ShareCredentials {
            account_name: opts.dexcom.account_name,
            password: opts.dexcom.password,
            application_id: opts.dexcom.application_id,
        };
        let client = ShareClient::new(ShareConfig {
            credentials,
            base_url: opts.dexcom.base_url,
            max_auth_fails: opts.dexcom.max_auth_fails,
            auth_retry_delay: Duration::from_secs(opts.dexcom.auth_retry_delay_secs),
            max_reading_lag: Duration::from_secs(opts.dexcom.max_reading_lag_secs),
        })?;

        let mut channels: Vec<Box<dyn Notifier>> = Vec::new();
        if let Some(url) = opts.notify.slack_webhook_url {
            channels.push(Box::new(SlackWebhook::new(url)));
        }
        if let Some(url) = opts.notify.discord_webhook_url {
            channels.push(Box::new(DiscordWebhook::new(url)));
        }
        if channels.is_empty() {
            info!("no notification channels configured; transitions will only be logged");
        }

        let store = Box::new(FileStatusStore::new(&opts.status_file));
        Ok(Self::with_parts(client, store, channels))
    }

    /// Assemble a driver from explicit collaborators.
    pub fn with_parts(
        client: ShareClient,
        store: Box<dyn StatusStore>,
        channels: Vec<Box<dyn Notifier>>,
    ) -> Self {
        Self { client, store, channels }
    }

    /// Run one check cycle.
    ///
    /// Loads the previous status, probes the service, and on a transition
    /// persists the new status before any announcement goes out, so a broken
    /// channel can never leave the store inconsistent. Returns `Ok` whether
    /// the service turned out up or down; errors are reserved for the store
    /// itself failing.
    pub async fn run_once(&self) -> Result<()> {
        // A missing store means this is the first run; assume the service
        // was up so an initial down check is announced.
        let previous = self.store.load()?.unwrap_or(ServiceStatus::Up);
        let current = check_availability(&self.client).await;

        if current == previous {
            info!(status = %current, "service availability unchanged");
            return Ok(());
        }

        info!(%previous, %current, "service availability changed");
        self.store.store(current)?;

        let message = match current {
            ServiceStatus::Down => MESSAGE_SERVICE_DOWN,
            ServiceStatus::Up => MESSAGE_SERVICE_RESTORED,
        };
        broadcast(&self.channels, message).await;

        Ok(())
    }
}
