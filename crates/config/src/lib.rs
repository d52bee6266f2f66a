//! Sharescope configuration
use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Application ID the official Share publisher app identifies itself with.
pub const DEFAULT_APPLICATION_ID: &str = "d89443d2-327c-4a6f-89e5-496bbb0317db";

/// Dexcom Share endpoint and credential configuration options
#[derive(Debug, Clone, Parser)]
pub struct DexcomOpts {
    /// Dexcom Share account name
    #[clap(long, env = "DEXCOM_ACCOUNT_NAME")]
    pub account_name: String,
    /// Dexcom Share account password
    #[clap(long, env = "DEXCOM_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Application ID sent with every Share request
    #[clap(long, env = "DEXCOM_APPLICATION_ID", default_value = DEFAULT_APPLICATION_ID)]
    pub application_id: String,
    /// Base URL of the Share web services
    #[clap(long, env = "DEXCOM_BASE_URL", default_value = "https://share1.dexcom.com")]
    pub base_url: Url,
    /// Number of authentication failures tolerated before the service is
    /// considered down
    #[clap(long, env = "DEXCOM_MAX_AUTH_FAILS", default_value = "3")]
    pub max_auth_fails: u32,
    /// Delay between authentication attempts in seconds
    #[clap(long, env = "DEXCOM_AUTH_RETRY_DELAY_SECS", default_value = "5")]
    pub auth_retry_delay_secs: u64,
    /// Reading age in seconds past which a staleness warning is logged
    #[clap(long, env = "DEXCOM_MAX_READING_LAG_SECS", default_value = "900")]
    pub max_reading_lag_secs: u64,
}

/// Notification channel configuration options
#[derive(Debug, Clone, Parser)]
pub struct NotifyOpts {
    /// Slack incoming webhook URL for status announcements
    #[clap(long, env = "SLACK_WEBHOOK_URL")]
    pub slack_webhook_url: Option<Url>,
    /// Discord webhook URL for status announcements
    #[clap(long, env = "DISCORD_WEBHOOK_URL")]
    pub discord_webhook_url: Option<Url>,
}

/// CLI options for sharescope
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Dexcom Share configuration
    #[clap(flatten)]
    pub dexcom: DexcomOpts,

    /// Notification channel configuration
    #[clap(flatten)]
    pub notify: NotifyOpts,

    /// File holding the availability status of the previous run
    #[clap(long, env = "STATUS_FILE", default_value = "prevstate.bin")]
    pub status_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::Opts;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Opts::command().debug_assert()
    }
}
