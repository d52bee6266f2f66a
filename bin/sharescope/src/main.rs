//! Entrypoint.

use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use driver::Driver;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let opts = Opts::parse();
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    info!(account = %opts.dexcom.account_name, "🔎 Sharescope availability check starting...");

    // One check per invocation; scheduling is left to cron or similar.
    // The exit code stays zero whether the service is up or down.
    Driver::new(opts)?.run_once().await
}
