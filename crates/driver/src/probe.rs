//! One availability check: authenticate, fetch, parse.
use dexcom::ShareClient;
use tracing::{error, info};

use crate::state::ServiceStatus;

/// Produce a single up/down verdict for this run.
///
/// Authentication and fetch errors are converted into `Down` here rather
/// than propagated; staleness never affects the verdict. Each invocation
/// reaches exactly one terminal status.
pub async fn check_availability(client: &ShareClient) -> ServiceStatus {
    let token = match client.session_token().await {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "authentication failed, the service looks down");
            return ServiceStatus::Down;
        }
    };

    match client.latest_reading(&token).await {
        Ok(Some(_)) => {
            info!("successfully returned a reading");
            ServiceStatus::Up
        }
        Ok(None) => {
            error!("fetch succeeded but returned no usable reading");
            ServiceStatus::Down
        }
        Err(e) => {
            error!(error = %e, "reading fetch failed, the service looks down");
            ServiceStatus::Down
        }
    }
}
