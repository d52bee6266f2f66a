//! HTTP client for the Dexcom Share web services.
use std::time::Duration;

use eyre::{Context, Result};
use reqwest::{Client as HttpClient, header::ACCEPT};
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::ShareError,
    reading::{Reading, parse_latest},
    retry::{is_retryable_auth, retry_fixed_if},
};

/// Login endpoint, relative to the Share base URL.
const LOGIN_PATH: &str = "/ShareWebServices/Services/General/LoginPublisherAccountByName";
/// Latest-glucose endpoint, relative to the Share base URL.
const LATEST_GLUCOSE_PATH: &str =
    "/ShareWebServices/Services/Publisher/ReadPublisherLatestGlucoseValues";

/// User agent of the official Share app. The service rejects requests that
/// do not look like they come from a known client.
const SHARE_USER_AGENT: &str = "Dexcom Share/3.0.2.11 CFNetwork/711.2.23 Darwin/14.0.0";

/// Lookback window requested from the latest-glucose endpoint, in minutes.
const FETCH_LOOKBACK_MINUTES: u32 = 1440;
/// At most one data point per fetch; the prober only needs recency.
const FETCH_MAX_COUNT: u32 = 1;

/// Account credentials for the Share publisher login.
#[derive(Debug, Clone)]
pub struct ShareCredentials {
    /// Share account name
    pub account_name: String,
    /// Share account password
    pub password: String,
    /// Application ID sent with every request
    pub application_id: String,
}

/// Configuration for a [`ShareClient`].
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// Account credentials
    pub credentials: ShareCredentials,
    /// Base URL of the Share web services
    pub base_url: Url,
    /// Authentication failures tolerated before giving up
    pub max_auth_fails: u32,
    /// Fixed delay between authentication attempts
    pub auth_retry_delay: Duration,
    /// Reading age past which a staleness warning is logged
    pub max_reading_lag: Duration,
}

impl ShareConfig {
    /// Config with the production defaults for the given credentials.
    pub fn new(credentials: ShareCredentials) -> Self {
        Self {
            credentials,
            base_url: Url::parse("https://share1.dexcom.com").expect("default base url parses"),
            max_auth_fails: 3,
            auth_retry_delay: Duration::from_secs(5),
            max_reading_lag: Duration::from_secs(15 * 60),
        }
    }
}

/// Client for the Dexcom Share web services.
#[derive(Debug, Clone)]
pub struct ShareClient {
    http: HttpClient,
    login_url: Url,
    latest_glucose_url: Url,
    credentials: ShareCredentials,
    max_auth_fails: u32,
    auth_retry_delay: Duration,
    max_reading_lag: Duration,
}

impl ShareClient {
    /// Create a new Share client from the given configuration.
    pub fn new(config: ShareConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(SHARE_USER_AGENT)
            .build()
            .wrap_err("failed to build http client")?;
        let login_url =
            config.base_url.join(LOGIN_PATH).wrap_err("invalid Share base url")?;
        let latest_glucose_url =
            config.base_url.join(LATEST_GLUCOSE_PATH).wrap_err("invalid Share base url")?;

        Ok(Self {
            http,
            login_url,
            latest_glucose_url,
            credentials: config.credentials,
            max_auth_fails: config.max_auth_fails,
            auth_retry_delay: config.auth_retry_delay,
            max_reading_lag: config.max_reading_lag,
        })
    }

    /// Authenticate against the Share service and return a session token.
    ///
    /// Rejected logins are retried at a fixed delay until more than
    /// `max_auth_fails` failures have occurred; the error of the last
    /// attempt is returned once the budget is spent. The token is only
    /// valid for the remainder of this check cycle and is never persisted.
    pub async fn session_token(&self) -> Result<String, ShareError> {
        retry_fixed_if(
            self.auth_retry_delay,
            self.max_auth_fails,
            || self.authenticate_once(),
            is_retryable_auth,
        )
        .await
    }

    /// One login attempt. The service returns the session token as a quoted
    /// JSON string in the body.
    async fn authenticate_once(&self) -> Result<String, ShareError> {
        let body = json!({
            "accountName": self.credentials.account_name,
            "password": self.credentials.password,
            "applicationId": self.credentials.application_id,
        });

        let res = self
            .http
            .post(self.login_url.clone())
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            let token = res.text().await?.trim_matches('"').to_owned();
            debug!("got session token");
            return Ok(token);
        }

        let body = res.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_GATEWAY ||
            status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            warn!(status = status.as_u16(), "authentication failed: service unavailable");
        } else {
            warn!(status = status.as_u16(), "authentication failed");
        }
        Err(ShareError::Auth { status, body })
    }

    /// Fetch and parse the most recent glucose reading.
    ///
    /// A single attempt with no retry; an error status (>= 400) is surfaced
    /// to the caller. `Ok(None)` means the fetch succeeded but held no
    /// usable reading. A stale reading is logged as a warning but still
    /// counts as a successful fetch.
    pub async fn latest_reading(&self, session_token: &str) -> Result<Option<Reading>, ShareError> {
        let body = self.fetch_latest(session_token).await?;

        let Some(reading) = parse_latest(&body, chrono::Utc::now()) else {
            return Ok(None);
        };

        info!(
            value = reading.value,
            lag_secs = reading.lag.num_seconds(),
            "fetched latest reading"
        );
        if reading.is_stale(self.max_reading_lag) {
            warn!(
                lag_mins = reading.lag.num_minutes(),
                "no new measurement from the sensor for a while"
            );
        }

        Ok(Some(reading))
    }

    /// Issue the latest-glucose request and return the raw response body.
    async fn fetch_latest(&self, session_token: &str) -> Result<String, ShareError> {
        let mut url = self.latest_glucose_url.clone();
        url.query_pairs_mut()
            .append_pair("sessionID", session_token)
            .append_pair("minutes", &FETCH_LOOKBACK_MINUTES.to_string())
            .append_pair("maxCount", &FETCH_MAX_COUNT.to_string());

        let res = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&json!({ "applicationId": self.credentials.application_id }))
            .send()
            .await?;

        // Only client and server errors (>= 400) count as a failed fetch;
        // anything below that falls through to the parse layer.
        let status = res.status();
        if status.is_client_error() || status.is_server_error() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "error status from the latest-glucose endpoint");
            return Err(ShareError::Fetch { status, body });
        }

        Ok(res.text().await?)
    }
}
