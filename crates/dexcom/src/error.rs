use reqwest::StatusCode;

/// Errors surfaced by the Share client.
///
/// `Auth` and `Fetch` carry the status code and raw response body so the
/// failing exchange can be diagnosed from the logs alone.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// Authentication kept failing past the retry budget, or was rejected
    /// outright.
    #[error("authentication rejected with status {status}: {body}")]
    Auth {
        /// Status code of the last login attempt
        status: StatusCode,
        /// Raw response body of the last login attempt
        body: String,
    },
    /// The latest-reading fetch returned an error status.
    #[error("reading fetch failed with status {status}: {body}")]
    Fetch {
        /// Status code of the fetch response
        status: StatusCode,
        /// Raw response body of the fetch response
        body: String,
    },
    /// Transport-level failure before any HTTP status was received.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ShareError {
    /// Status code carried by the error, if the exchange got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth { status, .. } | Self::Fetch { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
        }
    }
}
