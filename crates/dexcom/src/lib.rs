//! Dexcom Share API client: authentication, latest-reading fetch and parsing.
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cognitive_complexity)]

/// Share web services client
pub mod client;
/// Error taxonomy for Share operations
pub mod error;
/// Glucose reading parsing and staleness
pub mod reading;
/// Retry helpers for HTTP operations
pub mod retry;

pub use client::{ShareClient, ShareConfig, ShareCredentials};
pub use error::ShareError;
pub use reading::Reading;
