//! Parsing of Share latest-glucose responses.
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::error;

/// A single glucose measurement with its observation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Blood glucose value in mg/dL
    pub value: f64,
    /// Moment the measurement was taken
    pub observed_at: DateTime<Utc>,
    /// Elapsed time between the measurement and this check
    pub lag: TimeDelta,
}

impl Reading {
    /// Whether the reading is older than the given threshold.
    ///
    /// A negative lag (sensor clock ahead of ours) is never stale.
    pub fn is_stale(&self, max_lag: std::time::Duration) -> bool {
        self.lag.to_std().map(|lag| lag > max_lag).unwrap_or(false)
    }
}

/// Wire format of one entry in the latest-glucose response. The `ST` field
/// encodes a millisecond epoch as `Date(1609459200000)`.
#[derive(Debug, Deserialize)]
struct RawReading {
    #[serde(rename = "ST")]
    system_time: String,
    #[serde(rename = "Value")]
    value: f64,
}

/// Extract the most recent reading from a raw fetch response body.
///
/// Returns `None` when the body is not the expected JSON list, the list is
/// empty, or the timestamp cannot be decoded. The raw body is logged at error
/// level in those cases so the exchange can be diagnosed later; the caller
/// treats `None` as "no reading", not as a fault to propagate.
pub fn parse_latest(body: &str, now: DateTime<Utc>) -> Option<Reading> {
    let entries: Vec<RawReading> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, body, "failed to decode latest-glucose response");
            return None;
        }
    };

    let Some(entry) = entries.first() else {
        error!(body, "latest-glucose response contained no readings");
        return None;
    };

    let Some(observed_at) = embedded_millis(&entry.system_time)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    else {
        error!(
            system_time = %entry.system_time,
            body,
            "latest-glucose entry carried an undecodable timestamp"
        );
        return None;
    };

    Some(Reading { value: entry.value, observed_at, lag: now.signed_duration_since(observed_at) })
}

/// Pull the first run of digits out of a `Date(1609459200000)`-style string.
fn embedded_millis(system_time: &str) -> Option<i64> {
    let digits: String = system_time
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        // Five minutes past the epoch millis used in the fixtures below.
        DateTime::from_timestamp(1_609_459_200 + 300, 0).unwrap()
    }

    #[test]
    fn parses_value_and_lag_against_fixed_clock() {
        let body = r#"[{"ST": "Date(1609459200000)", "Value": 100}]"#;
        let reading = parse_latest(body, fixed_now()).unwrap();
        assert_eq!(reading.value, 100.0);
        assert_eq!(reading.observed_at, DateTime::from_timestamp(1_609_459_200, 0).unwrap());
        assert_eq!(reading.lag, TimeDelta::seconds(300));
    }

    #[test]
    fn parses_slash_wrapped_date_format() {
        let body = r#"[{"ST": "/Date(1609459200000)/", "Value": 85}]"#;
        let reading = parse_latest(body, fixed_now()).unwrap();
        assert_eq!(reading.value, 85.0);
    }

    #[test]
    fn empty_list_yields_no_reading() {
        assert!(parse_latest("[]", fixed_now()).is_none());
    }

    #[test]
    fn undecodable_body_yields_no_reading() {
        assert!(parse_latest("ServerError", fixed_now()).is_none());
        assert!(parse_latest(r#"[{"Value": 100}]"#, fixed_now()).is_none());
    }

    #[test]
    fn garbage_timestamp_yields_no_reading() {
        let body = r#"[{"ST": "Date()", "Value": 100}]"#;
        assert!(parse_latest(body, fixed_now()).is_none());
    }

    #[test]
    fn staleness_threshold() {
        let body = r#"[{"ST": "Date(1609459200000)", "Value": 100}]"#;
        let reading = parse_latest(body, fixed_now()).unwrap();
        assert!(!reading.is_stale(std::time::Duration::from_secs(900)));
        assert!(reading.is_stale(std::time::Duration::from_secs(60)));
    }

    #[test]
    fn future_reading_is_not_stale() {
        let body = r#"[{"ST": "Date(1609459200000)", "Value": 100}]"#;
        let before = DateTime::from_timestamp(1_609_459_200 - 60, 0).unwrap();
        let reading = parse_latest(body, before).unwrap();
        assert!(!reading.is_stale(std::time::Duration::ZERO));
    }
}
