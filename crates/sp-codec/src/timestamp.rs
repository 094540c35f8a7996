//! Timestamp formatting for record lines.
//!
//! Lines carry RFC3339 timestamps with millisecond precision and an
//! explicit `Z` suffix. Capture sites use [`now_millis`] so a record that
//! round-trips through its line form compares equal to the original.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use sp_common::{Error, Result};

/// Current time, truncated to millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(now)
}

/// Format a timestamp as it appears in the line preamble.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a preamble timestamp token. Accepts any RFC3339 offset and
/// normalizes to UTC.
pub fn parse_timestamp(token: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(token)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::malformed(format!("bad timestamp {token:?}: {e}")))
}
