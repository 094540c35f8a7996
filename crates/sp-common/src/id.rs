//! Run identity.
//!
//! A run is one invocation of the pipeline. Its identity is the start
//! timestamp, captured once: the unix-seconds form goes into columnar file
//! names so repeated runs never collide, the RFC3339 form goes into logs.

use chrono::{DateTime, SecondsFormat, Utc};

/// Identity of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunId {
    started_at: DateTime<Utc>,
}

impl RunId {
    /// Capture a new run id at the current instant.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }

    /// Build a run id from a known start time (tests, replays).
    pub fn from_timestamp(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    /// The run start time.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Unix epoch seconds of the run start, used in output file names.
    pub fn epoch_secs(&self) -> i64 {
        self.started_at.timestamp()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_secs() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 16, 20, 22, 13).unwrap();
        let run = RunId::from_timestamp(ts);
        assert_eq!(run.epoch_secs(), ts.timestamp());
    }

    #[test]
    fn test_display_is_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 16, 20, 22, 13).unwrap();
        let run = RunId::from_timestamp(ts);
        assert_eq!(run.to_string(), "2025-12-16T20:22:13Z");
    }
}
