//! Record routing: filter and dispatch decoded records to the configured
//! sinks.
//!
//! Fan-out itself happens at decode time (one line becomes N records); the
//! router applies the loopback rule on the way to the sinks, so records
//! decoded from an existing log obey the same include-loopback option as
//! freshly collected payloads. Sink write failures propagate as fatal.

use sp_common::{Category, MetricRecord, Payload, Result};
use sp_storage::RecordSink;
use std::collections::HashMap;
use tracing::debug;

/// Interface name dropped from interface-keyed categories unless
/// include-loopback is set.
pub const LOOPBACK: &str = "lo";

/// Drop the loopback entity from a fan-out payload unless it was asked
/// for. Flat payloads pass through untouched. Applied on the poll path
/// before encoding.
pub fn filter_payload(payload: Payload, include_loopback: bool) -> Payload {
    match payload {
        Payload::PerEntity(entities) if !include_loopback => Payload::PerEntity(
            entities
                .into_iter()
                .filter(|(name, _)| name != LOOPBACK)
                .collect(),
        ),
        other => other,
    }
}

/// Dispatches records to every configured sink.
pub struct RecordRouter {
    sinks: Vec<Box<dyn RecordSink>>,
    include_loopback: bool,
}

impl RecordRouter {
    pub fn new(sinks: Vec<Box<dyn RecordSink>>, include_loopback: bool) -> Self {
        Self {
            sinks,
            include_loopback,
        }
    }

    fn keep(&self, record: &MetricRecord) -> bool {
        self.include_loopback
            || !record.category.fan_out()
            || record.entity.as_deref() != Some(LOOPBACK)
    }

    /// Route a decoded batch (the records of one line). Returns how many
    /// records reached the sinks after filtering.
    pub fn route(&mut self, records: Vec<MetricRecord>) -> Result<usize> {
        let mut routed = 0;
        for record in records {
            if !self.keep(&record) {
                debug!(category = %record.category, "loopback record dropped");
                continue;
            }
            for sink in &mut self.sinks {
                sink.write(&record)?;
            }
            routed += 1;
        }
        Ok(routed)
    }

    /// Records written per category, summed over the first sink (all
    /// sinks receive the same stream).
    pub fn written(&self) -> HashMap<Category, u64> {
        self.sinks
            .first()
            .map(|s| s.written().clone())
            .unwrap_or_default()
    }

    /// Close every sink, even when an earlier one fails; the first error
    /// wins. Called on every exit path.
    pub fn finish(&mut self) -> Result<()> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.finish() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
