//! Bandwidth sampling: bytes per second over a blocking interval.
//!
//! The collector snapshots cumulative byte counters, sleeps for the
//! configured interval, snapshots again, and reports the per-second delta.
//! This is the pipeline's only deliberate suspension point.

use crate::Collector;
use sp_common::{Category, FieldValue, Payload, Result};
use std::collections::HashMap;
use std::time::Duration;
use sysinfo::Networks;
use tracing::debug;

pub struct BandwidthCollector {
    networks: Networks,
    interval: Duration,
    /// Restrict sampling to one interface (`bandwidth:<iface>` request).
    iface: Option<String>,
}

impl BandwidthCollector {
    pub fn new(interval: Duration, iface: Option<String>) -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            interval,
            iface,
        }
    }
}

impl Collector for BandwidthCollector {
    fn category(&self) -> Category {
        Category::Bandwidth
    }

    fn collect(&mut self) -> Result<Payload> {
        self.networks.refresh_list();
        let before: HashMap<String, (u64, u64)> = self
            .networks
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    (data.total_transmitted(), data.total_received()),
                )
            })
            .collect();

        debug!(interval_ms = self.interval.as_millis() as u64, "bandwidth sampling");
        std::thread::sleep(self.interval);
        self.networks.refresh();

        let secs = self.interval.as_secs_f64();
        let mut entities = Vec::new();
        for (ifname, data) in self.networks.iter() {
            if let Some(only) = &self.iface {
                if ifname != only {
                    continue;
                }
            }
            // Interfaces that appeared mid-interval have no baseline.
            let Some((sent_before, recv_before)) = before.get(ifname) else {
                continue;
            };
            let sent_per_s =
                data.total_transmitted().saturating_sub(*sent_before) as f64 / secs;
            let recv_per_s =
                data.total_received().saturating_sub(*recv_before) as f64 / secs;

            entities.push((
                ifname.clone(),
                vec![
                    ("sent_Bps".into(), FieldValue::Int(sent_per_s as i64)),
                    ("recv_Bps".into(), FieldValue::Int(recv_per_s as i64)),
                ],
            ));
        }
        entities.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Payload::PerEntity(entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_shape_short_interval() {
        let mut collector = BandwidthCollector::new(Duration::from_millis(50), None);
        let Payload::PerEntity(entities) = collector.collect().unwrap() else {
            panic!("bandwidth payload must fan out");
        };
        for (_, fields) in &entities {
            let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, vec!["sent_Bps", "recv_Bps"]);
        }
    }

    #[test]
    fn test_interface_restriction() {
        let mut collector = BandwidthCollector::new(
            Duration::from_millis(10),
            Some("definitely-not-a-nic0".into()),
        );
        let Payload::PerEntity(entities) = collector.collect().unwrap() else {
            panic!("bandwidth payload must fan out");
        };
        assert!(entities.is_empty());
    }
}
