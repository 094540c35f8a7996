//! Metric collection layer.
//!
//! Each [`Collector`] implementation gathers one category of system
//! metrics and returns it as a raw [`Payload`] ready for routing. Fan-out
//! categories report every interface they see, loopback included; dropping
//! loopback is the router's decision so the same rule covers records
//! decoded from existing logs.
//!
//! Most values come from `sysinfo`; interface flags, MTU, and link speed
//! come from `/sys/class/net`, and per-interface error counters from
//! `/proc/net/dev`, which `sysinfo` does not expose.

pub mod bandwidth;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod net_errors;
pub mod net_if;
pub mod proc_net;
pub mod swap;
pub mod sys_net;

use sp_common::{Category, Payload, Result};
use std::path::PathBuf;
use std::time::Duration;

/// A system metric collector for one category.
///
/// Implementations are selected per requested category and called once per
/// run. `collect` failures are per-category: the run continues with the
/// remaining categories.
pub trait Collector {
    /// The category this collector produces.
    fn category(&self) -> Category;

    /// Collect the current values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Collection` if the underlying system query fails.
    fn collect(&mut self) -> Result<Payload>;
}

/// Options shared by the collector set.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Filesystem path whose containing mount the disk collector reports.
    pub disk_path: PathBuf,
    /// Blocking sampling interval for the bandwidth collector.
    pub bandwidth_interval: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            disk_path: PathBuf::from("/"),
            bandwidth_interval: Duration::from_secs(1),
        }
    }
}

/// Build the collector for a category.
///
/// `arg` carries the optional per-request argument (currently only the
/// `bandwidth:<iface>` interface restriction); other categories ignore it.
pub fn collector_for(
    category: Category,
    arg: Option<String>,
    opts: &CollectOptions,
) -> Box<dyn Collector> {
    match category {
        Category::Cpu => Box::new(cpu::CpuCollector::new()),
        Category::Memory => Box::new(memory::MemoryCollector::new()),
        Category::Swap => Box::new(swap::SwapCollector::new()),
        Category::Disk => Box::new(disk::DiskCollector::new(opts.disk_path.clone())),
        Category::NetIf => Box::new(net_if::NetIfCollector::new()),
        Category::NetErrors => Box::new(net_errors::NetErrorsCollector::new()),
        Category::Bandwidth => Box::new(bandwidth::BandwidthCollector::new(
            opts.bandwidth_interval,
            arg,
        )),
    }
}

/// Round to one decimal place, the precision used for percent fields.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_for_covers_every_category() {
        let opts = CollectOptions::default();
        for cat in Category::ALL {
            let collector = collector_for(cat, None, &opts);
            assert_eq!(collector.category(), cat);
        }
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(15.94), 15.9);
        assert_eq!(round1(15.95), 16.0);
        assert_eq!(round1(0.0), 0.0);
    }
}
