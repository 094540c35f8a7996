//! CPU utilization and core counts.

use crate::{round1, Collector};
use sp_common::{Category, FieldValue, Payload, Result};
use sysinfo::System;

pub struct CpuCollector {
    sys: System,
}

impl CpuCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for CpuCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for CpuCollector {
    fn category(&self) -> Category {
        Category::Cpu
    }

    fn collect(&mut self) -> Result<Payload> {
        // Usage is a delta between two refreshes; the first one primes the
        // counters.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_cpu_usage();

        let percent = round1(self.sys.global_cpu_info().cpu_usage() as f64);
        let logical = self.sys.cpus().len() as i64;
        let physical = self.sys.physical_core_count().unwrap_or(0) as i64;

        Ok(Payload::Flat(vec![
            ("percent".into(), FieldValue::Real(percent)),
            ("logical_cpus".into(), FieldValue::Int(logical)),
            ("physical_cpus".into(), FieldValue::Int(physical)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_shape() {
        let mut collector = CpuCollector::new();
        let payload = collector.collect().unwrap();
        let Payload::Flat(fields) = payload else {
            panic!("cpu payload must be flat");
        };
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["percent", "logical_cpus", "physical_cpus"]);

        let FieldValue::Real(pct) = fields[0].1 else {
            panic!("percent must be real");
        };
        assert!((0.0..=100.0).contains(&pct));
        assert!(matches!(fields[1].1, FieldValue::Int(n) if n >= 1));
    }
}
