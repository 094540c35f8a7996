//! Virtual memory totals and usage percent.

use crate::{round1, Collector};
use sp_common::{Category, FieldValue, Payload, Result};
use sysinfo::System;

pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for MemoryCollector {
    fn category(&self) -> Category {
        Category::Memory
    }

    fn collect(&mut self) -> Result<Payload> {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let available = self.sys.available_memory();
        let used = self.sys.used_memory();
        // Percent counts memory not available for new allocations, which
        // differs from `used` on Linux (caches are used but available).
        let percent = if total > 0 {
            round1((total - available) as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Ok(Payload::Flat(vec![
            ("total".into(), FieldValue::Int(total as i64)),
            ("available".into(), FieldValue::Int(available as i64)),
            ("percent".into(), FieldValue::Real(percent)),
            ("used".into(), FieldValue::Int(used as i64)),
        ]))
    }
}
