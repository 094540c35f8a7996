//! Swap totals and usage percent.

use crate::{round1, Collector};
use sp_common::{Category, FieldValue, Payload, Result};
use sysinfo::System;

pub struct SwapCollector {
    sys: System,
}

impl SwapCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for SwapCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for SwapCollector {
    fn category(&self) -> Category {
        Category::Swap
    }

    fn collect(&mut self) -> Result<Payload> {
        self.sys.refresh_memory();

        let total = self.sys.total_swap();
        let free = self.sys.free_swap();
        let used = self.sys.used_swap();
        let percent = if total > 0 {
            round1(used as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Ok(Payload::Flat(vec![
            ("total".into(), FieldValue::Int(total as i64)),
            ("free".into(), FieldValue::Int(free as i64)),
            ("percent".into(), FieldValue::Real(percent)),
            ("used".into(), FieldValue::Int(used as i64)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_shape() {
        let mut collector = SwapCollector::new();
        let Payload::Flat(fields) = collector.collect().unwrap() else {
            panic!("swap payload must be flat");
        };
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["total", "free", "percent", "used"]);
    }
}
