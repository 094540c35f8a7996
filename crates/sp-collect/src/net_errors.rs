//! Per-interface error and drop counters.

use crate::proc_net::read_net_dev;
use crate::Collector;
use sp_common::{Category, FieldValue, Payload, Result};

pub struct NetErrorsCollector;

impl NetErrorsCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NetErrorsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for NetErrorsCollector {
    fn category(&self) -> Category {
        Category::NetErrors
    }

    fn collect(&mut self) -> Result<Payload> {
        let mut entities: Vec<_> = read_net_dev()?
            .into_iter()
            .map(|(ifname, counters)| {
                (
                    ifname,
                    vec![
                        ("errin".into(), FieldValue::Int(counters.errin as i64)),
                        ("errout".into(), FieldValue::Int(counters.errout as i64)),
                        ("dropin".into(), FieldValue::Int(counters.dropin as i64)),
                        ("dropout".into(), FieldValue::Int(counters.dropout as i64)),
                    ],
                )
            })
            .collect();
        entities.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Payload::PerEntity(entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_collect_shape() {
        let mut collector = NetErrorsCollector::new();
        let Payload::PerEntity(entities) = collector.collect().unwrap() else {
            panic!("net_errors payload must fan out");
        };
        assert!(!entities.is_empty());
        let names: Vec<_> = entities[0].1.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["errin", "errout", "dropin", "dropout"]);
    }
}
