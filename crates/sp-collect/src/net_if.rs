//! Network interface inventory: link state, MTU, speed, addresses.

use crate::sys_net::read_link_attrs;
use crate::Collector;
use sp_common::{Category, FieldValue, Payload, Result};
use sysinfo::Networks;

pub struct NetIfCollector {
    networks: Networks,
}

impl NetIfCollector {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for NetIfCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for NetIfCollector {
    fn category(&self) -> Category {
        Category::NetIf
    }

    fn collect(&mut self) -> Result<Payload> {
        self.networks.refresh_list();

        let mut entities = Vec::new();
        for (ifname, data) in self.networks.iter() {
            let attrs = read_link_attrs(ifname);
            let ips: Vec<String> = data
                .ip_networks()
                .iter()
                .map(|net| net.addr.to_string())
                .collect();

            entities.push((
                ifname.clone(),
                vec![
                    ("isup".into(), FieldValue::Bool(attrs.isup)),
                    ("mtu".into(), FieldValue::Int(attrs.mtu)),
                    ("speed_mbps".into(), FieldValue::Int(attrs.speed_mbps)),
                    (
                        "ips".into(),
                        FieldValue::Json(serde_json::json!(ips)),
                    ),
                ],
            ));
        }
        // Stable output order regardless of enumeration order.
        entities.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Payload::PerEntity(entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_shape() {
        let mut collector = NetIfCollector::new();
        let Payload::PerEntity(entities) = collector.collect().unwrap() else {
            panic!("net_if payload must fan out");
        };
        for (ifname, fields) in &entities {
            assert!(!ifname.is_empty());
            let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, vec!["isup", "mtu", "speed_mbps", "ips"]);
        }
    }
}
