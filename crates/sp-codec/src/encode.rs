//! Sample encoding: one collected payload becomes one line.

use crate::timestamp::format_timestamp;
use sp_common::{Payload, Sample};

/// Marker token between the preamble and the field list.
pub const MARKER: &str = "DATA";

/// Encode a sample as one text line (no trailing newline).
///
/// Flat payloads emit `name=value` pairs in the order the payload carries
/// them (schema order by construction). Fan-out payloads emit one
/// `<entity>=<json-object>` pair per sub-entity, the object holding that
/// entity's fields as compact JSON.
pub fn encode(sample: &Sample) -> String {
    let pairs: Vec<String> = match &sample.payload {
        Payload::Flat(fields) => fields
            .iter()
            .map(|(name, value)| format!("{name}={}", value.to_token()))
            .collect(),
        Payload::PerEntity(entities) => entities
            .iter()
            .map(|(entity, fields)| {
                let obj: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect();
                format!("{entity}={}", serde_json::Value::Object(obj))
            })
            .collect(),
    };

    format!(
        "{} {} {} {} {}",
        format_timestamp(sample.timestamp),
        sample.source,
        sample.category,
        MARKER,
        pairs.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};
    use sp_common::{Category, FieldValue};

    fn ts() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 16, 20, 22, 13)
            .unwrap()
            .with_nanosecond(509_000_000)
            .unwrap()
    }

    #[test]
    fn test_encode_flat_matches_grammar() {
        let sample = Sample {
            category: Category::Disk,
            timestamp: ts(),
            source: "host".into(),
            payload: Payload::Flat(vec![
                ("path".into(), FieldValue::Text("/".into())),
                ("total".into(), FieldValue::Int(103705931776)),
                ("free".into(), FieldValue::Int(83575291904)),
                ("percent".into(), FieldValue::Real(15.9)),
            ]),
        };
        assert_eq!(
            encode(&sample),
            "2025-12-16T20:22:13.509Z host disk DATA \
             path=/, total=103705931776, free=83575291904, percent=15.9"
        );
    }

    #[test]
    fn test_encode_fan_out_is_one_line() {
        let sample = Sample {
            category: Category::Bandwidth,
            timestamp: ts(),
            source: "host".into(),
            payload: Payload::PerEntity(vec![
                (
                    "eth0".into(),
                    vec![
                        ("sent_Bps".into(), FieldValue::Int(1200)),
                        ("recv_Bps".into(), FieldValue::Int(880)),
                    ],
                ),
                (
                    "wlan0".into(),
                    vec![
                        ("sent_Bps".into(), FieldValue::Int(0)),
                        ("recv_Bps".into(), FieldValue::Int(64)),
                    ],
                ),
            ]),
        };
        let line = encode(&sample);
        assert!(!line.contains('\n'));
        assert!(line.contains(r#"eth0={"recv_Bps":880,"sent_Bps":1200}"#));
        assert!(line.contains(r#"wlan0={"recv_Bps":64,"sent_Bps":0}"#));
    }

    #[test]
    fn test_nested_json_tokens_are_whitespace_free() {
        let sample = Sample {
            category: Category::NetIf,
            timestamp: ts(),
            source: "host".into(),
            payload: Payload::PerEntity(vec![(
                "eth0".into(),
                vec![
                    ("isup".into(), FieldValue::Bool(true)),
                    ("mtu".into(), FieldValue::Int(1500)),
                    ("speed_mbps".into(), FieldValue::Int(1000)),
                    (
                        "ips".into(),
                        FieldValue::Json(serde_json::json!(["10.0.0.5", "fe80::1"])),
                    ),
                ],
            )]),
        };
        let line = encode(&sample);
        let token = line.split("eth0=").nth(1).unwrap();
        assert!(!token.contains(' '));
    }
}
