//! The metric record data model.
//!
//! A `Sample` is what the collection layer hands over: one payload for one
//! category, stamped once. The codec turns a sample into a single text
//! line; decoding turns a line back into one or more `MetricRecord`s
//! (fan-out categories produce one record per sub-entity).

use crate::schema::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One field value: a scalar, or a nested value carried as a single JSON
/// token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(String),
    Json(serde_json::Value),
}

impl FieldValue {
    /// Render the value as its single-token line form: scalars as their
    /// direct string form, nested values as compact JSON.
    pub fn to_token(&self) -> String {
        match self {
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Real(v) => v.to_string(),
            FieldValue::Bool(v) => v.to_string(),
            FieldValue::Text(v) => v.clone(),
            FieldValue::Json(v) => v.to_string(),
        }
    }

    /// Convert into the JSON value used inside fan-out entity tokens.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Int(v) => serde_json::json!(v),
            FieldValue::Real(v) => serde_json::json!(v),
            FieldValue::Bool(v) => serde_json::json!(v),
            FieldValue::Text(v) => serde_json::json!(v),
            FieldValue::Json(v) => v.clone(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_token())
    }
}

/// One structured, timestamped observation for a category, optionally
/// scoped to a sub-entity (network interface).
///
/// `fields` follows the category schema's declared order and, for fan-out
/// categories, includes the entity-key field whose value equals `entity`.
/// Records are immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub category: Category,
    pub timestamp: DateTime<Utc>,
    pub entity: Option<String>,
    pub fields: Vec<(String, FieldValue)>,
}

impl MetricRecord {
    /// Look up a field value by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Raw per-category output of the collection layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// One record's worth of fields, in schema order.
    Flat(Vec<(String, FieldValue)>),
    /// Fan-out: sub-entity name mapped to that entity's fields (schema
    /// order, entity-key field excluded).
    PerEntity(Vec<(String, Vec<(String, FieldValue)>)>),
}

impl Payload {
    /// Number of records this payload will normalize into.
    pub fn record_count(&self) -> usize {
        match self {
            Payload::Flat(_) => 1,
            Payload::PerEntity(entities) => entities.len(),
        }
    }
}

/// One collected payload for one category: the encoder's unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub category: Category,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub payload: Payload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_forms() {
        assert_eq!(FieldValue::Int(42).to_token(), "42");
        assert_eq!(FieldValue::Real(15.9).to_token(), "15.9");
        assert_eq!(FieldValue::Bool(true).to_token(), "true");
        assert_eq!(FieldValue::Text("/".into()).to_token(), "/");
        assert_eq!(
            FieldValue::Json(serde_json::json!(["10.0.0.5", "fe80::1"])).to_token(),
            r#"["10.0.0.5","fe80::1"]"#
        );
    }

    #[test]
    fn test_record_field_lookup() {
        let record = MetricRecord {
            category: Category::Disk,
            timestamp: Utc::now(),
            entity: None,
            fields: vec![
                ("path".into(), FieldValue::Text("/".into())),
                ("total".into(), FieldValue::Int(100)),
            ],
        };
        assert_eq!(record.field("total"), Some(&FieldValue::Int(100)));
        assert_eq!(record.field("free"), None);
    }

    #[test]
    fn test_payload_record_count() {
        let flat = Payload::Flat(vec![("percent".into(), FieldValue::Real(1.0))]);
        assert_eq!(flat.record_count(), 1);

        let fanned = Payload::PerEntity(vec![
            ("eth0".into(), vec![]),
            ("wlan0".into(), vec![]),
        ]);
        assert_eq!(fanned.record_count(), 2);
    }
}
