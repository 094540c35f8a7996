//! Line decoding: one text line back into typed records.
//!
//! The preamble (timestamp, source id, category, marker) splits on single
//! spaces; the remainder goes through the depth-aware splitter so commas
//! inside nested JSON tokens survive. The category's registry entry then
//! selects the decode shape: flat categories locate each declared field by
//! name, fan-out categories parse one JSON object per sub-entity and emit
//! one record each, all stamped with the preamble timestamp.

use crate::split::{split_fields, split_pair};
use crate::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use sp_common::{Category, Error, FieldKind, FieldSpec, FieldValue, MetricRecord, Result};

/// Decode one line into its records.
///
/// Returns `UnknownCategory` for a category token outside the registry and
/// `MalformedLine` for everything structural: an incomplete preamble, an
/// empty field list, or a declared field that cannot be located or parsed.
/// Both are per-line errors; callers skip the line and continue.
pub fn decode(line: &str) -> Result<Vec<MetricRecord>> {
    let line = line.trim();
    let mut parts = line.splitn(5, ' ');
    let ts_token = parts.next().unwrap_or("");
    let source = parts.next().unwrap_or("");
    let category_token = parts.next().unwrap_or("");
    let marker = parts.next().unwrap_or("");
    let list = parts.next().unwrap_or("").trim();

    if ts_token.is_empty() || source.is_empty() || category_token.is_empty() || marker.is_empty()
    {
        return Err(Error::malformed("incomplete preamble"));
    }

    let timestamp = parse_timestamp(ts_token)?;
    let category = Category::lookup(category_token)?;

    if list.is_empty() {
        return Err(Error::malformed("missing field list"));
    }

    let pairs: Vec<(&str, &str)> = split_fields(list)
        .into_iter()
        .map(split_pair)
        .collect::<Result<_>>()?;

    if category.fan_out() {
        decode_fan_out(category, timestamp, &pairs)
    } else {
        decode_flat(category, timestamp, &pairs)
    }
}

/// Flat shape: every declared field located by name among the pairs.
/// Undeclared extras are tolerated.
fn decode_flat(
    category: Category,
    timestamp: DateTime<Utc>,
    pairs: &[(&str, &str)],
) -> Result<Vec<MetricRecord>> {
    let mut fields = Vec::with_capacity(category.fields().len());
    for spec in category.fields() {
        let (_, raw) = pairs
            .iter()
            .find(|(name, _)| *name == spec.name)
            .ok_or_else(|| {
                Error::malformed(format!("{category}: missing field {}", spec.name))
            })?;
        fields.push((spec.name.to_string(), parse_scalar(spec, raw)?));
    }
    Ok(vec![MetricRecord {
        category,
        timestamp,
        entity: None,
        fields,
    }])
}

/// Fan-out shape: each pair is `<entity>=<json-object>`; one record per
/// entity, the entity-key field synthesized from the pair name.
fn decode_fan_out(
    category: Category,
    timestamp: DateTime<Utc>,
    pairs: &[(&str, &str)],
) -> Result<Vec<MetricRecord>> {
    let entity_field = category.fields()[0].name;
    let mut records = Vec::with_capacity(pairs.len());

    for (entity, raw) in pairs {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
            Error::malformed(format!("{category}/{entity}: bad nested token: {e}"))
        })?;
        let obj = value.as_object().ok_or_else(|| {
            Error::malformed(format!("{category}/{entity}: nested token is not a mapping"))
        })?;

        let mut fields = Vec::with_capacity(category.fields().len());
        fields.push((
            entity_field.to_string(),
            FieldValue::Text((*entity).to_string()),
        ));
        for spec in &category.fields()[1..] {
            let nested = obj.get(spec.name).ok_or_else(|| {
                Error::malformed(format!(
                    "{category}/{entity}: missing field {}",
                    spec.name
                ))
            })?;
            fields.push((spec.name.to_string(), from_json(category, spec, nested)?));
        }
        records.push(MetricRecord {
            category,
            timestamp,
            entity: Some((*entity).to_string()),
            fields,
        });
    }
    Ok(records)
}

fn parse_scalar(spec: &FieldSpec, raw: &str) -> Result<FieldValue> {
    let bad = || Error::malformed(format!("field {} has bad value {raw:?}", spec.name));
    match spec.kind {
        FieldKind::Integer => raw.parse::<i64>().map(FieldValue::Int).map_err(|_| bad()),
        FieldKind::Real => raw.parse::<f64>().map(FieldValue::Real).map_err(|_| bad()),
        // Case-insensitive: the original emitter wrote Python `True`/`False`.
        FieldKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(FieldValue::Bool(true)),
            "false" => Ok(FieldValue::Bool(false)),
            _ => Err(bad()),
        },
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Json => serde_json::from_str(raw)
            .map(FieldValue::Json)
            .map_err(|_| bad()),
    }
}

fn from_json(
    category: Category,
    spec: &FieldSpec,
    value: &serde_json::Value,
) -> Result<FieldValue> {
    let bad = || {
        Error::malformed(format!(
            "{category}: field {} has wrong shape: {value}",
            spec.name
        ))
    };
    match spec.kind {
        FieldKind::Integer => value.as_i64().map(FieldValue::Int).ok_or_else(bad),
        FieldKind::Real => value.as_f64().map(FieldValue::Real).ok_or_else(bad),
        FieldKind::Bool => value.as_bool().map(FieldValue::Bool).ok_or_else(bad),
        FieldKind::Text => value
            .as_str()
            .map(|s| FieldValue::Text(s.to_string()))
            .ok_or_else(bad),
        FieldKind::Json => Ok(FieldValue::Json(value.clone())),
    }
}
