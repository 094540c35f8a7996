//! Columnar file sink: one CSV per category.
//!
//! The first record for a category opens its file and writes the header
//! row (`Timestamp` plus the schema field names in declared order).
//! Nested and free-form values are escaped into a single token so the
//! column count stays constant. File names embed the run-start epoch so
//! repeated runs never collide; overwrite must be requested explicitly.

use crate::RecordSink;
use chrono::SecondsFormat;
use sp_common::{Category, Error, MetricRecord, Result, RunId};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct ColumnarFileSink {
    dir: PathBuf,
    run: RunId,
    overwrite: bool,
    files: HashMap<Category, BufWriter<File>>,
    written: HashMap<Category, u64>,
}

impl ColumnarFileSink {
    /// Create the sink, ensuring the output directory exists.
    pub fn new(dir: impl Into<PathBuf>, run: RunId, overwrite: bool) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::sink("csv", e))?;
        Ok(Self {
            dir,
            run,
            overwrite,
            files: HashMap::new(),
            written: HashMap::new(),
        })
    }

    /// Path of the file a category writes to in this run.
    pub fn file_path(&self, category: Category) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", category, self.run.epoch_secs()))
    }

    fn open(&self, category: Category) -> Result<BufWriter<File>> {
        let path = self.file_path(category);
        let file = if self.overwrite {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)
        } else {
            OpenOptions::new().write(true).create_new(true).open(&path)
        }
        .map_err(|e| Error::sink("csv", format!("{}: {e}", path.display())))?;

        let mut writer = BufWriter::new(file);
        let header: Vec<&str> = std::iter::once("Timestamp")
            .chain(category.fields().iter().map(|f| f.name))
            .collect();
        writeln!(writer, "{}", header.join(",")).map_err(|e| Error::sink("csv", e))?;

        debug!(path = %path.display(), "opened columnar file");
        Ok(writer)
    }
}

impl RecordSink for ColumnarFileSink {
    fn kind(&self) -> &'static str {
        "csv"
    }

    fn write(&mut self, record: &MetricRecord) -> Result<()> {
        if !self.files.contains_key(&record.category) {
            let writer = self.open(record.category)?;
            self.files.insert(record.category, writer);
        }
        let writer = self.files.get_mut(&record.category).expect("just inserted");

        let mut row = Vec::with_capacity(record.category.fields().len() + 1);
        row.push(
            record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        for spec in record.category.fields() {
            let value = record.field(spec.name).ok_or_else(|| {
                Error::sink(
                    "csv",
                    format!("{} record missing field {}", record.category, spec.name),
                )
            })?;
            row.push(escape(&value.to_token()));
        }
        writeln!(writer, "{}", row.join(",")).map_err(|e| Error::sink("csv", e))?;

        *self.written.entry(record.category).or_insert(0) += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for (category, writer) in self.files.iter_mut() {
            writer
                .flush()
                .map_err(|e| Error::sink("csv", format!("{category}: {e}")))?;
        }
        let total: u64 = self.written.values().sum();
        info!(dir = %self.dir.display(), rows = total, "columnar sink closed");
        Ok(())
    }

    fn written(&self) -> &HashMap<Category, u64> {
        &self.written
    }
}

/// Escape one CSV value: quote when it contains a separator, quote, or
/// newline, doubling embedded quotes.
fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split one CSV line back into fields (tests and downstream readers).
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sp_common::{FieldKind, FieldValue};
    use tempfile::TempDir;

    fn run() -> RunId {
        RunId::from_timestamp(Utc.with_ymd_and_hms(2025, 12, 16, 20, 22, 13).unwrap())
    }

    fn synthetic(category: Category) -> MetricRecord {
        let fields = category
            .fields()
            .iter()
            .map(|spec| {
                let value = match spec.kind {
                    FieldKind::Integer => FieldValue::Int(1),
                    FieldKind::Real => FieldValue::Real(1.5),
                    FieldKind::Bool => FieldValue::Bool(true),
                    FieldKind::Text => FieldValue::Text("x".into()),
                    FieldKind::Json => FieldValue::Json(serde_json::json!(["a", "b"])),
                };
                (spec.name.to_string(), value)
            })
            .collect();
        MetricRecord {
            category,
            timestamp: run().started_at(),
            entity: category.entity_field().map(|_| "x".to_string()),
            fields,
        }
    }

    fn disk_record() -> MetricRecord {
        MetricRecord {
            category: Category::Disk,
            timestamp: Utc.with_ymd_and_hms(2025, 12, 16, 20, 22, 13).unwrap(),
            entity: None,
            fields: vec![
                ("path".into(), FieldValue::Text("/".into())),
                ("total".into(), FieldValue::Int(103705931776)),
                ("free".into(), FieldValue::Int(83575291904)),
                ("percent".into(), FieldValue::Real(15.9)),
            ],
        }
    }

    #[test]
    fn test_header_matches_schema_order() {
        let dir = TempDir::new().unwrap();
        let mut sink = ColumnarFileSink::new(dir.path(), run(), false).unwrap();
        sink.write(&disk_record()).unwrap();
        sink.finish().unwrap();

        let content = fs::read_to_string(sink.file_path(Category::Disk)).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Timestamp,path,total,free,percent"));
        assert_eq!(
            lines.next(),
            Some("2025-12-16T20:22:13.000Z,/,103705931776,83575291904,15.9")
        );
    }

    #[test]
    fn test_header_stability_every_category() {
        let dir = TempDir::new().unwrap();
        let mut sink = ColumnarFileSink::new(dir.path(), run(), false).unwrap();
        for category in Category::ALL {
            sink.write(&synthetic(category)).unwrap();
        }
        sink.finish().unwrap();

        for category in Category::ALL {
            let expected: Vec<&str> = std::iter::once("Timestamp")
                .chain(category.fields().iter().map(|f| f.name))
                .collect();
            let content = fs::read_to_string(sink.file_path(category)).unwrap();
            assert_eq!(
                content.lines().next().unwrap(),
                expected.join(","),
                "{category}"
            );
        }
    }

    #[test]
    fn test_file_name_embeds_run_epoch() {
        let dir = TempDir::new().unwrap();
        let sink = ColumnarFileSink::new(dir.path(), run(), false).unwrap();
        let name = sink
            .file_path(Category::Disk)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(name, format!("disk_{}.csv", run().epoch_secs()));
    }

    #[test]
    fn test_no_clobber_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let mut sink = ColumnarFileSink::new(dir.path(), run(), false).unwrap();
        sink.write(&disk_record()).unwrap();
        sink.finish().unwrap();

        // Same run id again: the file exists, create_new must refuse.
        let mut second = ColumnarFileSink::new(dir.path(), run(), false).unwrap();
        let err = second.write(&disk_record()).unwrap_err();
        assert!(err.is_fatal());

        let mut forced = ColumnarFileSink::new(dir.path(), run(), true).unwrap();
        forced.write(&disk_record()).unwrap();
        forced.finish().unwrap();
    }

    #[test]
    fn test_nested_value_keeps_column_count() {
        let dir = TempDir::new().unwrap();
        let mut sink = ColumnarFileSink::new(dir.path(), run(), false).unwrap();
        sink.write(&MetricRecord {
            category: Category::NetIf,
            timestamp: run().started_at(),
            entity: Some("eth0".into()),
            fields: vec![
                ("ifname".into(), FieldValue::Text("eth0".into())),
                ("isup".into(), FieldValue::Bool(true)),
                ("mtu".into(), FieldValue::Int(1500)),
                ("speed_mbps".into(), FieldValue::Int(1000)),
                (
                    "ips".into(),
                    FieldValue::Json(serde_json::json!(["10.0.0.5", "fe80::1"])),
                ),
            ],
        })
        .unwrap();
        sink.finish().unwrap();

        let content = fs::read_to_string(sink.file_path(Category::NetIf)).unwrap();
        let row = content.lines().nth(1).unwrap();
        let fields = split_csv_line(row);
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[5], r#"["10.0.0.5","fe80::1"]"#);
    }

    #[test]
    fn test_written_counts() {
        let dir = TempDir::new().unwrap();
        let mut sink = ColumnarFileSink::new(dir.path(), run(), false).unwrap();
        sink.write(&disk_record()).unwrap();
        sink.write(&disk_record()).unwrap();
        assert_eq!(sink.written().get(&Category::Disk), Some(&2));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(split_csv_line("\"a,b\",c"), vec!["a,b", "c"]);
    }
}
