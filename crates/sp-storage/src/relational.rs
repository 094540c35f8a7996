//! Relational sink: one SQLite table per category.
//!
//! DDL derives directly from the category schema: `TEXT` for the
//! timestamp and Text/Json fields, `INTEGER` for Integer/Bool, `REAL` for
//! Real. Inserts bind positionally in schema order after the timestamp and
//! commit individually; durability per record is preferred over batching
//! throughput, and a crash between inserts leaves prior rows committed.

use crate::RecordSink;
use chrono::SecondsFormat;
use rusqlite::Connection;
use sp_common::{Category, Error, FieldKind, FieldValue, MetricRecord, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct RelationalSink {
    conn: Connection,
    path: PathBuf,
    tables: HashSet<Category>,
    written: HashMap<Category, u64>,
}

impl RelationalSink {
    /// Open (creating if needed) the database file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::sink("sqlite", e))?;
            }
        }
        let conn = Connection::open(&path)
            .map_err(|e| Error::sink("sqlite", format!("{}: {e}", path.display())))?;
        Ok(Self {
            conn,
            path,
            tables: HashSet::new(),
            written: HashMap::new(),
        })
    }

    /// SQL column type for a declared field kind.
    fn sql_type(kind: FieldKind) -> &'static str {
        match kind {
            FieldKind::Integer | FieldKind::Bool => "INTEGER",
            FieldKind::Real => "REAL",
            FieldKind::Text | FieldKind::Json => "TEXT",
        }
    }

    fn ensure_table(&mut self, category: Category) -> Result<()> {
        if self.tables.contains(&category) {
            return Ok(());
        }
        let columns: Vec<String> = std::iter::once("timestamp TEXT NOT NULL".to_string())
            .chain(
                category
                    .fields()
                    .iter()
                    .map(|f| format!("{} {}", f.name, Self::sql_type(f.kind))),
            )
            .collect();
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            category.table(),
            columns.join(", ")
        );
        self.conn
            .execute(&ddl, [])
            .map_err(|e| Error::sink("sqlite", format!("{}: {e}", category.table())))?;
        debug!(table = %category.table(), "ensured table");
        self.tables.insert(category);
        Ok(())
    }

    /// Rows currently stored for a category (insert-count parity checks).
    pub fn row_count(&self, category: Category) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", category.table()),
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::sink("sqlite", e))?;
        Ok(count as u64)
    }
}

impl RecordSink for RelationalSink {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn write(&mut self, record: &MetricRecord) -> Result<()> {
        self.ensure_table(record.category)?;

        let placeholders: Vec<String> = (1..=record.category.fields().len() + 1)
            .map(|i| format!("?{i}"))
            .collect();
        let sql = format!(
            "INSERT INTO {} VALUES ({})",
            record.category.table(),
            placeholders.join(", ")
        );

        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        params.push(Box::new(
            record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ));
        for spec in record.category.fields() {
            let value = record.field(spec.name).ok_or_else(|| {
                Error::sink(
                    "sqlite",
                    format!("{} record missing field {}", record.category, spec.name),
                )
            })?;
            params.push(match value {
                FieldValue::Int(v) => Box::new(*v),
                FieldValue::Real(v) => Box::new(*v),
                FieldValue::Bool(v) => Box::new(*v),
                FieldValue::Text(v) => Box::new(v.clone()),
                FieldValue::Json(v) => Box::new(v.to_string()),
            });
        }
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();

        // Autocommit: each insert is its own transaction.
        self.conn
            .execute(&sql, param_refs.as_slice())
            .map_err(|e| Error::sink("sqlite", format!("{}: {e}", record.category.table())))?;

        *self.written.entry(record.category).or_insert(0) += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let total: u64 = self.written.values().sum();
        info!(db = %self.path.display(), rows = total, "relational sink closed");
        Ok(())
    }

    fn written(&self) -> &HashMap<Category, u64> {
        &self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(category: Category, fields: Vec<(&str, FieldValue)>) -> MetricRecord {
        MetricRecord {
            category,
            timestamp: Utc.with_ymd_and_hms(2025, 12, 16, 20, 22, 13).unwrap(),
            entity: None,
            fields: fields
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        }
    }

    fn disk_record() -> MetricRecord {
        record(
            Category::Disk,
            vec![
                ("path", FieldValue::Text("/".into())),
                ("total", FieldValue::Int(103705931776)),
                ("free", FieldValue::Int(83575291904)),
                ("percent", FieldValue::Real(15.9)),
            ],
        )
    }

    #[test]
    fn test_insert_count_parity() {
        let dir = TempDir::new().unwrap();
        let mut sink = RelationalSink::new(dir.path().join("metrics.db")).unwrap();
        for _ in 0..3 {
            sink.write(&disk_record()).unwrap();
        }
        sink.finish().unwrap();

        assert_eq!(sink.row_count(Category::Disk).unwrap(), 3);
        assert_eq!(sink.written().get(&Category::Disk), Some(&3));
    }

    #[test]
    fn test_table_per_category_with_schema_columns() {
        let dir = TempDir::new().unwrap();
        let mut sink = RelationalSink::new(dir.path().join("metrics.db")).unwrap();
        sink.write(&disk_record()).unwrap();

        let columns: Vec<String> = {
            let mut stmt = sink
                .conn
                .prepare("SELECT name FROM pragma_table_info('disk_metrics')")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .map(|r| r.unwrap())
                .collect()
        };
        assert_eq!(columns, vec!["timestamp", "path", "total", "free", "percent"]);
    }

    #[test]
    fn test_values_round_trip_positionally() {
        let dir = TempDir::new().unwrap();
        let mut sink = RelationalSink::new(dir.path().join("metrics.db")).unwrap();
        sink.write(&disk_record()).unwrap();

        let (ts, path, total, percent): (String, String, i64, f64) = sink
            .conn
            .query_row(
                "SELECT timestamp, path, total, percent FROM disk_metrics",
                [],
                |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                },
            )
            .unwrap();
        assert_eq!(ts, "2025-12-16T20:22:13.000Z");
        assert_eq!(path, "/");
        assert_eq!(total, 103705931776);
        assert_eq!(percent, 15.9);
    }

    #[test]
    fn test_nested_value_stored_as_text() {
        let dir = TempDir::new().unwrap();
        let mut sink = RelationalSink::new(dir.path().join("metrics.db")).unwrap();
        sink.write(&record(
            Category::NetIf,
            vec![
                ("ifname", FieldValue::Text("eth0".into())),
                ("isup", FieldValue::Bool(true)),
                ("mtu", FieldValue::Int(1500)),
                ("speed_mbps", FieldValue::Int(1000)),
                (
                    "ips",
                    FieldValue::Json(serde_json::json!(["10.0.0.5"])),
                ),
            ],
        ))
        .unwrap();

        let (isup, ips): (i64, String) = sink
            .conn
            .query_row("SELECT isup, ips FROM net_if_metrics", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(isup, 1);
        assert_eq!(ips, r#"["10.0.0.5"]"#);
    }

    #[test]
    fn test_every_category_gets_a_table() {
        let dir = TempDir::new().unwrap();
        let mut sink = RelationalSink::new(dir.path().join("metrics.db")).unwrap();
        for category in Category::ALL {
            let fields = category
                .fields()
                .iter()
                .map(|spec| {
                    let value = match spec.kind {
                        FieldKind::Integer => FieldValue::Int(1),
                        FieldKind::Real => FieldValue::Real(1.5),
                        FieldKind::Bool => FieldValue::Bool(true),
                        FieldKind::Text => FieldValue::Text("x".into()),
                        FieldKind::Json => FieldValue::Json(serde_json::json!([])),
                    };
                    (spec.name, value)
                })
                .collect();
            sink.write(&record(category, fields)).unwrap();
        }
        for category in Category::ALL {
            assert_eq!(sink.row_count(category).unwrap(), 1, "{category}");
        }
    }

    #[test]
    fn test_reopen_appends_to_existing_table() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("metrics.db");
        {
            let mut sink = RelationalSink::new(&db).unwrap();
            sink.write(&disk_record()).unwrap();
            sink.finish().unwrap();
        }
        let mut sink = RelationalSink::new(&db).unwrap();
        sink.write(&disk_record()).unwrap();
        assert_eq!(sink.row_count(Category::Disk).unwrap(), 2);
    }
}
