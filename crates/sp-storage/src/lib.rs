//! Durable sinks for decoded metric records.
//!
//! A sink owns its storage handle for the lifetime of one run: opened
//! before the first record, `finish()`ed on every exit path. Both
//! implementations derive their column layout from the category schema, so
//! column order is stable across runs:
//!
//! - [`ColumnarFileSink`]: one CSV file per category, named
//!   `<category>_<run-start-unix-seconds>.csv`
//! - [`RelationalSink`]: one SQLite table per category, named
//!   `<category>_metrics`
//!
//! Sinks are not shared across concurrent runs against the same storage
//! location; callers provide external mutual exclusion.

pub mod columnar;
pub mod relational;

pub use columnar::ColumnarFileSink;
pub use relational::RelationalSink;

use sp_common::{Category, MetricRecord, Result};
use std::collections::HashMap;

/// A durable destination for a stream of records.
pub trait RecordSink {
    /// Sink kind for logs and failure messages.
    fn kind(&self) -> &'static str;

    /// Persist one record.
    ///
    /// # Errors
    ///
    /// Returns `Error::SinkWrite` on storage failure; sink write failures
    /// are fatal for the run.
    fn write(&mut self, record: &MetricRecord) -> Result<()>;

    /// Flush and close. Called on every exit path, including failures.
    fn finish(&mut self) -> Result<()>;

    /// Records written so far, per category.
    fn written(&self) -> &HashMap<Category, u64>;
}
