//! syspoll common types, schema registry, and errors.
//!
//! This crate provides foundational types shared across syspoll modules:
//! - The metric record data model (`MetricRecord`, `FieldValue`, `Payload`)
//! - The static category schema registry (`Category`, `FieldSpec`)
//! - The unified error type with the fatal/skippable taxonomy
//! - Run identity for file naming and correlation

pub mod error;
pub mod id;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use id::RunId;
pub use schema::{Category, FieldKind, FieldSpec};
pub use types::{FieldValue, MetricRecord, Payload, Sample};
