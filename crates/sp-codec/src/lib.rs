//! Record codec: encode one collected sample as one self-describing text
//! line, and decode a line back into typed records without a schema
//! embedded in the line.
//!
//! Line grammar:
//!
//! ```text
//! <timestamp> <source-id> <category> DATA name=value, name=value, ...
//! ```
//!
//! The timestamp is RFC3339 with millisecond precision and a `Z` suffix.
//! Values are either the direct string form of a scalar or a single
//! whitespace-free JSON token for nested values. Fan-out categories put
//! one `<entity>=<json-object>` pair per sub-entity on the same line; the
//! decoder fans them out into one record each, all sharing the preamble
//! timestamp.

pub mod decode;
pub mod encode;
pub mod split;
pub mod timestamp;

pub use decode::decode;
pub use encode::{encode, MARKER};
pub use timestamp::{format_timestamp, now_millis, parse_timestamp};
