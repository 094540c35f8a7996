//! syspoll pipeline: collect system metrics into self-describing text
//! records, re-derive structured records from those logs, and persist them
//! to columnar or relational sinks.
//!
//! The binary wires two drivers around the shared [`RunContext`]:
//! - [`poll::run_poll`]: collect → encode → append one line per category
//! - [`ship::run_ship`]: decode → route → sink → optional archive

pub mod context;
pub mod exit_codes;
pub mod logging;
pub mod poll;
pub mod request;
pub mod router;
pub mod ship;

pub use context::RunContext;
pub use exit_codes::ExitCode;
pub use request::CategoryRequest;
pub use router::RecordRouter;
