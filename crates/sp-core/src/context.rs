//! Pipeline run context.
//!
//! One context per run, passed explicitly to the drivers and router; there
//! is no module-level pipeline state. It carries the run identity (file
//! naming), the record source id, and the routing switches.

use sp_common::RunId;

/// Default source id stamped into record lines.
pub const DEFAULT_SOURCE: &str = "syspoll";

/// Shared state for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Run identity; its epoch seconds go into columnar file names.
    pub run: RunId,
    /// Source id written into the line preamble.
    pub source: String,
    /// Keep the loopback interface in interface-keyed categories.
    pub include_loopback: bool,
    /// Upgrade skippable errors (unknown category, malformed line,
    /// per-category collection failure) to fatal.
    pub strict: bool,
}

impl RunContext {
    pub fn new(source: impl Into<String>, include_loopback: bool, strict: bool) -> Self {
        Self {
            run: RunId::new(),
            source: source.into(),
            include_loopback,
            strict,
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE, false, false)
    }
}
