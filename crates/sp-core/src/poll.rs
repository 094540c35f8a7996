//! Poll driver: collect the requested categories and append one encoded
//! line per category.
//!
//! Cron-friendly by design: without `--logfile`, lines go to stdout and
//! cron's redirect owns the file. A category whose collection fails is
//! logged and skipped; the remaining categories still emit. An
//! unrecognized category name emits a low-priority `unknown` record
//! instead of aborting the run.

use crate::context::RunContext;
use crate::request::CategoryRequest;
use crate::router::filter_payload;
use sp_codec::{encode, format_timestamp, now_millis, MARKER};
use sp_collect::{collector_for, CollectOptions};
use sp_common::{Error, Result, Sample};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Options for one poll run.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub categories: Vec<CategoryRequest>,
    /// Append target; stdout when absent.
    pub logfile: Option<PathBuf>,
    pub collect: CollectOptions,
}

/// Outcome counters for one poll run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    /// Record lines emitted (unknown records included).
    pub lines: usize,
    /// Categories whose collection failed.
    pub failures: usize,
    /// Unrecognized category names.
    pub unknown: usize,
}

/// Run one poll pass.
pub fn run_poll(ctx: &RunContext, opts: &PollOptions) -> Result<PollSummary> {
    let mut out: Box<dyn Write> = match &opts.logfile {
        Some(path) => {
            let file = OpenOptions::new().append(true).create(true).open(path)?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let mut summary = PollSummary::default();
    for request in &opts.categories {
        match request.resolve() {
            Ok((category, arg)) => {
                let mut collector = collector_for(category, arg, &opts.collect);
                match collector.collect() {
                    Ok(payload) => {
                        let payload = filter_payload(payload, ctx.include_loopback);
                        if payload.record_count() == 0 {
                            debug!(%category, "nothing to report");
                            continue;
                        }
                        let sample = Sample {
                            category,
                            timestamp: now_millis(),
                            source: ctx.source.clone(),
                            payload,
                        };
                        writeln!(out, "{}", encode(&sample))?;
                        summary.lines += 1;
                    }
                    Err(e) if ctx.strict => return Err(e),
                    Err(e) => {
                        warn!(%category, "collection failed: {e}");
                        summary.failures += 1;
                    }
                }
            }
            Err(e @ Error::UnknownCategory { .. }) if ctx.strict => return Err(e),
            Err(Error::UnknownCategory { name }) => {
                warn!(category = %name, "unrecognized category requested");
                writeln!(
                    out,
                    "{} {} unknown {MARKER} requested={}",
                    format_timestamp(now_millis()),
                    ctx.source,
                    name
                )?;
                summary.lines += 1;
                summary.unknown += 1;
            }
            Err(e) => return Err(e),
        }
    }
    out.flush()?;

    info!(
        lines = summary.lines,
        failures = summary.failures,
        unknown = summary.unknown,
        "poll complete"
    );
    Ok(summary)
}
