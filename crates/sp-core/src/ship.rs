//! Ship driver: re-derive records from a logfile and persist them.
//!
//! The input check runs before any sink opens, so a missing logfile never
//! leaves an empty output directory behind. Sinks are closed on every exit
//! path; a pipeline error takes precedence over a close error. Archiving
//! only runs after the sinks closed cleanly.

use crate::context::RunContext;
use crate::request::CategoryRequest;
use crate::router::RecordRouter;
use sp_bundle::{ArchiveOptions, ArchiveWriter};
use sp_codec::decode;
use sp_common::{Category, Error, Result};
use sp_storage::{ColumnarFileSink, RecordSink, RelationalSink};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Options for one ship run.
#[derive(Debug, Clone)]
pub struct ShipOptions {
    pub categories: Vec<CategoryRequest>,
    /// Logfile to re-parse; must exist.
    pub logfile: PathBuf,
    /// Sink output directory (CSV files, and the database by default).
    pub out_dir: PathBuf,
    /// Select the relational sink over the columnar file sink.
    pub use_sqlite: bool,
    /// Database path override; defaults to `<out_dir>/metrics.db`.
    pub db_path: Option<PathBuf>,
    /// Allow the columnar sink to replace same-run files.
    pub overwrite: bool,
    /// Bundle the output directory after shipping.
    pub archive: bool,
    /// Bundle path override; defaults to `<out_dir>.zip`.
    pub archive_path: Option<PathBuf>,
    /// Remove the output directory after a successful bundle write.
    pub delete_source: bool,
    /// Never replace an existing bundle and never delete anything.
    pub no_clobber: bool,
}

impl ShipOptions {
    pub fn new(logfile: impl Into<PathBuf>) -> Self {
        Self {
            categories: CategoryRequest::defaults(),
            logfile: logfile.into(),
            out_dir: PathBuf::from("csvs"),
            use_sqlite: false,
            db_path: None,
            overwrite: false,
            archive: false,
            archive_path: None,
            delete_source: false,
            no_clobber: false,
        }
    }
}

/// Outcome of one ship run.
#[derive(Debug, Default, Clone)]
pub struct ShipSummary {
    /// Records persisted per category.
    pub written: HashMap<Category, u64>,
    /// Lines read from the logfile.
    pub lines: usize,
    /// Lines for categories outside the requested set.
    pub skipped: usize,
    /// Skippable decode problems (malformed lines, unknown categories).
    pub warnings: usize,
    /// Bundle path, when archiving ran.
    pub bundle: Option<PathBuf>,
}

/// Run one ship pass.
pub fn run_ship(ctx: &RunContext, opts: &ShipOptions) -> Result<ShipSummary> {
    if !opts.logfile.exists() {
        return Err(Error::InputNotFound {
            path: opts.logfile.clone(),
        });
    }

    // Resolve the request list up front; in strict mode a typo aborts
    // before any sink opens.
    let mut requested = Vec::new();
    for request in &opts.categories {
        match request.resolve() {
            Ok((category, _)) => requested.push(category),
            Err(e) if ctx.strict => return Err(e),
            Err(Error::UnknownCategory { name }) => {
                warn!(category = %name, "unrecognized category requested");
            }
            Err(e) => return Err(e),
        }
    }

    let content = fs::read_to_string(&opts.logfile)?;

    let sink: Box<dyn RecordSink> = if opts.use_sqlite {
        let db_path = opts
            .db_path
            .clone()
            .unwrap_or_else(|| opts.out_dir.join("metrics.db"));
        Box::new(RelationalSink::new(db_path)?)
    } else {
        Box::new(ColumnarFileSink::new(
            opts.out_dir.clone(),
            ctx.run,
            opts.overwrite,
        )?)
    };
    let mut router = RecordRouter::new(vec![sink], ctx.include_loopback);

    let mut summary = ShipSummary::default();
    let result = ship_lines(ctx, &content, &requested, &mut router, &mut summary);

    // Scoped release: sinks close on every exit path; the pipeline error
    // wins over a close error.
    let close_result = router.finish();
    summary.written = router.written();
    result.and(close_result)?;

    if opts.archive {
        let target = opts
            .archive_path
            .clone()
            .unwrap_or_else(|| opts.out_dir.with_extension("zip"));
        let archive_opts = ArchiveOptions {
            no_clobber: opts.no_clobber,
            delete_source: opts.delete_source,
        };
        ArchiveWriter::from_dir(&opts.out_dir)
            .and_then(|writer| writer.write(&target, &archive_opts))
            .map_err(|e| Error::sink("archive", e))?;
        summary.bundle = Some(target);
    }

    info!(
        lines = summary.lines,
        skipped = summary.skipped,
        warnings = summary.warnings,
        records = summary.written.values().sum::<u64>(),
        "ship complete"
    );
    Ok(summary)
}

fn ship_lines(
    ctx: &RunContext,
    content: &str,
    requested: &[Category],
    router: &mut RecordRouter,
    summary: &mut ShipSummary,
) -> Result<()> {
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        summary.lines += 1;
        match decode(line) {
            Ok(records) => {
                let category = records[0].category;
                if !requested.contains(&category) {
                    debug!(%category, line = idx + 1, "category not requested; line skipped");
                    summary.skipped += 1;
                    continue;
                }
                router.route(records)?;
            }
            Err(e) if e.is_fatal() || ctx.strict => return Err(e),
            Err(e) => {
                warn!(line = idx + 1, "line skipped: {e}");
                summary.warnings += 1;
            }
        }
    }
    Ok(())
}
