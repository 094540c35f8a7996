//! syspoll - cron-friendly system metrics poller and shipper.
//!
//! Two passes over the same record grammar:
//! - `poll` collects metrics and appends one self-describing line per
//!   category to a logfile (or stdout)
//! - `ship` re-derives structured records from that logfile and persists
//!   them to per-category CSV files or a SQLite database, optionally
//!   bundling the output for shipping

use clap::{Args, Parser, Subcommand};
use sp_collect::CollectOptions;
use sp_core::context::DEFAULT_SOURCE;
use sp_core::poll::{run_poll, PollOptions};
use sp_core::ship::{run_ship, ShipOptions};
use sp_core::{CategoryRequest, ExitCode, RunContext};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

/// Cron-friendly system metrics poller and shipper
#[derive(Parser)]
#[command(name = "syspoll")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only ("cron mode")
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Treat unknown categories, malformed lines, and collection
    /// failures as fatal instead of warnings
    #[arg(long, global = true)]
    strict: bool,

    /// Include the loopback interface in interface-keyed categories
    #[arg(long, global = true)]
    include_loopback: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect metrics and emit one record line per category
    Poll(PollArgs),

    /// Parse a record logfile into durable per-category sinks
    Ship(ShipArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct PollArgs {
    /// Comma-separated categories (default: all except bandwidth);
    /// bandwidth accepts an interface as bandwidth:eth0
    categories: Option<String>,

    /// Append records to this file instead of stdout
    #[arg(short, long)]
    logfile: Option<PathBuf>,

    /// Source id stamped into the record preamble
    #[arg(long, default_value = DEFAULT_SOURCE)]
    source: String,

    /// Filesystem path for the disk category
    #[arg(long, default_value = "/")]
    disk_path: PathBuf,

    /// Bandwidth sampling interval in seconds
    #[arg(long, default_value_t = 1.0)]
    interval: f64,
}

#[derive(Args, Debug)]
struct ShipArgs {
    /// Comma-separated categories to ship (default: all except bandwidth)
    categories: Option<String>,

    /// The full path to the logfile to be parsed
    #[arg(short, long)]
    logfile: PathBuf,

    /// Output directory for sink files
    #[arg(short, long, default_value = "csvs")]
    out_dir: PathBuf,

    /// Persist to a SQLite database instead of CSV files
    #[arg(long)]
    sqlite: bool,

    /// Database path (default: <out-dir>/metrics.db)
    #[arg(long, requires = "sqlite")]
    db_path: Option<PathBuf>,

    /// Replace existing output files from the same run second
    #[arg(long)]
    overwrite: bool,

    /// Bundle the output directory into a ZIP after shipping
    #[arg(long)]
    archive: bool,

    /// Bundle path (default: <out-dir>.zip)
    #[arg(long, requires = "archive")]
    archive_path: Option<PathBuf>,

    /// Remove the output directory after a successful bundle write
    #[arg(long, requires = "archive")]
    delete_source: bool,

    /// Never replace an existing bundle and never delete sources
    #[arg(long)]
    no_clobber: bool,
}

fn main() {
    let cli = Cli::parse();
    sp_core::logging::init_logging(cli.global.verbose, cli.global.quiet);

    let exit_code = match cli.command {
        Commands::Poll(args) => cmd_poll(&cli.global, args),
        Commands::Ship(args) => cmd_ship(&cli.global, args),
        Commands::Version => {
            println!("syspoll {}", env!("CARGO_PKG_VERSION"));
            ExitCode::Clean
        }
    };
    std::process::exit(exit_code.as_i32());
}

fn parse_categories(raw: &Option<String>) -> Vec<CategoryRequest> {
    match raw {
        Some(list) => CategoryRequest::parse_list(list),
        None => CategoryRequest::defaults(),
    }
}

fn cmd_poll(global: &GlobalOpts, args: PollArgs) -> ExitCode {
    let ctx = RunContext::new(args.source.clone(), global.include_loopback, global.strict);
    let opts = PollOptions {
        categories: parse_categories(&args.categories),
        logfile: args.logfile,
        collect: CollectOptions {
            disk_path: args.disk_path,
            bandwidth_interval: Duration::from_secs_f64(args.interval.max(0.0)),
        },
    };

    match run_poll(&ctx, &opts) {
        Ok(_) => ExitCode::Clean,
        Err(e) => {
            error!(stage = e.stage(), "poll failed: {e}");
            ExitCode::from_error(&e)
        }
    }
}

fn cmd_ship(global: &GlobalOpts, args: ShipArgs) -> ExitCode {
    let ctx = RunContext::new(DEFAULT_SOURCE, global.include_loopback, global.strict);
    let opts = ShipOptions {
        categories: parse_categories(&args.categories),
        logfile: args.logfile,
        out_dir: args.out_dir,
        use_sqlite: args.sqlite,
        db_path: args.db_path,
        overwrite: args.overwrite,
        archive: args.archive,
        archive_path: args.archive_path,
        delete_source: args.delete_source,
        no_clobber: args.no_clobber,
    };

    match run_ship(&ctx, &opts) {
        Ok(_) => ExitCode::Clean,
        Err(e) => {
            error!(stage = e.stage(), "ship failed: {e}");
            ExitCode::from_error(&e)
        }
    }
}
