//! Logging initialization.
//!
//! All log output goes to stderr; stdout is reserved for record lines and
//! command payloads so `syspoll poll >> metrics.log` stays clean. The
//! filter resolves in order: `SYSPOLL_LOG`, `RUST_LOG`, then the
//! verbosity flags.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Initialize the logging subsystem. Must be called once at startup.
pub fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = std::env::var("SYSPOLL_LOG")
        .ok()
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
