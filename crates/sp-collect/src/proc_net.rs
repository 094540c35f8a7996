//! Parser for `/proc/net/dev`.
//!
//! The file carries per-interface receive and transmit counters:
//!
//! ```text
//! Inter-|   Receive                                                |  Transmit
//!  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
//!     lo:  266529    2597    0    0    0     0          0         0   266529    2597    0    0    0     0       0          0
//! ```
//!
//! Only the error and drop counters are of interest here; `sysinfo` covers
//! byte counters but not drops.

use sp_common::{Category, Error, Result};
use std::fs;

const PROC_NET_DEV: &str = "/proc/net/dev";

/// Error/drop counters for one interface, cumulative since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetDevCounters {
    /// Receive errors.
    pub errin: u64,
    /// Transmit errors.
    pub errout: u64,
    /// Inbound packets dropped.
    pub dropin: u64,
    /// Outbound packets dropped.
    pub dropout: u64,
}

/// Parse `/proc/net/dev` content into per-interface counters, in file
/// order. Lines that do not match the two-column layout are skipped.
pub fn parse_net_dev(content: &str) -> Vec<(String, NetDevCounters)> {
    let mut out = Vec::new();
    for line in content.lines().skip(2) {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let cols: Vec<u64> = rest
            .split_whitespace()
            .map(|c| c.parse::<u64>().unwrap_or(0))
            .collect();
        // 8 receive columns then 8 transmit columns.
        if cols.len() < 12 {
            continue;
        }
        out.push((
            name.trim().to_string(),
            NetDevCounters {
                errin: cols[2],
                dropin: cols[3],
                errout: cols[10],
                dropout: cols[11],
            },
        ));
    }
    out
}

/// Read and parse the live `/proc/net/dev`.
pub fn read_net_dev() -> Result<Vec<(String, NetDevCounters)>> {
    let content = fs::read_to_string(PROC_NET_DEV).map_err(|e| Error::Collection {
        category: Category::NetErrors.to_string(),
        reason: format!("{PROC_NET_DEV}: {e}"),
    })?;
    Ok(parse_net_dev(&content))
}
