//! Per-interface link attributes from `/sys/class/net`.
//!
//! `sysinfo` enumerates interfaces and addresses but not link state, MTU,
//! or speed; those sit in sysfs attribute files, one value per file.

use std::fs;
use std::path::Path;

const SYS_CLASS_NET: &str = "/sys/class/net";

/// IFF_UP from the interface flags bitmask.
const IFF_UP: u64 = 0x1;

/// Link attributes for one interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkAttrs {
    /// Administratively up (IFF_UP set).
    pub isup: bool,
    /// MTU in bytes; 0 when unreadable.
    pub mtu: i64,
    /// Link speed in Mbps; 0 when the driver does not report one
    /// (virtual interfaces, loopback).
    pub speed_mbps: i64,
}

/// Parse the hex bitmask in `/sys/class/net/<if>/flags` and test IFF_UP.
pub fn parse_flags_isup(raw: &str) -> bool {
    let raw = raw.trim().trim_start_matches("0x");
    u64::from_str_radix(raw, 16)
        .map(|flags| flags & IFF_UP != 0)
        .unwrap_or(false)
}

/// Read link attributes for one interface. Missing attribute files
/// degrade to the zero value rather than failing the category; the
/// interface list itself comes from the caller.
pub fn read_link_attrs(ifname: &str) -> LinkAttrs {
    let dir = Path::new(SYS_CLASS_NET).join(ifname);
    LinkAttrs {
        isup: fs::read_to_string(dir.join("flags"))
            .map(|raw| parse_flags_isup(&raw))
            .unwrap_or(false),
        mtu: read_i64(&dir.join("mtu")),
        // `speed` reads -1 for interfaces without a negotiated link.
        speed_mbps: read_i64(&dir.join("speed")).max(0),
    }
}

fn read_i64(path: &Path) -> i64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(0)
}
