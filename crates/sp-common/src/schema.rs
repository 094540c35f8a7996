//! Static schema registry for metric categories.
//!
//! Categories defined:
//! - `cpu`: utilization and core counts
//! - `memory`, `swap`: byte totals and usage percent
//! - `disk`: usage for one filesystem path
//! - `net_if`, `net_errors`, `bandwidth`: per-interface (fan-out) categories
//!
//! The registry is fixed at compile time; adding a category is a code
//! change, not configuration. Field order here is the canonical order for
//! encoded lines, CSV columns, and relational columns.

use crate::error::{Error, Result};

/// Declared type of one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer (counters, byte totals, counts).
    Integer,
    /// Floating point (percentages).
    Real,
    /// Boolean flag.
    Bool,
    /// Free-form string (paths, interface names).
    Text,
    /// Nested value serialized as a single JSON token (lists, mappings).
    Json,
}

/// One field in a category schema: name plus declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

const CPU_FIELDS: &[FieldSpec] = &[
    field("percent", FieldKind::Real),
    field("logical_cpus", FieldKind::Integer),
    field("physical_cpus", FieldKind::Integer),
];

const MEMORY_FIELDS: &[FieldSpec] = &[
    field("total", FieldKind::Integer),
    field("available", FieldKind::Integer),
    field("percent", FieldKind::Real),
    field("used", FieldKind::Integer),
];

const SWAP_FIELDS: &[FieldSpec] = &[
    field("total", FieldKind::Integer),
    field("free", FieldKind::Integer),
    field("percent", FieldKind::Real),
    field("used", FieldKind::Integer),
];

const DISK_FIELDS: &[FieldSpec] = &[
    field("path", FieldKind::Text),
    field("total", FieldKind::Integer),
    field("free", FieldKind::Integer),
    field("percent", FieldKind::Real),
];

const NET_IF_FIELDS: &[FieldSpec] = &[
    field("ifname", FieldKind::Text),
    field("isup", FieldKind::Bool),
    field("mtu", FieldKind::Integer),
    field("speed_mbps", FieldKind::Integer),
    field("ips", FieldKind::Json),
];

const NET_ERRORS_FIELDS: &[FieldSpec] = &[
    field("ifname", FieldKind::Text),
    field("errin", FieldKind::Integer),
    field("errout", FieldKind::Integer),
    field("dropin", FieldKind::Integer),
    field("dropout", FieldKind::Integer),
];

const BANDWIDTH_FIELDS: &[FieldSpec] = &[
    field("ifname", FieldKind::Text),
    field("sent_Bps", FieldKind::Integer),
    field("recv_Bps", FieldKind::Integer),
];

/// Metric categories known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Cpu,
    Memory,
    Swap,
    Disk,
    NetIf,
    NetErrors,
    Bandwidth,
}

impl Category {
    /// Every category, in canonical order.
    pub const ALL: [Category; 7] = [
        Category::Cpu,
        Category::Memory,
        Category::Swap,
        Category::Disk,
        Category::NetIf,
        Category::NetErrors,
        Category::Bandwidth,
    ];

    /// The default collection set: everything except bandwidth, which
    /// blocks for a sampling interval and is opt-in.
    pub fn default_set() -> Vec<Category> {
        vec![
            Category::Cpu,
            Category::Memory,
            Category::Swap,
            Category::Disk,
            Category::NetIf,
            Category::NetErrors,
        ]
    }

    /// Get the string name used in record lines and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Memory => "memory",
            Category::Swap => "swap",
            Category::Disk => "disk",
            Category::NetIf => "net_if",
            Category::NetErrors => "net_errors",
            Category::Bandwidth => "bandwidth",
        }
    }

    /// Look up a category by name.
    pub fn lookup(name: &str) -> Result<Category> {
        match name {
            "cpu" => Ok(Category::Cpu),
            "memory" => Ok(Category::Memory),
            "swap" => Ok(Category::Swap),
            "disk" => Ok(Category::Disk),
            "net_if" => Ok(Category::NetIf),
            "net_errors" => Ok(Category::NetErrors),
            "bandwidth" => Ok(Category::Bandwidth),
            _ => Err(Error::UnknownCategory { name: name.into() }),
        }
    }

    /// Ordered field list for this category.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Category::Cpu => CPU_FIELDS,
            Category::Memory => MEMORY_FIELDS,
            Category::Swap => SWAP_FIELDS,
            Category::Disk => DISK_FIELDS,
            Category::NetIf => NET_IF_FIELDS,
            Category::NetErrors => NET_ERRORS_FIELDS,
            Category::Bandwidth => BANDWIDTH_FIELDS,
        }
    }

    /// Whether one collected sample fans out into one record per
    /// sub-entity (network interface).
    pub fn fan_out(&self) -> bool {
        matches!(
            self,
            Category::NetIf | Category::NetErrors | Category::Bandwidth
        )
    }

    /// The entity-key field for fan-out categories (always the first
    /// schema field).
    pub fn entity_field(&self) -> Option<&'static str> {
        if self.fan_out() {
            Some(self.fields()[0].name)
        } else {
            None
        }
    }

    /// Relational table name for this category.
    pub fn table(&self) -> String {
        format!("{}_metrics", self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::lookup(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_round_trips_names() {
        for cat in Category::ALL {
            assert_eq!(Category::lookup(cat.as_str()).unwrap(), cat);
        }
    }

    #[test]
    fn test_lookup_unknown() {
        let err = Category::lookup("cpus").unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_default_set_excludes_bandwidth() {
        let set = Category::default_set();
        assert_eq!(set.len(), 6);
        assert!(!set.contains(&Category::Bandwidth));
        assert_eq!(set[0], Category::Cpu);
    }

    #[test]
    fn test_field_order_is_declared_order() {
        let names: Vec<_> = Category::Disk.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["path", "total", "free", "percent"]);

        let names: Vec<_> = Category::NetIf.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["ifname", "isup", "mtu", "speed_mbps", "ips"]);
    }

    #[test]
    fn test_fan_out_flags() {
        assert!(!Category::Cpu.fan_out());
        assert!(!Category::Disk.fan_out());
        assert!(Category::NetIf.fan_out());
        assert!(Category::NetErrors.fan_out());
        assert!(Category::Bandwidth.fan_out());
    }

    #[test]
    fn test_entity_field() {
        assert_eq!(Category::NetIf.entity_field(), Some("ifname"));
        assert_eq!(Category::Bandwidth.entity_field(), Some("ifname"));
        assert_eq!(Category::Memory.entity_field(), None);
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Category::Cpu.table(), "cpu_metrics");
        assert_eq!(Category::NetErrors.table(), "net_errors_metrics");
    }
}
