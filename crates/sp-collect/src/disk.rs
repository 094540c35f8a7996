//! Disk usage for one filesystem path.

use crate::{round1, Collector};
use sp_common::{Category, Error, FieldValue, Payload, Result};
use std::path::PathBuf;
use sysinfo::Disks;

pub struct DiskCollector {
    path: PathBuf,
}

impl DiskCollector {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Collector for DiskCollector {
    fn category(&self) -> Category {
        Category::Disk
    }

    fn collect(&mut self) -> Result<Payload> {
        let disks = Disks::new_with_refreshed_list();

        // Longest mount-point prefix wins, so `/var/log` resolves to the
        // `/var` mount when one exists.
        let disk = disks
            .iter()
            .filter(|d| self.path.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .ok_or_else(|| Error::Collection {
                category: Category::Disk.to_string(),
                reason: format!("no mount found for {}", self.path.display()),
            })?;

        let total = disk.total_space();
        let free = disk.available_space();
        let used = total.saturating_sub(free);
        let percent = if total > 0 {
            round1(used as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Ok(Payload::Flat(vec![
            (
                "path".into(),
                FieldValue::Text(self.path.to_string_lossy().into_owned()),
            ),
            ("total".into(), FieldValue::Int(total as i64)),
            ("free".into(), FieldValue::Int(free as i64)),
            ("percent".into(), FieldValue::Real(percent)),
        ]))
    }
}
