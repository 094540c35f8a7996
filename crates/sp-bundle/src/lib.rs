//! Shippable archive bundles for syspoll sink output.
//!
//! A bundle is a ZIP archive of one sink output directory, ready for
//! handoff to a reporting platform:
//! - `manifest.json`: creation time, file listing with SHA-256 checksums
//! - the directory's files, stored under their relative paths
//!
//! Entry order is deterministic (sorted by path), so two bundles of the
//! same content list their files identically.
//!
//! # Example
//!
//! ```no_run
//! use sp_bundle::{ArchiveOptions, ArchiveWriter};
//! use std::path::Path;
//!
//! let writer = ArchiveWriter::from_dir(Path::new("csvs")).unwrap();
//! writer
//!     .write(Path::new("csvs.zip"), &ArchiveOptions::default())
//!     .unwrap();
//! ```

pub mod error;
pub mod manifest;
pub mod writer;

pub use error::{ArchiveError, Result};
pub use manifest::{ArchiveManifest, FileEntry, MANIFEST_FILE_NAME};
pub use writer::{ArchiveOptions, ArchiveWriter};
