//! Archive writer: bundle a sink output directory into one ZIP.

use crate::manifest::{ArchiveManifest, FileEntry, MANIFEST_FILE_NAME};
use crate::{ArchiveError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Write-time options.
#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    /// Refuse to replace an existing bundle, and never delete anything.
    pub no_clobber: bool,
    /// Remove the source directory after the bundle write succeeds.
    /// Ignored in no-clobber mode.
    pub delete_source: bool,
}

/// Builder that collects a directory's files and writes one bundle.
pub struct ArchiveWriter {
    source_dir: PathBuf,
    manifest: ArchiveManifest,
    files: Vec<(String, Vec<u8>)>,
}

impl ArchiveWriter {
    /// Collect every regular file under `dir` (recursively), keyed by its
    /// `/`-separated relative path.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ArchiveError::NotADirectory(dir.to_path_buf()));
        }
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        let mut writer = Self {
            source_dir: dir.to_path_buf(),
            manifest: ArchiveManifest::new(name),
            files: Vec::new(),
        };
        writer.collect(dir, dir)?;
        Ok(writer)
    }

    fn collect(&mut self, root: &Path, dir: &Path) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.collect(root, &path)?;
            } else {
                let rel = path
                    .strip_prefix(root)
                    .expect("walked path is under root")
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let data = fs::read(&path)?;
                debug!(path = %rel, bytes = data.len(), "added file to bundle");
                self.manifest.add_file(FileEntry::new(&rel, &data));
                self.files.push((rel, data));
            }
        }
        Ok(())
    }

    /// The manifest as collected so far (for inspection before writing).
    pub fn manifest(&self) -> &ArchiveManifest {
        &self.manifest
    }

    /// Total uncompressed payload size.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|(_, data)| data.len() as u64).sum()
    }

    /// Write the bundle, honoring no-clobber and delete-source rules.
    ///
    /// The source directory is only removed after the ZIP write has
    /// returned success, and never in no-clobber mode.
    pub fn write(mut self, target: &Path, opts: &ArchiveOptions) -> Result<ArchiveManifest> {
        if self.files.is_empty() {
            return Err(ArchiveError::EmptyArchive);
        }
        if opts.no_clobber && target.exists() {
            return Err(ArchiveError::WouldClobber(target.to_path_buf()));
        }

        // Sort for deterministic entry ordering.
        self.manifest.sort_files();
        self.files.sort_by(|a, b| a.0.cmp(&b.0));

        let manifest_json = self.manifest.to_json()?;

        let file = File::create(target)?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        // Manifest first, then content files.
        zip.start_file(MANIFEST_FILE_NAME, options)?;
        zip.write_all(manifest_json.as_bytes())?;
        for (path, data) in &self.files {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(data)?;
        }
        zip.finish()?;

        info!(
            target = %target.display(),
            files = self.files.len(),
            bytes = self.total_bytes(),
            "bundle written"
        );

        if opts.delete_source && !opts.no_clobber {
            match fs::remove_dir_all(&self.source_dir) {
                Ok(()) => info!(dir = %self.source_dir.display(), "source directory removed"),
                // The bundle is already durable; a leftover directory is
                // not worth failing the run over.
                Err(e) => warn!(dir = %self.source_dir.display(), error = %e, "failed to remove source directory"),
            }
        }

        Ok(self.manifest)
    }
}
