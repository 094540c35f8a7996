//! Archive manifest types and serialization.
//!
//! The manifest is the source of truth for a bundle's contents: creation
//! time, source directory name, and the file listing with SHA-256
//! checksums a receiver can verify after transfer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Manifest file name within the bundle.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Archive manifest containing metadata and file checksums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveManifest {
    /// When the bundle was created.
    pub created_at: DateTime<Utc>,

    /// Name of the source directory that was bundled.
    pub source_dir: String,

    /// Files included in the bundle with checksums.
    pub files: Vec<FileEntry>,
}

impl ArchiveManifest {
    /// Create a new manifest for a source directory.
    pub fn new(source_dir: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            source_dir: source_dir.into(),
            files: Vec::new(),
        }
    }

    /// Add a file entry.
    pub fn add_file(&mut self, entry: FileEntry) {
        self.files.push(entry);
    }

    /// Sort entries by path for deterministic output.
    pub fn sort_files(&mut self) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Total size of all files in bytes, before compression.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }

    /// Number of files (not counting the manifest itself).
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Find a file entry by its bundle path.
    pub fn find_file(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One file in the bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path within the bundle (relative, `/`-separated).
    pub path: String,

    /// SHA-256 checksum of the file content, hex-encoded.
    pub sha256: String,

    /// Uncompressed size in bytes.
    pub bytes: u64,
}

impl FileEntry {
    /// Create an entry from raw content.
    pub fn new(path: impl Into<String>, data: &[u8]) -> Self {
        Self {
            path: path.into(),
            sha256: compute_checksum(data),
            bytes: data.len() as u64,
        }
    }
}

/// Hex-encoded SHA-256 of a byte slice.
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable() {
        let sum = compute_checksum(b"hello");
        assert_eq!(
            sum,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_file_entry() {
        let entry = FileEntry::new("cpu_1765916533.csv", b"Timestamp,percent\n");
        assert_eq!(entry.bytes, 18);
        assert_eq!(entry.sha256.len(), 64);
    }

    #[test]
    fn test_sort_and_find() {
        let mut manifest = ArchiveManifest::new("csvs");
        manifest.add_file(FileEntry::new("z.csv", b"z"));
        manifest.add_file(FileEntry::new("a.csv", b"a"));
        manifest.sort_files();

        let paths: Vec<_> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.csv", "z.csv"]);
        assert!(manifest.find_file("a.csv").is_some());
        assert!(manifest.find_file("b.csv").is_none());
        assert_eq!(manifest.total_bytes(), 2);
        assert_eq!(manifest.file_count(), 2);
    }
}
