//! Source-file metadata carried by every compilation unit.
//!
//! Metadata travels through transformations unchanged unless a recipe edits
//! it explicitly.

use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Byte order mark for UTF-8 encoded sources.
pub const UTF8_BOM: char = '\u{feff}';

/// Content checksum of the original source bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    /// Hash algorithm name.
    pub algorithm: String,
    /// Hex-encoded digest.
    pub value: String,
}

impl Checksum {
    /// Compute the SHA-256 checksum of `data`.
    pub fn sha256(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        Checksum {
            algorithm: "SHA-256".to_string(),
            value: hex::encode(result),
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

/// File system attributes observed when the source was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    pub created: Option<SystemTime>,
    pub last_modified: Option<SystemTime>,
    pub last_accessed: Option<SystemTime>,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    pub size: u64,
}

impl FileAttributes {
    /// Capture attributes from file metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        FileAttributes {
            created: metadata.created().ok(),
            last_modified: metadata.modified().ok(),
            last_accessed: metadata.accessed().ok(),
            readable: true,
            writable: !metadata.permissions().readonly(),
            executable: is_executable(metadata),
            size: metadata.len(),
        }
    }
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    false
}

/// Where a tree came from and how its text was encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Character set name.
    pub charset: String,
    /// Whether the original text started with a byte order mark.
    pub charset_bom_marked: bool,
    pub checksum: Option<Checksum>,
    pub file_attributes: Option<FileAttributes>,
}

impl SourceMetadata {
    /// Metadata for an in-memory UTF-8 source.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SourceMetadata {
            path: path.into(),
            charset: "UTF-8".to_string(),
            charset_bom_marked: false,
            checksum: None,
            file_attributes: None,
        }
    }

    /// Metadata for `text`, with checksum and byte order mark detection.
    pub fn for_text(path: impl Into<PathBuf>, text: &str) -> Self {
        SourceMetadata {
            charset_bom_marked: text.starts_with(UTF8_BOM),
            checksum: Some(Checksum::sha256(text.as_bytes())),
            ..SourceMetadata::new(path)
        }
    }

    pub fn with_file_attributes(mut self, attributes: FileAttributes) -> Self {
        self.file_attributes = Some(attributes);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
