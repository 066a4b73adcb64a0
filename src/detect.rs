//! Container format detection.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Kind of container backing an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// A filesystem directory of XML files
    Directory,
    /// A ZIP file of XML entries
    Zip,
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::Directory => f.write_str("directory"),
            ContainerKind::Zip => f.write_str("zip"),
        }
    }
}

/// Local file header signature.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// End of central directory signature (empty archive).
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const MAGIC_LEN: usize = 4;

/// Detect the container kind of a path.
///
/// The decision is made by inspecting the path itself: directories are
/// directory containers, files are recognized by their leading bytes.
///
/// # Returns
/// * `Err(Error::ArchiveNotFound)` if the path does not exist or cannot be read
/// * `Err(Error::UnsupportedContainer)` if the path is a file of another format
pub fn detect_container_kind<P: AsRef<Path>>(path: P) -> Result<ContainerKind> {
    let path = path.as_ref();
    let meta = std::fs::metadata(path).map_err(|_| Error::ArchiveNotFound(path.to_path_buf()))?;

    if meta.is_dir() {
        std::fs::read_dir(path).map_err(|_| Error::ArchiveNotFound(path.to_path_buf()))?;
        return Ok(ContainerKind::Directory);
    }

    let mut file = File::open(path).map_err(|_| Error::ArchiveNotFound(path.to_path_buf()))?;
    let mut header = Vec::with_capacity(MAGIC_LEN);
    file.by_ref()
        .take(MAGIC_LEN as u64)
        .read_to_end(&mut header)?;

    if is_zip_bytes(&header) {
        Ok(ContainerKind::Zip)
    } else {
        Err(Error::UnsupportedContainer(path.to_path_buf()))
    }
}

/// Check if bytes start with a ZIP signature.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC) || data.starts_with(ZIP_EMPTY_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_zip_bytes() {
        assert!(is_zip_bytes(b"PK\x03\x04rest"));
        assert!(is_zip_bytes(b"PK\x05\x06"));
        assert!(!is_zip_bytes(b"<?xml version=\"1.0\"?>"));
        assert!(!is_zip_bytes(b"PK"));
        assert!(!is_zip_bytes(b""));
    }

    #[test]
    fn test_detect_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            detect_container_kind(dir.path()).unwrap(),
            ContainerKind::Directory
        );
    }

    #[test]
    fn test_detect_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = detect_container_kind(dir.path().join("nope"));
        assert!(matches!(result, Err(Error::ArchiveNotFound(_))));
    }

    #[test]
    fn test_detect_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();
        let result = detect_container_kind(&path);
        assert!(matches!(result, Err(Error::UnsupportedContainer(_))));
    }

    #[test]
    fn test_detect_zip_by_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.bin");
        std::fs::write(&path, b"PK\x03\x04whatever").unwrap();
        assert_eq!(detect_container_kind(&path).unwrap(), ContainerKind::Zip);
    }
}
