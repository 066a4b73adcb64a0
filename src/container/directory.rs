//! Filesystem directory container.

use std::path::{Component, Path, PathBuf};

use super::Container;
use crate::detect::ContainerKind;
use crate::error::{Error, Result};

/// Container backed by the regular files of one directory.
#[derive(Debug)]
pub struct DirectoryContainer {
    root: PathBuf,
    names: Vec<String>,
}

impl DirectoryContainer {
    /// Scan a directory. Subdirectories and non-UTF-8 names are skipped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let entries =
            std::fs::read_dir(&root).map_err(|_| Error::ArchiveNotFound(root.clone()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("Skipping non UTF-8 file name {:?}", raw),
            }
        }
        names.sort();

        Ok(Self { root, names })
    }

    /// The directory this container reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        plain.then(|| self.root.join(relative))
    }
}

impl Container for DirectoryContainer {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Directory
    }

    fn names(&self) -> &[String] {
        &self.names
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self
            .entry_path(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))?;

        match std::fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::EntryNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("0001_0002_mets.xml"), b"<mets/>").unwrap();

        let container = DirectoryContainer::open(dir.path()).unwrap();
        assert_eq!(container.names(), ["0001_0002_mets.xml"]);
    }

    #[test]
    fn test_read_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let container = DirectoryContainer::open(dir.path()).unwrap();
        assert!(matches!(
            container.read("0001_0002_0001.xml"),
            Err(Error::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_read_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let container = DirectoryContainer::open(dir.path()).unwrap();
        assert!(matches!(
            container.read("../secret.xml"),
            Err(Error::EntryNotFound(_))
        ));
    }
}
