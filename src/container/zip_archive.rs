//! ZIP container.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use zip::ZipArchive;

use super::Container;
use crate::detect::ContainerKind;
use crate::error::{Error, Result};

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

type Reader = ZipArchive<BufReader<File>>;

/// Container backed by a ZIP file.
///
/// Entry names are indexed once. Reads check a reader out of a small pool
/// and decompress without holding the pool lock, so concurrent readers
/// each end up with their own file handle.
pub struct ZipContainer {
    path: PathBuf,
    names: Vec<String>,
    readers: Mutex<Vec<Reader>>,
}

impl ZipContainer {
    /// Open a ZIP file and index its entry names.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|_| Error::ArchiveNotFound(path.clone()))?;
        let archive = ZipArchive::new(BufReader::new(file))?;

        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        names.sort();

        Ok(Self {
            path,
            names,
            readers: Mutex::new(vec![archive]),
        })
    }

    /// Path of the underlying ZIP file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn checkout(&self) -> Result<Reader> {
        if let Some(reader) = self.pool().pop() {
            return Ok(reader);
        }
        log::debug!("Opening additional reader for {}", self.path.display());
        let file = File::open(&self.path)?;
        Ok(ZipArchive::new(BufReader::new(file))?)
    }

    // A panic while reading drops that reader; the pool itself stays valid.
    fn pool(&self) -> MutexGuard<'_, Vec<Reader>> {
        self.readers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ZipContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipContainer")
            .field("path", &self.path)
            .field("entries", &self.names.len())
            .finish()
    }
}

impl Container for ZipContainer {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Zip
    }

    fn names(&self) -> &[String] {
        &self.names
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let mut reader = self.checkout()?;
        let contents = read_entry(&mut reader, name);
        self.pool().push(reader);
        contents
    }
}

fn read_entry(archive: &mut Reader, name: &str) -> Result<Vec<u8>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(Error::EntryNotFound(name.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut contents = Vec::with_capacity(initial_capacity(entry.size()));
    entry.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Buffer size to reserve for an entry; header sizes are not trusted.
fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOC) as usize
}
