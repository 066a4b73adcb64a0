//! Container abstraction layer.
//!
//! Provides a trait-based interface over "a bundle of named byte blobs",
//! isolating the archive model from where the XML files actually live.

mod directory;
mod zip_archive;

pub use directory::DirectoryContainer;
pub use zip_archive::ZipContainer;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::detect::{detect_container_kind, ContainerKind};
use crate::error::Result;

/// Abstract interface for reading named entries.
///
/// Implementations are shared read-only by every document of an archive,
/// so they must be safe to call from several threads.
pub trait Container: Send + Sync + fmt::Debug {
    /// The kind of storage backing this container.
    fn kind(&self) -> ContainerKind;

    /// All entry names, sorted.
    fn names(&self) -> &[String];

    /// Read the full contents of an entry.
    ///
    /// Returns [`crate::Error::EntryNotFound`] if no entry has this name.
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Check whether an entry with this name exists.
    fn contains(&self, name: &str) -> bool {
        self.names()
            .binary_search_by(|candidate| candidate.as_str().cmp(name))
            .is_ok()
    }
}

/// Open the container at `path`, choosing the implementation by inspecting the path.
pub fn open_container<P: AsRef<Path>>(path: P) -> Result<Arc<dyn Container>> {
    let path = path.as_ref();
    let container: Arc<dyn Container> = match detect_container_kind(path)? {
        ContainerKind::Directory => Arc::new(DirectoryContainer::open(path)?),
        ContainerKind::Zip => Arc::new(ZipContainer::open(path)?),
    };
    log::debug!(
        "Opened {} container {} with {} entries",
        container.kind(),
        path.display(),
        container.names().len()
    );
    Ok(container)
}

/// Strip UTF-8 BOM (byte order mark) if present
pub(crate) fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}
