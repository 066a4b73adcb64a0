//! Archive of documents discovered in a container.
//!
//! An [`Archive`] scans its container once, at construction, and never
//! parses anything by itself. [`Document`] values are created on demand,
//! each with its own caches, so the same document can be materialized
//! independently wherever it is needed.

mod document;
mod manifest;
mod page;

pub use document::{Document, PageItems};
pub use manifest::{Manifest, ManifestEntry};
pub use page::Page;

use std::ops::{Bound, Range, RangeBounds};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::container::{open_container, Container};
use crate::error::{Error, Result};
use crate::matcher::{self, MatchOptions};
use crate::model::BoundingBox;
use crate::parser::ParseOptions;

/// A collection of documents backed by a directory or ZIP container.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    options: ParseOptions,
    container: Arc<dyn Container>,
    manifest: Arc<Manifest>,
}

impl Archive {
    /// Open an archive with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open an archive with custom options.
    ///
    /// Fails with [`Error::EmptyArchive`] if no structural file is found.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let container = open_container(&path)?;
        let manifest = Manifest::from_names(container.names());

        if manifest.is_empty() {
            return Err(Error::EmptyArchive(path));
        }

        log::debug!(
            "Discovered {} documents in {} ({} orphan content files)",
            manifest.len(),
            path.display(),
            manifest.orphans().len()
        );

        Ok(Self {
            path,
            options,
            container,
            manifest: Arc::new(manifest),
        })
    }

    /// Path this archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options passed to every document.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// The manifest built at construction.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The container backing this archive.
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    /// Check if the archive holds no documents. Always false for an opened archive.
    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    /// Metadata codes in index order.
    pub fn codes(&self) -> &[String] {
        self.manifest.codes()
    }

    /// Check whether a metadata code belongs to this archive.
    pub fn contains(&self, code: &str) -> bool {
        self.manifest.get(code).is_some()
    }

    /// Document at a position.
    pub fn get(&self, index: usize) -> Result<Document> {
        let entry = self
            .manifest
            .get_index(index)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        Ok(self.materialize(entry))
    }

    /// Documents in a range, clamped to the archive length.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Documents<'_> {
        Documents {
            archive: self,
            range: clamp_range(range, self.len()),
        }
    }

    /// Iterate over every document in manifest order.
    pub fn iter(&self) -> Documents<'_> {
        self.slice(..)
    }

    /// Document with a metadata code.
    pub fn document(&self, code: &str) -> Result<Document> {
        let entry = self
            .manifest
            .get(code)
            .ok_or_else(|| Error::UnknownDocumentCode(code.to_string()))?;
        Ok(self.materialize(entry))
    }

    /// Serializable handle re-deriving this archive.
    pub fn handle(&self) -> ArchiveHandle {
        ArchiveHandle {
            path: self.path.clone(),
            options: self.options.clone(),
        }
    }

    /// Serializable handle of the document at a position.
    pub fn document_handle(&self, index: usize) -> Result<DocumentHandle> {
        let code = self.codes().get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        Ok(DocumentHandle {
            archive: self.path.clone(),
            code: code.clone(),
            options: self.options.clone(),
        })
    }

    /// Rank every token of every document against `query`.
    ///
    /// Documents are matched independently, in parallel unless the archive
    /// was opened with sequential options. Equal ratios keep document, page,
    /// block, then token order. The limit applies to the merged result.
    pub fn match_token(&self, query: &str, options: &MatchOptions) -> Result<Vec<Match>> {
        let match_one = |code: &String| self.document(code)?.match_token(query, options);

        let per_document: Vec<Result<Vec<Match>>> = if self.options.parallel {
            self.codes().par_iter().map(match_one).collect()
        } else {
            self.codes().iter().map(match_one).collect()
        };

        let mut results = Vec::new();
        for (code, matches) in self.codes().iter().zip(per_document) {
            match matches {
                Ok(matches) => results.extend(matches),
                Err(e) if self.options.is_lenient() => {
                    log::warn!("Skipping document {}: {}", code, e);
                }
                Err(e) => return Err(e),
            }
        }

        matcher::rank(&mut results, |m| m.ratio, options.limit);
        Ok(results)
    }

    fn materialize(&self, entry: &ManifestEntry) -> Document {
        Document::from_entry(
            &self.path,
            entry.clone(),
            Arc::clone(&self.container),
            self.options.clone(),
        )
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = Document;
    type IntoIter = Documents<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy sequence of documents over a range of an archive.
///
/// Each step creates a fresh [`Document`]; nothing is parsed until the
/// document is used.
#[derive(Debug, Clone)]
pub struct Documents<'a> {
    archive: &'a Archive,
    range: Range<usize>,
}

impl Iterator for Documents<'_> {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        let index = self.range.next()?;
        self.archive
            .manifest
            .get_index(index)
            .map(|entry| self.archive.materialize(entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Documents<'_> {
    fn next_back(&mut self) -> Option<Document> {
        let index = self.range.next_back()?;
        self.archive
            .manifest
            .get_index(index)
            .map(|entry| self.archive.materialize(entry))
    }
}

impl ExactSizeIterator for Documents<'_> {}

/// Plain-data reference to an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveHandle {
    /// Archive path
    pub path: PathBuf,

    /// Options to reopen with
    #[serde(default)]
    pub options: ParseOptions,
}

impl ArchiveHandle {
    /// Create a handle with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: ParseOptions::default(),
        }
    }

    /// Open the archive from durable storage.
    pub fn open(&self) -> Result<Archive> {
        Archive::open_with_options(&self.path, self.options.clone())
    }
}

/// Plain-data reference to a document: archive path plus metadata code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// Archive path
    pub archive: PathBuf,

    /// Metadata code
    pub code: String,

    /// Options to reopen with
    #[serde(default)]
    pub options: ParseOptions,
}

impl DocumentHandle {
    /// Create a handle with default options.
    pub fn new(archive: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            code: code.into(),
            options: ParseOptions::default(),
        }
    }

    /// Reopen the archive and materialize the document.
    pub fn open(&self) -> Result<Document> {
        Archive::open_with_options(&self.archive, self.options.clone())?.document(&self.code)
    }

    /// Materialize the document from an already opened archive.
    pub fn open_in(&self, archive: &Archive) -> Result<Document> {
        archive.document(&self.code)
    }
}

/// A matched token with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Metadata code of the document
    pub document_code: String,

    /// Position of the page in the document
    pub page_index: usize,

    /// File code of the page
    pub page_code: String,

    /// Position of the text block in the page
    pub textblock_index: usize,

    /// Identifier of the text block
    pub textblock_id: String,

    /// Token as written
    pub token: String,

    /// Similarity in `[0.0, 1.0]`
    pub ratio: f64,

    /// Position of the token in the text block
    pub position: usize,

    /// Position of the token on the page
    pub bbox: Option<BoundingBox>,
}

/// Resolve a range against a length with clamped half-open semantics.
pub(crate) fn clamp_range<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    start.min(end)..end
}
