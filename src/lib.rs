//! # unalto
//!
//! Lazy document model and fuzzy token search over METS/ALTO archives.
//!
//! An archive is a directory or ZIP file holding, for each document, one
//! METS structural file and one ALTO content file per page, linked only by
//! their names:
//!
//! ```text
//! 0001_0002_mets.xml    structural file of document 0001_0002
//! 0001_0002_0001.xml    content file of its page 0001
//! 0001_0002_0002.xml    content file of its page 0002
//! ```
//!
//! Opening an archive only scans entry names. Structural files are parsed
//! when a document's pages or metadata are first needed, and content files
//! when a page's text is first needed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unalto::{Archive, MatchOptions};
//!
//! fn main() -> unalto::Result<()> {
//!     let archive = Archive::open("newspapers.zip")?;
//!
//!     for document in &archive {
//!         println!("{}: {:?}", document.code(), document.metadata()?.title);
//!     }
//!
//!     let options = MatchOptions::new().with_threshold(0.8).with_limit(10);
//!     for hit in archive.match_token("fire", &options)? {
//!         println!("{} page {} {} ({:.2})", hit.document_code, hit.page_code, hit.token, hit.ratio);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Naming-convention discovery**: no index file is needed
//! - **Lazy parsing**: nothing is read before it is touched, then cached
//! - **Directory and ZIP containers**: detected from the path's contents
//! - **Fuzzy matching**: normalized Levenshtein ratio with stable ranking
//! - **Parallel processing**: Uses Rayon for whole-archive matching
//! - **Re-derivable handles**: `(path, code)` values that reopen a document anywhere

pub mod archive;
pub mod container;
pub mod detect;
pub mod error;
pub mod matcher;
pub mod model;
pub mod naming;
pub mod parser;

// Re-export commonly used types
pub use archive::{
    Archive, ArchiveHandle, Document, DocumentHandle, Documents, Manifest, ManifestEntry, Match,
    Page, PageItems,
};
pub use container::{open_container, Container, DirectoryContainer, ZipContainer};
pub use detect::{detect_container_kind, ContainerKind};
pub use error::{Error, ErrorKind, Result};
pub use matcher::{match_tokens, MatchOptions, Matcher, Normalization, TokenMatch};
pub use model::{
    Area, Article, ArticlePart, BoundingBox, Graphic, Metadata, PageContent, PageDescriptor,
    PagePart, RegionRef, StructMap, TextBlock, Token,
};
pub use naming::FileName;
pub use parser::{ErrorMode, ParseOptions};

use std::path::Path;

/// Open an archive with default options.
///
/// # Example
///
/// ```no_run
/// let archive = unalto::open("newspapers/").unwrap();
/// println!("Documents: {}", archive.len());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<Archive> {
    Archive::open(path)
}

/// Open an archive with custom options.
///
/// # Example
///
/// ```no_run
/// use unalto::{open_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().sequential();
/// let archive = open_with_options("newspapers.zip", options).unwrap();
/// ```
pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Archive> {
    Archive::open_with_options(path, options)
}

/// Parse a single content file from bytes.
///
/// # Example
///
/// ```
/// let page = unalto::parse_page_bytes(br#"<alto><Layout><Page WIDTH="10" HEIGHT="20"/></Layout></alto>"#).unwrap();
/// assert_eq!(page.dimensions(), Some((10.0, 20.0)));
/// ```
pub fn parse_page_bytes(data: &[u8]) -> Result<PageContent> {
    parser::parse_page(data, "<memory>")
}

/// Parse a single structural file from bytes.
///
/// `metadata_code` identifies the document, so that its content file
/// references can be recognized.
pub fn parse_structure_bytes(data: &[u8], metadata_code: &str) -> Result<StructMap> {
    parser::parse_structure(data, "<memory>", metadata_code)
}
