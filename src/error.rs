//! Error types for unalto library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unalto operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while opening archives and parsing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading a ZIP container.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Low-level XML error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive path does not exist or cannot be read.
    #[error("Archive not found: {0}")]
    ArchiveNotFound(PathBuf),

    /// The archive path is a file, but not a supported container format.
    #[error("Unsupported container format: {0}")]
    UnsupportedContainer(PathBuf),

    /// No structural files were discovered in the archive.
    #[error("Archive contains no documents: {0}")]
    EmptyArchive(PathBuf),

    /// The metadata code is not part of the archive manifest.
    #[error("Unknown document code: {0}")]
    UnknownDocumentCode(String),

    /// A named entry is absent from its container.
    #[error("Entry not found in container: {0}")]
    EntryNotFound(String),

    /// The structural file is present but is not well-formed markup.
    #[error("Structural file {file} is malformed: {message}")]
    StructuralParse {
        /// Container entry name
        file: String,
        /// Parser diagnostic
        message: String,
    },

    /// The structural file has no physical structure map to order its pages.
    #[error("Structural file {0} declares no page ordering")]
    MissingPageOrder(String),

    /// The content file is present but is not well-formed markup.
    #[error("Content file {file} is malformed: {message}")]
    PageParse {
        /// Container entry name
        file: String,
        /// Parser diagnostic
        message: String,
    },

    /// A region tree references itself.
    #[error("Malformed region structure: {0}")]
    MalformedStructure(String),

    /// Index is outside the sequence bounds.
    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Sequence length
        len: usize,
    },
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Archive path, document code or referenced file is absent.
    NotFound,
    /// Malformed markup in a file that is present.
    Parse,
    /// Cyclic region tree or missing mandatory ordering information.
    Structure,
    /// Integer index out of bounds.
    Range,
    /// Underlying I/O or container failure.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Zip(_) => ErrorKind::Io,
            Error::ArchiveNotFound(_)
            | Error::UnsupportedContainer(_)
            | Error::EmptyArchive(_)
            | Error::UnknownDocumentCode(_)
            | Error::EntryNotFound(_) => ErrorKind::NotFound,
            Error::Xml(_) | Error::StructuralParse { .. } | Error::PageParse { .. } => {
                ErrorKind::Parse
            }
            Error::MissingPageOrder(_) | Error::MalformedStructure(_) => ErrorKind::Structure,
            Error::IndexOutOfRange { .. } => ErrorKind::Range,
        }
    }

    /// Check whether this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::IndexOutOfRange { index: 10, len: 3 };
        assert_eq!(err.to_string(), "Index 10 is out of range (length 3)");

        let err = Error::MissingPageOrder("0001_0002_mets.xml".to_string());
        assert_eq!(
            err.to_string(),
            "Structural file 0001_0002_mets.xml declares no page ordering"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::UnknownDocumentCode("1_2".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::PageParse {
                file: "a.xml".into(),
                message: "bad".into()
            }
            .kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            Error::MalformedStructure("cycle".into()).kind(),
            ErrorKind::Structure
        );
        assert!(Error::EntryNotFound("x.xml".into()).is_not_found());
    }
}
