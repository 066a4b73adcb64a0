//! Filename convention linking structural and content files.
//!
//! An archive holds files named
//!
//! ```text
//! <METADATA_CODE>_mets.xml
//! <METADATA_CODE>_<FILE_CODE>.xml
//! ```
//!
//! where `METADATA_CODE` is two digit groups joined by `_` and `FILE_CODE`
//! is made of digits and underscores. Anything else is ignored.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Marker that distinguishes the structural file of a document.
pub const STRUCTURE_MARKER: &str = "mets";

/// File extension shared by structural and content files.
pub const XML_EXTENSION: &str = "xml";

fn structural_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+_[0-9]+)_mets\.xml$").unwrap())
}

fn content_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+_[0-9]+)_([0-9_]*)\.xml$").unwrap())
}

fn metadata_code_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+_[0-9]+$").unwrap())
}

/// A filename decomposed according to the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum FileName {
    /// `<metadata_code>_mets.xml`
    Structural {
        /// Document metadata code
        metadata_code: String,
    },
    /// `<metadata_code>_<file_code>.xml`
    Content {
        /// Document metadata code
        metadata_code: String,
        /// Page file code
        file_code: String,
    },
}

impl FileName {
    /// Classify a container entry name. Only the basename is inspected.
    pub fn parse(name: &str) -> Option<Self> {
        let base = basename(name);

        if let Some(caps) = structural_pattern().captures(base) {
            return Some(FileName::Structural {
                metadata_code: caps[1].to_string(),
            });
        }

        content_pattern().captures(base).map(|caps| FileName::Content {
            metadata_code: caps[1].to_string(),
            file_code: caps[2].to_string(),
        })
    }

    /// The metadata code of the owning document.
    pub fn metadata_code(&self) -> &str {
        match self {
            FileName::Structural { metadata_code } => metadata_code,
            FileName::Content { metadata_code, .. } => metadata_code,
        }
    }

    /// The file code, or the structure marker for structural files.
    pub fn file_code(&self) -> &str {
        match self {
            FileName::Structural { .. } => STRUCTURE_MARKER,
            FileName::Content { file_code, .. } => file_code,
        }
    }

    /// Check if this is a structural file.
    pub fn is_structural(&self) -> bool {
        matches!(self, FileName::Structural { .. })
    }

    /// Rebuild the filename.
    pub fn file_name(&self) -> String {
        match self {
            FileName::Structural { metadata_code } => structural_file_name(metadata_code),
            FileName::Content {
                metadata_code,
                file_code,
            } => content_file_name(metadata_code, file_code),
        }
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Classify a container entry name.
pub fn classify(name: &str) -> Option<FileName> {
    FileName::parse(name)
}

/// Build the structural filename for a metadata code.
pub fn structural_file_name(metadata_code: &str) -> String {
    format!("{}_{}.{}", metadata_code, STRUCTURE_MARKER, XML_EXTENSION)
}

/// Build the content filename for a metadata code and file code.
pub fn content_file_name(metadata_code: &str, file_code: &str) -> String {
    format!("{}_{}.{}", metadata_code, file_code, XML_EXTENSION)
}

/// Check if a string is a well-formed metadata code.
pub fn is_metadata_code(code: &str) -> bool {
    metadata_code_pattern().is_match(code)
}

/// Check if a string is a well-formed file code.
pub fn is_file_code(code: &str) -> bool {
    code.bytes().all(|b| b.is_ascii_digit() || b == b'_')
}

/// Compare two file codes by their numeric components (`2` before `10`).
pub fn compare_file_codes(a: &str, b: &str) -> Ordering {
    file_code_key(a)
        .cmp(&file_code_key(b))
        .then_with(|| a.cmp(b))
}

fn file_code_key(code: &str) -> Vec<u64> {
    code.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}

/// The last path component of a container entry name.
pub fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Everything before the basename, including the trailing separator.
pub fn parent_prefix(name: &str) -> &str {
    &name[..name.len() - basename(name).len()]
}
