//! XML parsing module.
//!
//! Structural files are parsed with [`parse_structure`], content files
//! with [`parse_page`]. Both are pure functions of the file bytes.

mod alto;
mod mets;
mod options;
mod xml;

pub use alto::parse_page;
pub use mets::parse_structure;
pub use options::{ErrorMode, ParseOptions};
