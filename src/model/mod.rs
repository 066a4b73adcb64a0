//! Document model types.
//!
//! Plain data produced by the parsers: the structural map of a document and
//! the region arena of each page. Nothing here performs I/O.

mod area;
mod page;
mod structure;
mod textblock;

pub use area::{Area, Graphic, RegionRef};
pub use page::PageContent;
pub use structure::{
    parse_years, Article, ArticlePart, Metadata, PageDescriptor, PagePart, StructMap,
};
pub use textblock::{BoundingBox, TextBlock, Token};
