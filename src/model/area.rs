//! Area types: named regions grouping other regions.

use super::{BoundingBox, PageContent, TextBlock};
use serde::{Deserialize, Serialize};

/// Reference to a region stored in the owning page's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum RegionRef {
    /// Index into [`PageContent::textblocks`]
    TextBlock(usize),
    /// Index into [`PageContent::areas`]
    Area(usize),
}

/// A named region grouping text blocks and nested areas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Area {
    /// Identifier, unique within the page
    pub id: String,

    /// Classification tag (e.g. "Article", "Advertisement")
    pub kind: Option<String>,

    /// Position on the page
    pub bbox: Option<BoundingBox>,

    /// Child regions in document order
    pub children: Vec<RegionRef>,
}

impl Area {
    /// Create an empty area.
    pub fn new(id: impl Into<String>, kind: Option<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            bbox: None,
            children: Vec::new(),
        }
    }

    /// Add a child region.
    pub fn add_child(&mut self, child: RegionRef) {
        self.children.push(child);
    }

    /// Text blocks below this area, depth first in child order.
    ///
    /// Each nested area is entered at most once, so a malformed arena
    /// cannot make this loop.
    pub fn textblocks<'a>(&self, page: &'a PageContent) -> Vec<&'a TextBlock> {
        let mut entered = vec![false; page.areas.len()];
        let mut blocks = Vec::new();
        let mut stack: Vec<RegionRef> = self.children.iter().rev().copied().collect();

        while let Some(region) = stack.pop() {
            match region {
                RegionRef::TextBlock(index) => blocks.extend(page.textblocks.get(index)),
                RegionRef::Area(index) => {
                    let Some(area) = page.areas.get(index) else {
                        continue;
                    };
                    if std::mem::replace(&mut entered[index], true) {
                        continue;
                    }
                    stack.extend(area.children.iter().rev().copied());
                }
            }
        }

        blocks
    }

    /// Content of the descendant text blocks, joined by single spaces.
    pub fn content(&self, page: &PageContent) -> String {
        self.textblocks(page)
            .into_iter()
            .map(TextBlock::content)
            .filter(|content| !content.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A non-text region such as an illustration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graphic {
    /// Identifier
    pub id: String,

    /// Element kind or declared type
    pub kind: Option<String>,

    /// Position on the page
    pub bbox: Option<BoundingBox>,
}
