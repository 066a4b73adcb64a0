//! Page-level content types.

use super::{Area, Graphic, RegionRef, TextBlock};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The parsed content of one page: an arena of regions plus geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// Page identifier declared by the content file
    pub id: Option<String>,

    /// Page width in pixels
    pub width: Option<f32>,

    /// Page height in pixels
    pub height: Option<f32>,

    /// Page-level OCR confidence
    pub confidence: Option<f32>,

    /// Text blocks in document order
    pub textblocks: Vec<TextBlock>,

    /// Areas in document order (parents before children)
    pub areas: Vec<Area>,

    /// Illustrations and graphical elements
    pub graphics: Vec<Graphic>,
}

impl PageContent {
    /// Create empty page content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the page holds no regions.
    pub fn is_empty(&self) -> bool {
        self.textblocks.is_empty() && self.areas.is_empty() && self.graphics.is_empty()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> Option<(f32, f32)> {
        Some((self.width?, self.height?))
    }

    /// All words on the page in block order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.textblocks.iter().flat_map(TextBlock::words)
    }

    /// All words on the page joined by single spaces.
    pub fn content(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }

    /// Number of tokens on the page.
    pub fn word_count(&self) -> usize {
        self.textblocks.iter().map(|tb| tb.tokens.len()).sum()
    }

    /// Find a text block by identifier.
    pub fn textblock(&self, id: &str) -> Option<&TextBlock> {
        self.textblocks.iter().find(|tb| tb.id == id)
    }

    /// Find an area by identifier.
    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.id == id)
    }

    /// Areas that are not the child of another area.
    pub fn root_areas(&self) -> impl Iterator<Item = &Area> + '_ {
        let mut nested = vec![false; self.areas.len()];
        for area in &self.areas {
            for child in &area.children {
                if let RegionRef::Area(index) = *child {
                    if let Some(flag) = nested.get_mut(index) {
                        *flag = true;
                    }
                }
            }
        }
        self.areas
            .iter()
            .zip(nested)
            .filter(|(_, nested)| !nested)
            .map(|(area, _)| area)
    }

    /// Check that every region reference resolves and that no area contains itself.
    pub fn validate_regions(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Visit {
            New,
            Active,
            Done,
        }

        let mut state = vec![Visit::New; self.areas.len()];

        for root in 0..self.areas.len() {
            if state[root] != Visit::New {
                continue;
            }
            state[root] = Visit::Active;
            // (area index, next child position)
            let mut stack = vec![(root, 0usize)];

            while let Some(&(current, cursor)) = stack.last() {
                let Some(child) = self.areas[current].children.get(cursor).copied() else {
                    state[current] = Visit::Done;
                    stack.pop();
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                match child {
                    RegionRef::TextBlock(index) => {
                        if index >= self.textblocks.len() {
                            return Err(Error::MalformedStructure(format!(
                                "area {} references missing text block #{}",
                                self.areas[current].id, index
                            )));
                        }
                    }
                    RegionRef::Area(index) => match state.get(index).copied() {
                        None => {
                            return Err(Error::MalformedStructure(format!(
                                "area {} references missing area #{}",
                                self.areas[current].id, index
                            )));
                        }
                        Some(Visit::Active) => {
                            return Err(Error::MalformedStructure(format!(
                                "area {} contains itself through area {}",
                                self.areas[index].id, self.areas[current].id
                            )));
                        }
                        Some(Visit::New) => {
                            state[index] = Visit::Active;
                            stack.push((index, 0));
                        }
                        Some(Visit::Done) => {}
                    },
                }
            }
        }

        Ok(())
    }
}
