//! Content file parser.
//!
//! Reads one ALTO page into a [`PageContent`] arena. `TextBlock` elements
//! become text blocks, `ComposedBlock` elements become areas whose children
//! are the blocks nested directly inside them, and `Illustration` and
//! `GraphicalElement` become graphics.

use std::collections::HashSet;

use super::xml::{Attributes, XmlEvent, XmlReader, XmlResult};
use crate::error::{Error, Result};
use crate::model::{Area, BoundingBox, Graphic, PageContent, RegionRef, TextBlock, Token};

#[derive(Debug, Clone, Copy)]
enum Scope {
    Other,
    TextBlock(usize),
    Area(usize),
}

#[derive(Debug, Default)]
struct AltoParser {
    stack: Vec<Scope>,
    page: PageContent,
    page_seen: bool,
}

/// Parse a content file. `file` names the container entry for diagnostics.
///
/// Fails with [`Error::PageParse`] when the file is not well-formed and
/// with [`Error::MalformedStructure`] when two regions share an identifier
/// or an area contains itself.
pub fn parse_page(data: &[u8], file: &str) -> Result<PageContent> {
    let mut parser = AltoParser::default();
    parser.run(data).map_err(|message| Error::PageParse {
        file: file.to_string(),
        message,
    })?;

    let page = parser.page;
    check_unique_ids(&page, file)?;
    page.validate_regions().map_err(|e| match e {
        Error::MalformedStructure(message) => {
            Error::MalformedStructure(format!("{}: {}", file, message))
        }
        other => other,
    })?;

    log::debug!(
        "Parsed content file {}: {} text blocks, {} areas",
        file,
        page.textblocks.len(),
        page.areas.len()
    );
    Ok(page)
}

impl AltoParser {
    fn run(&mut self, data: &[u8]) -> XmlResult<()> {
        let mut reader = XmlReader::new(data);
        while let Some(event) = reader.next_event()? {
            match event {
                XmlEvent::Open { name, attrs, empty } => {
                    let scope = self.open(&name, &attrs);
                    if !empty {
                        self.stack.push(scope);
                    }
                }
                XmlEvent::Close => {
                    self.stack.pop();
                }
                XmlEvent::Text(_) => {}
            }
        }
        Ok(())
    }

    fn open(&mut self, name: &[u8], attrs: &Attributes) -> Scope {
        match name {
            b"Page" if !self.page_seen => {
                self.page_seen = true;
                self.page.id = attrs.text("ID");
                self.page.width = attrs.number("WIDTH");
                self.page.height = attrs.number("HEIGHT");
                self.page.confidence = attrs.number("PC");
                Scope::Other
            }
            b"TextBlock" => {
                let index = self.page.textblocks.len();
                let id = attrs
                    .text("ID")
                    .unwrap_or_else(|| format!("TextBlock:{}", index));
                self.register_child(RegionRef::TextBlock(index));

                let mut block = TextBlock::new(id);
                block.bbox = bbox(attrs);
                self.page.textblocks.push(block);
                Scope::TextBlock(index)
            }
            b"ComposedBlock" => {
                let index = self.page.areas.len();
                let id = attrs
                    .text("ID")
                    .unwrap_or_else(|| format!("ComposedBlock:{}", index));
                self.register_child(RegionRef::Area(index));

                let mut area = Area::new(id, attrs.text("TYPE"));
                area.bbox = bbox(attrs);
                self.page.areas.push(area);
                Scope::Area(index)
            }
            b"String" => {
                if let Some(index) = self.current_textblock() {
                    let mut token = Token::new(attrs.get("CONTENT").unwrap_or_default());
                    token.bbox = bbox(attrs);
                    token.confidence = attrs.number("WC");
                    token.character_confidence = attrs.text("CC");
                    self.page.textblocks[index].add_token(token);
                }
                Scope::Other
            }
            b"Illustration" | b"GraphicalElement" => {
                let element = String::from_utf8_lossy(name).into_owned();
                let id = attrs
                    .text("ID")
                    .unwrap_or_else(|| format!("{}:{}", element, self.page.graphics.len()));
                self.page.graphics.push(Graphic {
                    id,
                    kind: attrs.text("TYPE").or(Some(element)),
                    bbox: bbox(attrs),
                });
                Scope::Other
            }
            _ => Scope::Other,
        }
    }

    fn current_textblock(&self) -> Option<usize> {
        self.stack.iter().rev().find_map(|scope| match scope {
            Scope::TextBlock(index) => Some(*index),
            _ => None,
        })
    }

    /// Record a region as a child of the innermost enclosing area, if the
    /// area is its direct region parent.
    fn register_child(&mut self, child: RegionRef) {
        let parent = self
            .stack
            .iter()
            .rev()
            .find(|scope| !matches!(scope, Scope::Other));
        if let Some(Scope::Area(area)) = parent {
            self.page.areas[*area].add_child(child);
        }
    }
}

/// Region identifiers are unique per kind within a page.
fn check_unique_ids(page: &PageContent, file: &str) -> Result<()> {
    let textblocks = page.textblocks.iter().map(|tb| tb.id.as_str());
    if let Some(id) = first_duplicate(textblocks) {
        return Err(Error::MalformedStructure(format!(
            "{}: duplicate text block id {}",
            file, id
        )));
    }
    if let Some(id) = first_duplicate(page.areas.iter().map(|a| a.id.as_str())) {
        return Err(Error::MalformedStructure(format!(
            "{}: duplicate area id {}",
            file, id
        )));
    }
    Ok(())
}

fn first_duplicate<'a>(mut ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.find(|id| !seen.insert(*id))
}

fn bbox(attrs: &Attributes) -> Option<BoundingBox> {
    Some(BoundingBox::new(
        attrs.number("HPOS")?,
        attrs.number("VPOS")?,
        attrs.number("WIDTH")?,
        attrs.number("HEIGHT")?,
    ))
}
