//! Lazily parsed page.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::Match;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::matcher::{self, MatchOptions, Matcher};
use crate::model::{Area, Graphic, PageContent, PageDescriptor, TextBlock};
use crate::parser;

/// One page of a document, parsed on first access to its content.
pub struct Page {
    document_code: String,
    index: usize,
    descriptor: PageDescriptor,
    file: String,
    container: Arc<dyn Container>,
    content: OnceLock<PageContent>,
}

impl Page {
    pub(crate) fn new(
        document_code: &str,
        index: usize,
        descriptor: PageDescriptor,
        file: String,
        container: Arc<dyn Container>,
    ) -> Self {
        Self {
            document_code: document_code.to_string(),
            index,
            descriptor,
            file,
            container,
            content: OnceLock::new(),
        }
    }

    /// Metadata code of the owning document.
    pub fn document_code(&self) -> &str {
        &self.document_code
    }

    /// Position of this page in the document's page sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// File code of the content file.
    pub fn code(&self) -> &str {
        &self.descriptor.file_code
    }

    /// Container entry name of the content file.
    pub fn file_name(&self) -> &str {
        &self.file
    }

    /// The declaration of this page in the structural file.
    pub fn descriptor(&self) -> &PageDescriptor {
        &self.descriptor
    }

    /// Check whether the content file has been parsed.
    pub fn is_loaded(&self) -> bool {
        self.content.get().is_some()
    }

    /// Parsed page content, read and parsed on first call.
    ///
    /// A missing content file yields empty content and a warning. A
    /// malformed one yields [`Error::PageParse`]; failures are not cached.
    pub fn layout(&self) -> Result<&PageContent> {
        if let Some(content) = self.content.get() {
            return Ok(content);
        }
        let parsed = self.load()?;
        Ok(self.content.get_or_init(|| parsed))
    }

    fn load(&self) -> Result<PageContent> {
        match self.container.read(&self.file) {
            Ok(data) => parser::parse_page(&data, &self.file),
            Err(Error::EntryNotFound(_)) => {
                log::warn!(
                    "Content file {} of document {} is missing, treating page {} as empty",
                    self.file,
                    self.document_code,
                    self.descriptor.file_code
                );
                Ok(PageContent::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Text blocks in document order.
    pub fn textblocks(&self) -> Result<&[TextBlock]> {
        Ok(&self.layout()?.textblocks)
    }

    /// Areas in document order.
    pub fn areas(&self) -> Result<&[Area]> {
        Ok(&self.layout()?.areas)
    }

    /// Illustrations and graphical elements.
    pub fn graphics(&self) -> Result<&[Graphic]> {
        Ok(&self.layout()?.graphics)
    }

    /// Page width, when declared.
    pub fn width(&self) -> Result<Option<f32>> {
        Ok(self.layout()?.width)
    }

    /// Page height, when declared.
    pub fn height(&self) -> Result<Option<f32>> {
        Ok(self.layout()?.height)
    }

    /// All words on the page in block order.
    pub fn words(&self) -> Result<Vec<&str>> {
        Ok(self.layout()?.words().collect())
    }

    /// All words on the page joined by single spaces.
    pub fn content(&self) -> Result<String> {
        Ok(self.layout()?.content())
    }

    /// Rank every token on the page against `query`.
    pub fn match_token(&self, query: &str, options: &MatchOptions) -> Result<Vec<Match>> {
        let matcher = Matcher::new(query, options);
        let mut results = Vec::new();
        self.collect_matches(&matcher, &mut results)?;
        matcher::rank(&mut results, |m| m.ratio, options.limit);
        Ok(results)
    }

    /// Append unranked matches in block then token order.
    pub(crate) fn collect_matches(&self, matcher: &Matcher, out: &mut Vec<Match>) -> Result<()> {
        for (block_index, block) in self.layout()?.textblocks.iter().enumerate() {
            for (position, token) in block.tokens.iter().enumerate() {
                if let Some(ratio) = matcher.score(&token.text) {
                    out.push(Match {
                        document_code: self.document_code.clone(),
                        page_index: self.index,
                        page_code: self.descriptor.file_code.clone(),
                        textblock_index: block_index,
                        textblock_id: block.id.clone(),
                        token: token.text.clone(),
                        ratio,
                        position,
                        bbox: token.bbox,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("document_code", &self.document_code)
            .field("index", &self.index)
            .field("code", &self.descriptor.file_code)
            .field("file", &self.file)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
