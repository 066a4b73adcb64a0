//! Lazily parsed document.

use std::fmt;
use std::ops::RangeBounds;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::{clamp_range, DocumentHandle, Match, Page};
use crate::archive::manifest::ManifestEntry;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::matcher::{self, MatchOptions, Matcher};
use crate::model::{Area, Article, Metadata, PageContent, PageDescriptor, StructMap, TextBlock};
use crate::parser::{self, ParseOptions};

/// One logical document, identified by its metadata code.
///
/// Nothing is read at construction. The structural file is parsed on the
/// first structural access, and each page on first access to its content.
/// Both results are cached for the lifetime of this value.
pub struct Document {
    archive: PathBuf,
    entry: ManifestEntry,
    container: Arc<dyn Container>,
    options: ParseOptions,
    structure: OnceLock<StructMap>,
    pages: OnceLock<Vec<Page>>,
}

impl Document {
    pub(crate) fn from_entry(
        archive: &Path,
        entry: ManifestEntry,
        container: Arc<dyn Container>,
        options: ParseOptions,
    ) -> Self {
        Self {
            archive: archive.to_path_buf(),
            entry,
            container,
            options,
            structure: OnceLock::new(),
            pages: OnceLock::new(),
        }
    }

    /// Metadata code.
    pub fn code(&self) -> &str {
        &self.entry.code
    }

    /// Path of the owning archive.
    pub fn archive_path(&self) -> &Path {
        &self.archive
    }

    /// Container entry name of the structural file.
    pub fn structural_file(&self) -> &str {
        &self.entry.structural_file
    }

    /// The manifest entry this document was created from.
    pub fn manifest_entry(&self) -> &ManifestEntry {
        &self.entry
    }

    /// Serializable handle re-deriving this document.
    pub fn handle(&self) -> DocumentHandle {
        DocumentHandle {
            archive: self.archive.clone(),
            code: self.entry.code.clone(),
            options: self.options.clone(),
        }
    }

    /// Parsed structural file.
    ///
    /// Fails with [`Error::StructuralParse`] or [`Error::MissingPageOrder`];
    /// failures are not cached.
    pub fn structure(&self) -> Result<&StructMap> {
        if let Some(structure) = self.structure.get() {
            return Ok(structure);
        }
        let data = self.container.read(&self.entry.structural_file)?;
        let parsed =
            parser::parse_structure(&data, &self.entry.structural_file, &self.entry.code)?;
        Ok(self.structure.get_or_init(|| parsed))
    }

    /// Descriptive metadata.
    pub fn metadata(&self) -> Result<&Metadata> {
        Ok(&self.structure()?.metadata)
    }

    /// Page declarations in declared order.
    pub fn page_descriptors(&self) -> Result<&[PageDescriptor]> {
        Ok(&self.structure()?.pages)
    }

    /// Logical articles.
    pub fn articles(&self) -> Result<&[Article]> {
        Ok(&self.structure()?.articles)
    }

    /// Earliest year recovered from the date and place fields.
    pub fn year(&self) -> Result<Option<i32>> {
        Ok(self.metadata()?.year())
    }

    /// Every year recovered from the date and place fields.
    pub fn years(&self) -> Result<Vec<i32>> {
        Ok(self.metadata()?.years())
    }

    /// Pages in the structural file's declared order, duplicates included.
    pub fn pages(&self) -> Result<&[Page]> {
        if let Some(pages) = self.pages.get() {
            return Ok(pages);
        }
        let pages = self
            .structure()?
            .pages
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                Page::new(
                    &self.entry.code,
                    index,
                    descriptor.clone(),
                    self.entry.content_file(&descriptor.file_code),
                    Arc::clone(&self.container),
                )
            })
            .collect();
        Ok(self.pages.get_or_init(|| pages))
    }

    /// Number of pages.
    pub fn page_count(&self) -> Result<usize> {
        Ok(self.pages()?.len())
    }

    /// Page at a position.
    pub fn page(&self, index: usize) -> Result<&Page> {
        let pages = self.pages()?;
        pages.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: pages.len(),
        })
    }

    /// Pages in a range, clamped to the page count.
    pub fn page_slice<R: RangeBounds<usize>>(&self, range: R) -> Result<&[Page]> {
        let pages = self.pages()?;
        Ok(&pages[clamp_range(range, pages.len())])
    }

    /// First page with this file code.
    pub fn page_by_code(&self, code: &str) -> Result<Option<&Page>> {
        Ok(self.pages()?.iter().find(|page| page.code() == code))
    }

    /// Iterate over pages.
    pub fn iter(&self) -> Result<std::slice::Iter<'_, Page>> {
        Ok(self.pages()?.iter())
    }

    /// Every text block of every page, in page order.
    pub fn textblocks(&self) -> PageItems<'_, TextBlock> {
        PageItems::new(self, textblocks_of)
    }

    /// Every area of every page, in page order.
    pub fn areas(&self) -> PageItems<'_, Area> {
        PageItems::new(self, areas_of)
    }

    /// Every word of every page, in page order.
    pub fn words(&self) -> Result<Vec<&str>> {
        self.textblocks()
            .map(|item| item.map(|(_, block)| block.words()))
            .try_fold(Vec::new(), |mut words, block| {
                words.extend(block?);
                Ok(words)
            })
    }

    /// Page contents joined by newlines.
    pub fn content(&self) -> Result<String> {
        let mut pages = Vec::new();
        for page in self.pages()? {
            match page.content() {
                Ok(content) => pages.push(content),
                Err(e) if self.options.is_lenient() => self.skip(page, &e),
                Err(e) => return Err(e),
            }
        }
        Ok(pages.join("\n"))
    }

    /// Text blocks making up an article, resolved across pages.
    ///
    /// Parts without a matching text block are left out.
    pub fn article_textblocks(&self, article_id: &str) -> Result<Vec<(&Page, &TextBlock)>> {
        let structure = self.structure()?;
        let Some(article) = structure.article(article_id) else {
            return Ok(Vec::new());
        };

        let pages = self.pages()?;
        let mut blocks = Vec::new();
        for part in &article.parts {
            let Some((index, _)) = structure.page_of_part(&part.part_id) else {
                continue;
            };
            let page = &pages[index];
            match page.layout() {
                Ok(content) => blocks.extend(content.textblock(&part.part_id).map(|tb| (page, tb))),
                Err(e) if self.options.is_lenient() => self.skip(page, &e),
                Err(e) => return Err(e),
            }
        }
        Ok(blocks)
    }

    /// Rank every token of the document against `query`.
    ///
    /// Equal ratios keep page, then block, then token order.
    pub fn match_token(&self, query: &str, options: &MatchOptions) -> Result<Vec<Match>> {
        let matcher = Matcher::new(query, options);
        let mut results = Vec::new();
        for page in self.pages()? {
            match page.collect_matches(&matcher, &mut results) {
                Ok(()) => {}
                Err(e) if self.options.is_lenient() => self.skip(page, &e),
                Err(e) => return Err(e),
            }
        }
        matcher::rank(&mut results, |m| m.ratio, options.limit);
        Ok(results)
    }

    fn skip(&self, page: &Page, error: &Error) {
        log::warn!(
            "Skipping page {} of document {}: {}",
            page.code(),
            self.entry.code,
            error
        );
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("archive", &self.archive)
            .field("code", &self.entry.code)
            .field("parsed", &self.structure.get().is_some())
            .finish()
    }
}

fn textblocks_of(content: &PageContent) -> &[TextBlock] {
    &content.textblocks
}

fn areas_of(content: &PageContent) -> &[Area] {
    &content.areas
}

/// Items of every page of a document, paired with their page.
///
/// Under [`crate::ErrorMode::Strict`] a page that fails to parse yields one
/// error item and iteration continues with the next page. Under
/// [`crate::ErrorMode::Lenient`] it is skipped with a warning.
pub struct PageItems<'a, T> {
    document: &'a Document,
    pages: std::slice::Iter<'a, Page>,
    current: Option<(&'a Page, std::slice::Iter<'a, T>)>,
    pending: Option<Error>,
    select: fn(&PageContent) -> &[T],
}

impl<'a, T> PageItems<'a, T> {
    fn new(document: &'a Document, select: fn(&PageContent) -> &[T]) -> Self {
        let (pages, pending) = match document.pages() {
            Ok(pages) => (pages.iter(), None),
            Err(e) if document.options.is_lenient() => {
                log::warn!("Skipping document {}: {}", document.code(), e);
                ([].iter(), None)
            }
            Err(e) => ([].iter(), Some(e)),
        };
        Self {
            document,
            pages,
            current: None,
            pending,
            select,
        }
    }
}

impl<'a, T> Iterator for PageItems<'a, T> {
    type Item = Result<(&'a Page, &'a T)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }

        loop {
            if let Some((page, items)) = &mut self.current {
                if let Some(item) = items.next() {
                    return Some(Ok((*page, item)));
                }
                self.current = None;
            }

            let page = self.pages.next()?;
            match page.layout() {
                Ok(content) => self.current = Some((page, (self.select)(content).iter())),
                Err(e) if self.document.options.is_lenient() => self.document.skip(page, &e),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
