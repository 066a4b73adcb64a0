//! Structural file parser.
//!
//! Reads a METS document with MODS descriptive metadata and recovers the
//! declared page order, the page parts, and the articles linking them.

use std::collections::HashMap;

use super::xml::{Attributes, XmlEvent, XmlReader, XmlResult};
use crate::error::{Error, Result};
use crate::model::{Article, ArticlePart, Metadata, PageDescriptor, PagePart, StructMap};
use crate::naming::FileName;

/// Descriptive fields recovered from the MODS section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Publisher,
    Place,
    Date,
    Identifier,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"publisher" => Some(Field::Publisher),
            b"placeTerm" => Some(Field::Place),
            b"dateIssued" => Some(Field::Date),
            b"identifier" => Some(Field::Identifier),
            _ => None,
        }
    }

    fn slot(self, metadata: &mut Metadata) -> &mut Option<String> {
        match self {
            Field::Title => &mut metadata.title,
            Field::Publisher => &mut metadata.publisher,
            Field::Place => &mut metadata.place,
            Field::Date => &mut metadata.date,
            Field::Identifier => &mut metadata.identifier,
        }
    }
}

/// What the element currently open at each depth means.
#[derive(Debug, Clone)]
enum Scope {
    Other,
    Physical,
    Logical,
    Page(usize),
    Part(usize, usize),
    File(String),
    LinkGroup(usize),
    Field(Field),
}

/// A page as read, before its file code is resolved.
#[derive(Debug, Default)]
struct RawPage {
    descriptor: PageDescriptor,
    order_text: Option<String>,
    file_ids: Vec<String>,
}

#[derive(Debug, Default)]
struct MetsParser {
    stack: Vec<Scope>,
    metadata: Metadata,
    field_text: String,
    has_physical: bool,
    pages: Vec<RawPage>,
    file_locations: HashMap<String, String>,
    logical_articles: Vec<String>,
    link_groups: Vec<Vec<ArticlePart>>,
    links: Vec<(String, ArticlePart)>,
}

/// Parse a structural file.
///
/// `file` names the container entry for diagnostics; `metadata_code` is the
/// owning document's code, used to recognize its content file references.
pub fn parse_structure(data: &[u8], file: &str, metadata_code: &str) -> Result<StructMap> {
    let mut parser = MetsParser::default();
    parser.run(data).map_err(|message| Error::StructuralParse {
        file: file.to_string(),
        message,
    })?;

    if !parser.has_physical {
        return Err(Error::MissingPageOrder(file.to_string()));
    }

    let map = parser.finish(file, metadata_code)?;
    log::debug!(
        "Parsed structural file {}: {} pages, {} articles",
        file,
        map.pages.len(),
        map.articles.len()
    );
    Ok(map)
}

impl MetsParser {
    fn run(&mut self, data: &[u8]) -> XmlResult<()> {
        let mut reader = XmlReader::new(data);
        while let Some(event) = reader.next_event()? {
            match event {
                XmlEvent::Open { name, attrs, empty } => {
                    let scope = self.open(&name, &attrs);
                    if empty {
                        self.close(scope);
                    } else {
                        self.stack.push(scope);
                    }
                }
                XmlEvent::Close => {
                    if let Some(scope) = self.stack.pop() {
                        self.close(scope);
                    }
                }
                XmlEvent::Text(text) => {
                    if matches!(self.stack.last(), Some(Scope::Field(_))) {
                        self.field_text.push_str(&text);
                    }
                }
            }
        }
        Ok(())
    }

    fn open(&mut self, name: &[u8], attrs: &Attributes) -> Scope {
        if let Some(field) = Field::from_local_name(name) {
            self.field_text.clear();
            return Scope::Field(field);
        }

        match name {
            b"structMap" if attrs.is("TYPE", "PHYSICAL") => {
                self.has_physical = true;
                Scope::Physical
            }
            b"structMap" if attrs.is("TYPE", "LOGICAL") => Scope::Logical,
            b"div" => self.open_div(attrs),
            b"fptr" => {
                self.record_file_id(attrs);
                Scope::Other
            }
            b"area" => {
                self.record_file_id(attrs);
                if let Some((page, part)) = self.current_part() {
                    let part = &mut self.pages[page].descriptor.parts[part];
                    part.shape = attrs.text("SHAPE");
                    part.coords = parse_coords(attrs.get("COORDS").unwrap_or_default());
                }
                Scope::Other
            }
            b"file" => Scope::File(attrs.text("ID").unwrap_or_default()),
            b"FLocat" => {
                if let (Some(Scope::File(id)), Some(href)) = (self.stack.last(), attrs.text("href")) {
                    self.file_locations.entry(id.clone()).or_insert(href);
                }
                Scope::Other
            }
            b"smLinkGrp" => {
                self.link_groups.push(Vec::new());
                Scope::LinkGroup(self.link_groups.len() - 1)
            }
            b"smLocatorLink" => {
                if let (Some(Scope::LinkGroup(group)), Some(href)) =
                    (self.stack.last(), attrs.get("href"))
                {
                    let link = ArticlePart {
                        part_id: clean_id(href),
                        label: attrs.text("label"),
                    };
                    self.link_groups[*group].push(link);
                }
                Scope::Other
            }
            b"smLink" => {
                if let (Some(from), Some(to)) = (attrs.get("from"), attrs.get("to")) {
                    let part = ArticlePart {
                        part_id: clean_id(to),
                        label: attrs.text("title"),
                    };
                    self.links.push((clean_id(from), part));
                }
                Scope::Other
            }
            _ => Scope::Other,
        }
    }

    fn open_div(&mut self, attrs: &Attributes) -> Scope {
        match self.stack.iter().rev().find(|s| !matches!(s, Scope::Other)) {
            Some(Scope::Physical) if attrs.is("TYPE", "page") => {
                let mut descriptor = PageDescriptor::new(String::new());
                descriptor.id = attrs.text("ID");
                descriptor.order = attrs.number("ORDER");
                descriptor.label = attrs.text("ORDERLABEL").or_else(|| attrs.text("LABEL"));
                self.pages.push(RawPage {
                    descriptor,
                    order_text: attrs.text("ORDER"),
                    file_ids: Vec::new(),
                });
                Scope::Page(self.pages.len() - 1)
            }
            Some(Scope::Physical) => Scope::Physical,
            Some(Scope::Page(page)) => {
                let page = *page;
                let parts = &mut self.pages[page].descriptor.parts;
                parts.push(PagePart {
                    id: attrs.text("ID").unwrap_or_default(),
                    kind: attrs.text("TYPE"),
                    label: attrs.text("LABEL"),
                    ..Default::default()
                });
                Scope::Part(page, parts.len() - 1)
            }
            Some(Scope::Logical) => {
                if attrs.is("TYPE", "ARTICLE") {
                    if let Some(id) = attrs.get("ID") {
                        self.logical_articles.push(clean_id(id));
                    }
                }
                Scope::Logical
            }
            _ => Scope::Other,
        }
    }

    fn close(&mut self, scope: Scope) {
        if let Scope::Field(field) = scope {
            let slot = field.slot(&mut self.metadata);
            let text = self.field_text.trim();
            if slot.is_none() && !text.is_empty() {
                *slot = Some(text.to_string());
            }
            self.field_text.clear();
        }
    }

    fn current_page(&self) -> Option<usize> {
        self.stack.iter().rev().find_map(|scope| match scope {
            Scope::Page(page) | Scope::Part(page, _) => Some(*page),
            _ => None,
        })
    }

    fn current_part(&self) -> Option<(usize, usize)> {
        self.stack.iter().rev().find_map(|scope| match scope {
            Scope::Part(page, part) => Some((*page, *part)),
            _ => None,
        })
    }

    fn record_file_id(&mut self, attrs: &Attributes) {
        if let (Some(page), Some(id)) = (self.current_page(), attrs.text("FILEID")) {
            let ids = &mut self.pages[page].file_ids;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    fn finish(self, file: &str, metadata_code: &str) -> Result<StructMap> {
        let mut pages = Vec::with_capacity(self.pages.len());
        for raw in self.pages {
            let resolved = raw.file_ids.iter().find_map(|id| {
                let href = self.file_locations.get(id)?;
                match FileName::parse(href)? {
                    FileName::Content {
                        metadata_code: code,
                        file_code,
                    } if code == metadata_code => Some(file_code),
                    _ => None,
                }
            });

            let file_code = match resolved.or_else(|| raw.order_text.as_deref().map(zero_fill)) {
                Some(code) => code,
                None => {
                    return Err(Error::StructuralParse {
                        file: file.to_string(),
                        message: format!(
                            "page {} declares neither a content file nor an order",
                            raw.descriptor.id.as_deref().unwrap_or("?")
                        ),
                    })
                }
            };

            let mut descriptor = raw.descriptor;
            descriptor.file_code = file_code;
            pages.push(descriptor);
        }

        Ok(StructMap {
            metadata: self.metadata,
            pages,
            articles: assemble_articles(self.logical_articles, self.link_groups, self.links),
        })
    }
}

/// Build articles from the logical map and the link section.
///
/// In a locator link group the first link names the article and the
/// remaining links its parts. Articles follow the logical map's order;
/// linked articles it does not declare are appended.
fn assemble_articles(
    logical: Vec<String>,
    groups: Vec<Vec<ArticlePart>>,
    links: Vec<(String, ArticlePart)>,
) -> Vec<Article> {
    let mut articles: Vec<Article> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut article_mut = |id: String, articles: &mut Vec<Article>| -> usize {
        *index.entry(id.clone()).or_insert_with(|| {
            articles.push(Article {
                id,
                parts: Vec::new(),
            });
            articles.len() - 1
        })
    };

    for id in logical {
        article_mut(id, &mut articles);
    }

    for group in groups {
        let mut links = group.into_iter();
        let Some(head) = links.next() else {
            continue;
        };
        let at = article_mut(head.part_id, &mut articles);
        articles[at].parts.extend(links);
    }

    for (from, part) in links {
        let at = article_mut(from, &mut articles);
        articles[at].parts.push(part);
    }

    articles
}

/// Strip everything but ASCII letters and digits, so `#pa0001001` and
/// `pa0001001` name the same part.
fn clean_id(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

fn zero_fill(order: &str) -> String {
    format!("{:0>4}", order)
}

fn parse_coords(raw: &str) -> Vec<f32> {
    raw.split([',', ' '])
        .filter(|v| !v.trim().is_empty())
        .filter_map(|v| v.trim().parse().ok())
        .collect()
}
