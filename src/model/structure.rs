//! Document-level types recovered from the structural file.

use super::BoundingBox;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Everything the structural file declares about a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructMap {
    /// Descriptive metadata
    pub metadata: Metadata,

    /// Pages in declared order, duplicates preserved
    pub pages: Vec<PageDescriptor>,

    /// Logical articles spanning page parts
    pub articles: Vec<Article>,
}

impl StructMap {
    /// Find the page declaring a part with this identifier.
    pub fn page_of_part(&self, part_id: &str) -> Option<(usize, &PageDescriptor)> {
        self.pages
            .iter()
            .enumerate()
            .find(|(_, page)| page.parts.iter().any(|part| part.id == part_id))
    }

    /// Find an article by identifier.
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Publication title
    pub title: Option<String>,

    /// Publisher
    pub publisher: Option<String>,

    /// Place of publication
    pub place: Option<String>,

    /// Issue date as written in the source
    pub date: Option<String>,

    /// Source identifier
    pub identifier: Option<String>,
}

impl Metadata {
    /// Issue date, when `date` is an ISO `YYYY-MM-DD` date.
    pub fn issued(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    /// Years mentioned by the date and place fields, sorted and deduplicated.
    pub fn years(&self) -> Vec<i32> {
        let mut years = parse_years(self.date.as_deref().unwrap_or_default());
        years.extend(parse_years(self.place.as_deref().unwrap_or_default()));
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Earliest year mentioned by the date and place fields.
    pub fn year(&self) -> Option<i32> {
        self.years().first().copied()
    }
}

fn standard_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^1[6-9]\d{2}[-/](0[1-9]|1[0-2])[-/](0[1-9]|[12]\d|3[01])").unwrap()
    })
}

fn long_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"1[6-9]\d\d").unwrap())
}

fn short_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d\d").unwrap())
}

/// Extract years 1600-1999 from free-form date text.
///
/// Two-digit numbers following a four-digit year inherit its century, so
/// `"1873-80"` yields `[1873, 1880]`. A text starting with a full
/// `YYYY-MM-DD` date yields only that year.
pub fn parse_years(text: &str) -> Vec<i32> {
    if standard_date().is_match(text) {
        return text[..4].parse().map(|year| vec![year]).unwrap_or_default();
    }

    let matches: Vec<_> = long_year().find_iter(text).collect();
    let mut years = Vec::new();

    for (i, m) in matches.iter().enumerate() {
        let Ok(year) = m.as_str().parse::<i32>() else {
            continue;
        };
        years.push(year);

        let century = year / 100 * 100;
        let rest_end = matches.get(i + 1).map_or(text.len(), |next| next.start());
        for short in short_year().find_iter(&text[m.end()..rest_end]) {
            if let Ok(two) = short.as_str().parse::<i32>() {
                years.push(century + two);
            }
        }
    }

    years.sort_unstable();
    years.dedup();
    years
}

/// One page as declared by the structural file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// File code of the page's content file
    pub file_code: String,

    /// Identifier of the page division
    pub id: Option<String>,

    /// Declared position
    pub order: Option<u32>,

    /// Printed page label
    pub label: Option<String>,

    /// Regions declared on this page
    pub parts: Vec<PagePart>,
}

impl PageDescriptor {
    /// Create a descriptor for a file code.
    pub fn new(file_code: impl Into<String>) -> Self {
        Self {
            file_code: file_code.into(),
            ..Default::default()
        }
    }
}

/// A region of a page declared by the structural file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePart {
    /// Identifier, shared with the content file's block
    pub id: String,

    /// Declared type
    pub kind: Option<String>,

    /// Declared label
    pub label: Option<String>,

    /// Shape of the coordinates (e.g. "RECT")
    pub shape: Option<String>,

    /// Raw coordinates
    pub coords: Vec<f32>,
}

impl PagePart {
    /// Bounding box for rectangular parts.
    pub fn bbox(&self) -> Option<BoundingBox> {
        match self.coords.as_slice() {
            [x0, y0, x1, y1] => Some(BoundingBox::from_corners(*x0, *y0, *x1, *y1)),
            _ => None,
        }
    }
}

/// A logical article made of page parts, possibly on several pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier
    pub id: String,

    /// Parts in reading order
    pub parts: Vec<ArticlePart>,
}

/// A reference from an article to a page part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticlePart {
    /// Page part identifier
    pub part_id: String,

    /// Locator label, typically "pageN areaM"
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_years() {
        assert_eq!(parse_years("1862, [1861]"), vec![1861, 1862]);
        assert_eq!(parse_years("1847 [1846, 47]"), vec![1846, 1847]);
        assert_eq!(parse_years("1873-80"), vec![1873, 1880]);
        assert_eq!(parse_years("1870-09-01"), vec![1870]);
        assert_eq!(parse_years("undated"), Vec::<i32>::new());
        assert_eq!(parse_years(""), Vec::<i32>::new());
    }

    #[test]
    fn test_metadata_years_and_issue_date() {
        let metadata = Metadata {
            date: Some("1870-09-01".into()),
            place: Some("London, 1869".into()),
            ..Default::default()
        };
        assert_eq!(metadata.years(), vec![1869, 1870]);
        assert_eq!(metadata.year(), Some(1869));
        assert_eq!(metadata.issued(), NaiveDate::from_ymd_opt(1870, 9, 1));

        let metadata = Metadata::default();
        assert_eq!(metadata.year(), None);
        assert_eq!(metadata.issued(), None);
    }

    #[test]
    fn test_page_of_part() {
        let mut first = PageDescriptor::new("0001");
        first.parts.push(PagePart {
            id: "pa0001001".into(),
            ..Default::default()
        });
        let mut second = PageDescriptor::new("0002");
        second.parts.push(PagePart {
            id: "pa0002001".into(),
            coords: vec![10.0, 10.0, 60.0, 30.0],
            ..Default::default()
        });
        let map = StructMap {
            pages: vec![first, second],
            ..Default::default()
        };

        let (index, page) = map.page_of_part("pa0002001").unwrap();
        assert_eq!(index, 1);
        assert_eq!(page.file_code, "0002");
        assert_eq!(
            page.parts[0].bbox(),
            Some(BoundingBox::new(10.0, 10.0, 50.0, 20.0))
        );
        assert!(map.page_of_part("pa9").is_none());
    }
}
