//! Thin pull layer over `quick-xml` shared by the METS and ALTO parsers.
//!
//! Element and attribute names are reported by local name, so namespace
//! prefixes never matter. The reader rejects documents that quick-xml
//! would otherwise accept silently: no root element, character data
//! outside the root, and elements left open at end of input.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::container::strip_bom;

/// Diagnostic message for a document that is not well-formed.
pub(crate) type XmlResult<T> = std::result::Result<T, String>;

/// A structural event with owned local names.
#[derive(Debug)]
pub(crate) enum XmlEvent {
    /// Opening tag; `empty` is set for self-closing elements.
    Open {
        name: Vec<u8>,
        attrs: Attributes,
        empty: bool,
    },
    /// Closing tag of a non-empty element.
    Close,
    /// Character data, entities resolved.
    Text(String),
}

/// Attributes of one element keyed by local name.
#[derive(Debug, Default)]
pub(crate) struct Attributes(Vec<(Vec<u8>, String)>);

impl Attributes {
    fn from_start(start: &BytesStart<'_>) -> XmlResult<Self> {
        let mut values = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let value = unescape(decode(&attr.value)?)?;
            values.push((local_name(attr.key.as_ref()).to_vec(), value));
        }
        Ok(Self(values))
    }

    /// Raw attribute value.
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name.as_bytes())
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value with surrounding whitespace removed, if not blank.
    pub(crate) fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Attribute parsed as a number.
    pub(crate) fn number<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name)?.trim().parse().ok()
    }

    /// Check an attribute against a value, ignoring ASCII case.
    pub(crate) fn is(&self, name: &str, expected: &str) -> bool {
        self.get(name)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
    }
}

/// Well-formedness checking pull reader.
pub(crate) struct XmlReader<'a> {
    reader: Reader<&'a [u8]>,
    depth: usize,
    root_seen: bool,
}

impl<'a> XmlReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        let reader = Reader::from_reader(strip_bom(data));
        Self {
            reader,
            depth: 0,
            root_seen: false,
        }
    }

    /// Next structural event, `None` at the end of a complete document.
    pub(crate) fn next_event(&mut self) -> XmlResult<Option<XmlEvent>> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| format!("{} at byte {}", e, self.reader.error_position()))?;

            match event {
                Event::Start(start) => {
                    self.open_element()?;
                    self.depth += 1;
                    return Ok(Some(XmlEvent::Open {
                        name: local_name(start.name().as_ref()).to_vec(),
                        attrs: Attributes::from_start(&start)?,
                        empty: false,
                    }));
                }
                Event::Empty(start) => {
                    self.open_element()?;
                    return Ok(Some(XmlEvent::Open {
                        name: local_name(start.name().as_ref()).to_vec(),
                        attrs: Attributes::from_start(&start)?,
                        empty: true,
                    }));
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(Some(XmlEvent::Close));
                }
                Event::Text(text) => {
                    let raw = decode(text.as_ref())?;
                    if self.depth == 0 {
                        if raw.trim().is_empty() {
                            continue;
                        }
                        return Err(self.position_error("character data outside the root element"));
                    }
                    return Ok(Some(XmlEvent::Text(unescape(raw)?)));
                }
                Event::CData(data) => {
                    if self.depth > 0 {
                        let raw = decode(data.as_ref())?;
                        return Ok(Some(XmlEvent::Text(raw.to_string())));
                    }
                }
                Event::GeneralRef(reference) => {
                    if self.depth == 0 {
                        return Err(self.position_error("entity reference outside the root element"));
                    }
                    let name = decode(reference.as_ref())?;
                    return Ok(Some(XmlEvent::Text(resolve_entity(name)?)));
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(format!(
                            "unexpected end of document with {} unclosed element(s)",
                            self.depth
                        ));
                    }
                    if !self.root_seen {
                        return Err("document has no root element".to_string());
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn open_element(&mut self) -> XmlResult<()> {
        if self.depth == 0 {
            if self.root_seen {
                return Err(self.position_error("more than one root element"));
            }
            self.root_seen = true;
        }
        Ok(())
    }

    fn position_error(&self, message: &str) -> String {
        format!("{} at byte {}", message, self.reader.buffer_position())
    }
}

fn decode(bytes: &[u8]) -> XmlResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))
}

fn unescape(raw: &str) -> XmlResult<String> {
    quick_xml::escape::unescape(raw)
        .map(Cow::into_owned)
        .map_err(|e| e.to_string())
}

/// Resolve a predefined or character entity; any other name is an error.
fn resolve_entity(name: &str) -> XmlResult<String> {
    unescape(&format!("&{};", name))
}

/// Extract local name from potentially namespaced XML name
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}
