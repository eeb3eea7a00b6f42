//! Quick-XML based XMLTV parser
//!
//! Streams through the document and extracts only what the EPG index needs:
//! the `channel`, `start` and `stop` attributes of each `<programme>` and the
//! text of its first `<title>`. Channel definitions and every other child
//! element are skipped.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

use crate::errors::{SourceError, SourceResult};

/// Raw programme node as found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmltvProgramme {
    /// `None` when the attribute is missing or empty
    pub channel: Option<String>,
    pub start: String,
    pub stop: String,
    pub title: Option<String>,
}

impl XmltvProgramme {
    fn from_element(element: &BytesStart) -> Self {
        let mut attrs = parse_attributes(element);
        Self {
            channel: attrs.remove("channel").filter(|c| !c.trim().is_empty()),
            start: attrs.remove("start").unwrap_or_default(),
            stop: attrs.remove("stop").unwrap_or_default(),
            title: None,
        }
    }
}

fn parse_error(message: String) -> SourceError {
    SourceError::parse_error("xmltv", message)
}

/// Streaming iterator over the `<programme>` elements of an XMLTV document.
///
/// Programmes are yielded in document order as soon as their closing tag is
/// read. A syntax error is yielded once and ends the iteration.
pub struct XmltvProgrammes<'a> {
    reader: Reader<&'a [u8]>,
    current: Option<XmltvProgramme>,
    capturing_title: bool,
    title_text: String,
    finished: bool,
}

impl<'a> XmltvProgrammes<'a> {
    pub fn new(content: &'a str) -> Self {
        // Text is not trimmed by the reader: entity references split text
        // events and trimming each piece would eat the spaces around them.
        Self {
            reader: Reader::from_str(content),
            current: None,
            capturing_title: false,
            title_text: String::new(),
            finished: false,
        }
    }

    fn next_programme(&mut self) -> SourceResult<Option<XmltvProgramme>> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"programme" => {
                        self.current = Some(XmltvProgramme::from_element(e));
                    }
                    b"title" => {
                        if self.current.as_ref().is_some_and(|p| p.title.is_none()) {
                            self.capturing_title = true;
                            self.title_text.clear();
                        }
                    }
                    _ => {}
                },

                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"title" if self.capturing_title => {
                        self.capturing_title = false;
                        let title = self.title_text.trim();
                        if let (Some(programme), false) = (self.current.as_mut(), title.is_empty())
                        {
                            programme.title = Some(title.to_string());
                        }
                    }
                    b"programme" => {
                        if let Some(programme) = self.current.take() {
                            return Ok(Some(programme));
                        }
                    }
                    _ => {}
                },

                // Self-closing <programme .../> has no title
                Ok(Event::Empty(ref e)) => {
                    if e.name().as_ref() == b"programme" {
                        return Ok(Some(XmltvProgramme::from_element(e)));
                    }
                }

                Ok(Event::Text(e)) => {
                    if self.capturing_title {
                        let text = std::str::from_utf8(&e)
                            .map_err(|e| parse_error(format!("Invalid UTF-8 in text: {e}")))?;
                        self.title_text.push_str(text);
                    }
                }

                Ok(Event::CData(e)) => {
                    if self.capturing_title {
                        let text = std::str::from_utf8(&e)
                            .map_err(|e| parse_error(format!("Invalid UTF-8 in CDATA: {e}")))?;
                        self.title_text.push_str(text);
                    }
                }

                Ok(Event::GeneralRef(e)) => {
                    if self.capturing_title {
                        let name = std::str::from_utf8(&e)
                            .map_err(|e| parse_error(format!("Invalid UTF-8 in entity: {e}")))?;
                        let reference = format!("&{name};");
                        match unescape(&reference) {
                            Ok(resolved) => self.title_text.push_str(&resolved),
                            // Unknown entities are kept verbatim
                            Err(_) => self.title_text.push_str(&reference),
                        }
                    }
                }

                Ok(Event::Eof) => return Ok(None),

                Err(e) => {
                    return Err(parse_error(format!(
                        "XML parsing error at position {}: {e}",
                        self.reader.buffer_position()
                    )));
                }

                _ => {}
            }
        }
    }
}

impl Iterator for XmltvProgrammes<'_> {
    type Item = SourceResult<XmltvProgramme>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_programme() {
            Ok(Some(programme)) => Some(Ok(programme)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse XML attributes into a HashMap, resolving entity references
fn parse_attributes(element: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();

    for attr in element.attributes().flatten() {
        if let (Ok(key), Ok(value)) = (
            std::str::from_utf8(attr.key.as_ref()),
            std::str::from_utf8(&attr.value),
        ) {
            let value = unescape(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            attrs.insert(key.to_string(), value);
        }
    }
    attrs
}
