/*!
 * Parsing of TMX text back into an owned element tree.
 *
 * Whitespace between child elements (indentation) is discarded, while the
 * text of leaf elements is kept as written, after entity unescaping. Line
 * endings are normalized the way XML 1.0 requires: literal `\r\n` and `\r`
 * become `\n`, and literal tabs and line breaks in attribute values become
 * spaces. Character references such as `&#13;` are not normalized.
 * An element with both child elements and non-blank text is rejected, since
 * TMX documents produced by this crate never contain mixed content.
 */

use std::borrow::Cow;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::errors::{ConversionError, Result};
use crate::tmx::model::{Content, Element};

struct OpenElement {
    element: Element,
    children: Vec<Element>,
    text: String,
}

impl OpenElement {
    fn close(self) -> Result<Element> {
        let OpenElement {
            mut element,
            children,
            text,
        } = self;

        element.content = if children.is_empty() {
            Content::Text(text)
        } else if text.trim().is_empty() {
            Content::Children(children)
        } else {
            return Err(ConversionError::XmlParse(format!(
                "mixed content in <{}>",
                element.name
            )));
        };

        Ok(element)
    }
}

fn xml_error(error: impl std::fmt::Display) -> ConversionError {
    ConversionError::XmlParse(error.to_string())
}

fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

// Unescape raw text content after line-ending normalization
fn text_value(raw: &[u8]) -> Result<String> {
    let raw = std::str::from_utf8(raw).map_err(xml_error)?;
    let normalized = normalize_line_endings(raw);
    Ok(unescape(&normalized).map_err(xml_error)?.into_owned())
}

// Unescape a raw attribute value after attribute-value normalization
fn attribute_value(raw: &[u8]) -> Result<String> {
    let raw = std::str::from_utf8(raw).map_err(xml_error)?;
    let normalized = normalize_line_endings(raw).replace(['\t', '\n'], " ");
    Ok(unescape(&normalized).map_err(xml_error)?.into_owned())
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(xml_error)?
        .to_string();

    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = std::str::from_utf8(attribute.key.as_ref()).map_err(xml_error)?;
        let value = attribute_value(&attribute.value)?;
        element.attributes.push((key.to_string(), value));
    }

    Ok(element)
}

/// Parse a TMX (or any XML) document into its root element
pub fn parse_tmx(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let finished = match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                stack.push(OpenElement {
                    element: open_element(&start)?,
                    children: Vec::new(),
                    text: String::new(),
                });
                None
            }
            Event::Empty(start) => Some(open_element(&start)?),
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| ConversionError::XmlParse("unexpected end tag".to_string()))?;
                Some(open.close()?)
            }
            Event::Text(text) => {
                let text = text_value(&text)?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(ConversionError::XmlParse(
                            "text outside of the root element".to_string(),
                        ));
                    }
                }
                None
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data).map_err(xml_error)?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&normalize_line_endings(text));
                }
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = finished {
            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None if root.is_none() => root = Some(element),
                None => {
                    return Err(ConversionError::XmlParse(
                        "more than one root element".to_string(),
                    ));
                }
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConversionError::XmlParse(format!(
            "unclosed element <{}>",
            open.element.name
        )));
    }

    root.ok_or_else(|| ConversionError::XmlParse("document has no root element".to_string()))
}

/// Read and parse a TMX file
pub fn read_tmx_file<P: AsRef<Path>>(path: P) -> Result<Element> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConversionError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConversionError::IoRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_tmx(&xml)
}
