/*!
 * Rendering of element trees to XML text with quick-xml.
 *
 * Output is UTF-8, starts with an XML declaration and ends with a newline.
 * Markup characters are escaped with quick-xml. Carriage returns in text, and
 * tabs, line feeds and carriage returns in attribute values, are written as
 * character references, since an XML parser normalizes them when they appear
 * literally. Names and text are checked first so a tree that cannot form
 * well-formed XML is reported as a serialization error instead of being
 * written.
 */

use std::borrow::Cow;
use std::path::Path;

use log::debug;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::errors::{ConversionError, Result};
use crate::file_utils::FileManager;
use crate::tmx::model::{Content, Element};

/// Indentation width used in pretty-printed output
pub const INDENT_SIZE: usize = 2;

/// Serializer for `Element` trees
#[derive(Debug, Clone, Copy, Default)]
pub struct TmxWriter {
    pretty: bool,
}

impl TmxWriter {
    /// `pretty` selects two-space indentation; otherwise output is compact
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Render a tree to XML bytes
    pub fn to_bytes(&self, root: &Element) -> Result<Vec<u8>> {
        validate_element(root)?;

        let mut writer = if self.pretty {
            Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE)
        } else {
            Writer::new(Vec::new())
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialization_error)?;
        write_element(&mut writer, root)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Render a tree to an XML string
    pub fn to_string(&self, root: &Element) -> Result<String> {
        let bytes = self.to_bytes(root)?;
        String::from_utf8(bytes).map_err(serialization_error)
    }

    /// Render a tree and write it to `path`, creating parent directories.
    ///
    /// The tree is rendered completely before the file is touched, and the
    /// file is replaced atomically.
    pub fn write_to_path<P: AsRef<Path>>(&self, root: &Element, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(root)?;
        FileManager::write_atomically(path, &bytes)?;
        debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

fn serialization_error(error: impl std::fmt::Display) -> ConversionError {
    ConversionError::Serialization(error.to_string())
}

// Characters a parser would normalize if written literally
const TEXT_NORMALIZED: &[char] = &['\r'];
const ATTRIBUTE_NORMALIZED: &[char] = &['\t', '\n', '\r'];

fn escape_with_references<'a>(raw: &'a str, normalized: &[char]) -> Cow<'a, str> {
    let escaped = escape(raw);
    if !escaped.contains(normalized) {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        if normalized.contains(&c) {
            out.push_str(&format!("&#{};", c as u32));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        let value = escape_with_references(value, ATTRIBUTE_NORMALIZED);
        // Byte pairs are pushed as-is, the value is already escaped
        start.push_attribute((name.as_bytes(), value.as_bytes()));
    }

    match &element.content {
        Content::Children(children) if children.is_empty() => {
            writer.write_event(Event::Empty(start)).map_err(serialization_error)?;
        }
        Content::Children(children) => {
            writer.write_event(Event::Start(start)).map_err(serialization_error)?;
            for child in children {
                write_element(writer, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(element.name.as_str())))
                .map_err(serialization_error)?;
        }
        Content::Text(text) => {
            // The text event is written even when empty so the indenter keeps
            // the closing tag on the same line.
            writer.write_event(Event::Start(start)).map_err(serialization_error)?;
            writer
                .write_event(Event::Text(BytesText::from_escaped(escape_with_references(
                    text,
                    TEXT_NORMALIZED,
                ))))
                .map_err(serialization_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(element.name.as_str())))
                .map_err(serialization_error)?;
        }
    }

    Ok(())
}

fn validate_element(element: &Element) -> Result<()> {
    if !is_xml_name(&element.name) {
        return Err(ConversionError::Serialization(format!(
            "invalid element name '{}'",
            element.name
        )));
    }

    for (name, value) in &element.attributes {
        if !is_xml_name(name) {
            return Err(ConversionError::Serialization(format!(
                "invalid attribute name '{}' on <{}>",
                name, element.name
            )));
        }
        check_chars(value, &element.name)?;
    }

    match &element.content {
        Content::Children(children) => children.iter().try_for_each(validate_element),
        Content::Text(text) => check_chars(text, &element.name),
    }
}

// XML 1.0 Char production
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn check_chars(text: &str, element: &str) -> Result<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(ConversionError::Serialization(format!(
            "character U+{:04X} in <{}> cannot be represented in XML",
            c as u32, element
        ))),
        None => Ok(()),
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}
