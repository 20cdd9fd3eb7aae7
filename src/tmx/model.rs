/*!
 * In-memory TMX 1.4 document model.
 *
 * Two layers live here: a generic owned element tree (`Element`) that the
 * writer renders and the reader produces, and the typed `TmxDocument` built
 * from CSV records. The typed layer always lowers to the same tree shape:
 *
 * ```text
 * tmx(version) -> header(attributes), body -> tu* -> tuv(xml:lang) x2 -> seg(text)
 * ```
 */

use crate::csv_reader::TextPair;
use crate::errors::{ConversionError, Result};

/// Value of the `version` attribute on the root element
pub const TMX_VERSION: &str = "1.4";
/// `creationtool` header attribute
pub const CREATION_TOOL: &str = "igapyon csv2tmx";
/// `creationtoolversion` header attribute
pub const CREATION_TOOL_VERSION: &str = "1.0";
/// `o-tmf` header attribute
pub const ORIGINAL_FORMAT: &str = "XLIFF";
/// `datatype` header attribute
pub const DATA_TYPE: &str = "unknown";
/// `segtype` header attribute
pub const SEGMENT_TYPE: &str = "block";

/// Body of an element: either child elements or a single text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Children(Vec<Element>),
    Text(String),
}

/// Owned XML element; attribute order is preserved as inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: Content,
}

impl Element {
    /// Create an element with no attributes and no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: Content::Children(Vec::new()),
        }
    }

    /// Create a text-only element
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: Content::Text(text.into()),
        }
    }

    /// Builder-style attribute setter
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Append a child element. A text payload, if any, is replaced.
    pub fn push_child(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::Text(_) => self.content = Content::Children(vec![child]),
        }
    }

    /// Builder-style child append
    pub fn child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            Content::Text(_) => &[],
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    /// First direct child with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children().iter().find(|child| child.name == name)
    }

    /// All direct children with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().iter().filter(move |child| child.name == name)
    }
}

/// TMX header metadata, fixed at document creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub creation_tool: String,
    pub creation_tool_version: String,
    pub original_format: String,
    pub data_type: String,
    pub segment_type: String,
    pub admin_language: String,
    pub source_language: String,
}

impl Header {
    pub fn new(admin_language: impl Into<String>, source_language: impl Into<String>) -> Self {
        Self {
            creation_tool: CREATION_TOOL.to_string(),
            creation_tool_version: CREATION_TOOL_VERSION.to_string(),
            original_format: ORIGINAL_FORMAT.to_string(),
            data_type: DATA_TYPE.to_string(),
            segment_type: SEGMENT_TYPE.to_string(),
            admin_language: admin_language.into(),
            source_language: source_language.into(),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new("header")
            .attr("creationtool", &self.creation_tool)
            .attr("creationtoolversion", &self.creation_tool_version)
            .attr("o-tmf", &self.original_format)
            .attr("datatype", &self.data_type)
            .attr("segtype", &self.segment_type)
            .attr("adminlang", &self.admin_language)
            .attr("srclang", &self.source_language)
    }

    fn from_element(element: &Element) -> Result<Self> {
        let required = |name: &str| {
            element
                .attribute(name)
                .map(str::to_string)
                .ok_or_else(|| ConversionError::XmlParse(format!("header is missing '{}'", name)))
        };

        Ok(Self {
            creation_tool: required("creationtool")?,
            creation_tool_version: required("creationtoolversion")?,
            original_format: required("o-tmf")?,
            data_type: required("datatype")?,
            segment_type: required("segtype")?,
            admin_language: required("adminlang")?,
            source_language: required("srclang")?,
        })
    }
}

/// One language's text within a translation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnitVariant {
    /// IETF language tag written as `xml:lang`
    pub language: String,
    /// Segment text, stored verbatim
    pub segment: String,
}

impl TranslationUnitVariant {
    pub fn new(language: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            segment: segment.into(),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new("tuv")
            .attr("xml:lang", &self.language)
            .child(Element::with_text("seg", &self.segment))
    }

    fn from_element(element: &Element) -> Result<Self> {
        let language = element
            .attribute("xml:lang")
            .ok_or_else(|| ConversionError::XmlParse("tuv is missing 'xml:lang'".to_string()))?;
        let segment = element
            .find("seg")
            .and_then(Element::text)
            .ok_or_else(|| ConversionError::XmlParse("tuv has no text seg".to_string()))?;

        Ok(Self::new(language, segment))
    }
}

/// A source/target pair; the source variant is always written first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub source: TranslationUnitVariant,
    pub target: TranslationUnitVariant,
}

impl TranslationUnit {
    pub fn to_element(&self) -> Element {
        Element::new("tu")
            .child(self.source.to_element())
            .child(self.target.to_element())
    }

    fn from_element(element: &Element) -> Result<Self> {
        let variants: Vec<&Element> = element.children_named("tuv").collect();
        if variants.len() != 2 {
            return Err(ConversionError::XmlParse(format!(
                "tu must hold exactly 2 tuv elements, found {}",
                variants.len()
            )));
        }

        Ok(Self {
            source: TranslationUnitVariant::from_element(variants[0])?,
            target: TranslationUnitVariant::from_element(variants[1])?,
        })
    }
}

/// Complete TMX document: one header and an ordered body of units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmxDocument {
    header: Header,
    target_language: String,
    units: Vec<TranslationUnit>,
}

impl TmxDocument {
    /// Create an empty document for a language pair
    pub fn new(
        admin_language: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            header: Header::new(admin_language, source_language),
            target_language: target_language.into(),
            units: Vec::new(),
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn source_language(&self) -> &str {
        &self.header.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn units(&self) -> &[TranslationUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Append a unit built from a CSV text pair, tagged with the document's languages
    pub fn push_pair(&mut self, pair: TextPair) {
        let unit = TranslationUnit {
            source: TranslationUnitVariant::new(self.header.source_language.clone(), pair.source),
            target: TranslationUnitVariant::new(self.target_language.clone(), pair.target),
        };
        self.units.push(unit);
    }

    /// Lower the document to its XML element tree
    pub fn to_element(&self) -> Element {
        let mut body = Element::new("body");
        for unit in &self.units {
            body.push_child(unit.to_element());
        }

        Element::new("tmx")
            .attr("version", TMX_VERSION)
            .child(self.header.to_element())
            .child(body)
    }

    /// Rebuild a typed document from a parsed `tmx` tree.
    ///
    /// The target language is taken from the first unit; an empty body falls
    /// back to the source language.
    pub fn from_element(root: &Element) -> Result<Self> {
        if root.name != "tmx" {
            return Err(ConversionError::XmlParse(format!(
                "expected root element 'tmx', found '{}'",
                root.name
            )));
        }

        let header = root
            .find("header")
            .ok_or_else(|| ConversionError::XmlParse("missing header".to_string()))
            .and_then(Header::from_element)?;
        let body = root
            .find("body")
            .ok_or_else(|| ConversionError::XmlParse("missing body".to_string()))?;

        let units = body
            .children_named("tu")
            .map(TranslationUnit::from_element)
            .collect::<Result<Vec<_>>>()?;

        let target_language = units
            .first()
            .map(|unit| unit.target.language.clone())
            .unwrap_or_else(|| header.source_language.clone());

        Ok(Self {
            header,
            target_language,
            units,
        })
    }
}
