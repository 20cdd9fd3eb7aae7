/*!
 * TMX 1.4 document handling.
 *
 * - `model`: owned element tree and the typed TMX document built from CSV rows
 * - `writer`: rendering of element trees to XML text (compact or indented)
 * - `reader`: parsing of TMX text back into an element tree
 */

// Re-export main types for easier usage
pub use self::model::{Content, Element, Header, TmxDocument, TranslationUnit, TranslationUnitVariant};
pub use self::reader::{parse_tmx, read_tmx_file};
pub use self::writer::TmxWriter;

// Submodules
pub mod model;
pub mod reader;
pub mod writer;
