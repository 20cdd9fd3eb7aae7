/*!
 * # csv2tmx - CSV to TMX 1.4 converter
 *
 * A Rust library for packaging bilingual CSV text pairs as a Translation
 * Memory eXchange (TMX 1.4) document.
 *
 * ## Features
 *
 * - Read two-column CSV files (quoted fields, optional UTF-8 byte-order-mark)
 * - Build a TMX document with one translation unit per CSV record
 * - Write compact or two-space indented XML, atomically
 * - Parse TMX output back into an element tree for verification
 * - IETF language tag validation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `csv_reader`: Lazy CSV record reading
 * - `tmx`: TMX document handling:
 *   - `tmx::model`: Element tree and typed TMX document
 *   - `tmx::writer`: XML serialization
 *   - `tmx::reader`: XML parsing
 * - `converter`: The conversion pipeline
 * - `file_utils`: File system operations
 * - `language_utils`: Language tag utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the Apache License, Version 2.0
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod converter;
pub mod csv_reader;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod tmx;

// Re-export main types for easier usage
pub use app_config::{Config, ConversionVariant, ShortRecordPolicy};
pub use converter::{ConversionStats, Converter};
pub use csv_reader::{CsvPairReader, CsvRecord, TextPair};
pub use errors::{AppError, ConversionError, ErrorKind};
pub use tmx::{Element, TmxDocument, TmxWriter, parse_tmx};
