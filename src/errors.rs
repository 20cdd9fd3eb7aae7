/*!
 * Error types for the csv2tmx converter.
 *
 * Every failure of the conversion pipeline is reported through a single
 * `ConversionError`, using the thiserror crate for ergonomic error definitions.
 * `AppError` wraps it together with configuration failures for the binary.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Discriminant of a `ConversionError`, for callers that only need the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    IoRead,
    CsvParse,
    MalformedRecord,
    DirectoryCreate,
    IoWrite,
    Serialization,
    XmlParse,
}

/// Errors that can occur while converting a CSV file into a TMX document
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The input CSV file does not exist
    #[error("Input file not found: {}", .path.display())]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The input CSV file exists but could not be opened or read
    #[error("Failed to read input file {}: {source}", .path.display())]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV parser rejected a record (e.g. invalid UTF-8)
    #[error("Failed to parse CSV record {record} in {}: {message}", .path.display())]
    CsvParse {
        path: PathBuf,
        /// 1-based record number
        record: usize,
        message: String,
    },

    /// A record has fewer than the two fields a translation unit needs
    #[error("Malformed record {record} in {}: expected at least 2 fields, found {found}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        /// 1-based record number
        record: usize,
        /// Number of fields actually present
        found: usize,
    },

    /// The parent directory of the output file could not be created
    #[error("Failed to create output directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created or written
    #[error("Failed to write output file {}: {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The element tree could not be rendered as XML
    #[error("Failed to serialize TMX document: {0}")]
    Serialization(String),

    /// A TMX document could not be parsed back into an element tree
    #[error("Failed to parse TMX document: {0}")]
    XmlParse(String),
}

impl ConversionError {
    /// Returns the kind of this error without its context
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::IoRead { .. } => ErrorKind::IoRead,
            Self::CsvParse { .. } => ErrorKind::CsvParse,
            Self::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Self::DirectoryCreate { .. } => ErrorKind::DirectoryCreate,
            Self::IoWrite { .. } => ErrorKind::IoWrite,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::XmlParse(_) => ErrorKind::XmlParse,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the conversion pipeline
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation outside the pipeline
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Wrap a configuration failure, keeping its whole context chain
    pub fn config(error: anyhow::Error) -> Self {
        Self::Config(format!("{:#}", error))
    }

    /// Returns the pipeline error kind, if this error came from the pipeline
    pub fn conversion_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Conversion(error) => Some(error.kind()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<ConversionError>() {
            Ok(conversion) => Self::Conversion(conversion),
            Err(other) => Self::Unknown(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// Result alias for the conversion pipeline
pub type Result<T> = std::result::Result<T, ConversionError>;
