/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use csv2tmx::errors::{AppError, ConversionError, ErrorKind};

#[test]
fn test_conversionError_fileNotFound_shouldDisplayPath() {
    let error = ConversionError::FileNotFound { path: PathBuf::from("missing/pairs.csv") };
    let display = format!("{}", error);
    assert!(display.contains("Input file not found"));
    assert!(display.contains("missing/pairs.csv"));
    assert_eq!(error.kind(), ErrorKind::FileNotFound);
}

#[test]
fn test_conversionError_malformedRecord_shouldDisplayRecordAndFieldCount() {
    let error = ConversionError::MalformedRecord {
        path: PathBuf::from("pairs.csv"),
        record: 3,
        found: 1,
    };
    let display = format!("{}", error);
    assert!(display.contains("record 3"));
    assert!(display.contains("pairs.csv"));
    assert!(display.contains("found 1"));
    assert_eq!(error.kind(), ErrorKind::MalformedRecord);
}

#[test]
fn test_conversionError_ioWrite_shouldExposeSource() {
    let error = ConversionError::IoWrite {
        path: PathBuf::from("out/pairs.tmx"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied"),
    };
    let display = format!("{}", error);
    assert!(display.contains("out/pairs.tmx"));
    assert!(display.contains("Permission denied"));
    assert!(std::error::Error::source(&error).is_some());
    assert_eq!(error.kind(), ErrorKind::IoWrite);
}

#[test]
fn test_conversionError_directoryCreate_shouldDisplayCorrectly() {
    let error = ConversionError::DirectoryCreate {
        path: PathBuf::from("/readonly/out"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(format!("{}", error).contains("Failed to create output directory"));
    assert_eq!(error.kind(), ErrorKind::DirectoryCreate);
}

#[test]
fn test_conversionError_serialization_shouldDisplayCorrectly() {
    let error = ConversionError::Serialization("invalid element name".to_string());
    assert!(format!("{}", error).contains("Failed to serialize TMX document"));
    assert_eq!(error.kind(), ErrorKind::Serialization);
}

#[test]
fn test_appError_fromConversionError_shouldWrapCorrectly() {
    let error = ConversionError::FileNotFound { path: PathBuf::from("a.csv") };
    let app_error: AppError = error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Conversion error"));
    assert!(display.contains("a.csv"));
}

#[test]
fn test_appError_fromAnyhowWrappingConversionError_shouldKeepConversionVariant() {
    let anyhow_error = anyhow::Error::new(ConversionError::Serialization("boom".to_string()));
    let app_error: AppError = anyhow_error.into();
    assert!(matches!(app_error, AppError::Conversion(ConversionError::Serialization(_))));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let anyhow_error = anyhow::anyhow!("Something went wrong");
    let app_error: AppError = anyhow_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("Something went wrong"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_config_shouldDisplayCorrectly() {
    let error = AppError::Config("bad language tag".to_string());
    assert!(format!("{}", error).contains("Configuration error"));
}

#[test]
fn test_appError_config_shouldKeepContextChain() {
    let error = anyhow::anyhow!("Invalid language tag: 'e'").context("Configuration validation failed");
    let app_error = AppError::config(error);
    let display = format!("{}", app_error);
    assert!(display.contains("Configuration error"));
    assert!(display.contains("Configuration validation failed"));
    assert!(display.contains("Invalid language tag: 'e'"));
    assert_eq!(app_error.conversion_kind(), None);
}

#[test]
fn test_appError_conversionKind_shouldExposePipelineKind() {
    let app_error: AppError = ConversionError::MalformedRecord {
        path: PathBuf::from("short.csv"),
        record: 2,
        found: 1,
    }
    .into();
    assert_eq!(app_error.conversion_kind(), Some(ErrorKind::MalformedRecord));
}
