/*!
 * Integration tests for the CSV to TMX conversion workflow
 */

use std::fs;
use anyhow::Result;
use csv2tmx::app_config::{ConversionVariant, ShortRecordPolicy};
use csv2tmx::converter::Converter;
use csv2tmx::csv_reader::UTF8_BOM;
use csv2tmx::errors::{ConversionError, ErrorKind};
use csv2tmx::tmx::{Element, TmxDocument, read_tmx_file};
use crate::common;

fn seg_texts(root: &Element) -> Vec<(String, String)> {
    let document = TmxDocument::from_element(root).unwrap();
    document
        .units()
        .iter()
        .map(|unit| (unit.source.segment.clone(), unit.target.segment.clone()))
        .collect()
}

/// Test the two-row Japanese scenario end to end
#[test]
fn test_run_withTwoRows_shouldWriteTwoUnitsInOrder() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "pairs.csv", "Hello,こんにちは\nGoodbye,さようなら")?;
    let output = temp_dir.path().join("target").join("pairs.tmx");

    let stats = Converter::with_config(common::test_config(&input, &output)).run()?;
    assert_eq!(stats.records_read, 2);
    assert_eq!(stats.units_written, 2);
    assert_eq!(stats.records_skipped, 0);
    assert_eq!(stats.output_path, output);

    let root = read_tmx_file(&output)?;
    assert_eq!(
        seg_texts(&root),
        vec![
            ("Hello".to_string(), "こんにちは".to_string()),
            ("Goodbye".to_string(), "さようなら".to_string()),
        ]
    );

    Ok(())
}

/// Test that every unit carries the configured language tags
#[test]
fn test_run_withCustomLanguages_shouldTagEveryVariant() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_csv(temp_dir.path(), "sample.csv")?;
    let output = temp_dir.path().join("sample.tmx");

    let mut config = common::test_config(&input, &output);
    config.admin_language = "en-GB".to_string();
    config.source_language = "de-DE".to_string();
    config.target_language = "fr-FR".to_string();
    Converter::with_config(config).run()?;

    let root = read_tmx_file(&output)?;
    let header = root.find("header").unwrap();
    assert_eq!(header.attribute("adminlang"), Some("en-GB"));
    assert_eq!(header.attribute("srclang"), Some("de-DE"));

    let body = root.find("body").unwrap();
    assert_eq!(body.children().len(), 3);
    for unit in body.children_named("tu") {
        let variants: Vec<&Element> = unit.children_named("tuv").collect();
        assert_eq!(variants[0].attribute("xml:lang"), Some("de-DE"));
        assert_eq!(variants[1].attribute("xml:lang"), Some("fr-FR"));
    }

    Ok(())
}

/// Test that an input without rows produces an empty body
#[test]
fn test_run_withEmptyInput_shouldWriteEmptyBody() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "empty.csv", "")?;
    let output = temp_dir.path().join("empty.tmx");

    let stats = Converter::with_config(common::test_config(&input, &output)).run()?;
    assert_eq!(stats.units_written, 0);

    let xml = fs::read_to_string(&output)?;
    assert!(xml.contains("<body/>"));

    let root = read_tmx_file(&output)?;
    assert!(root.find("body").unwrap().children().is_empty());

    Ok(())
}

/// Test that a quoted comma stays inside its field
#[test]
fn test_run_withQuotedComma_shouldKeepTwoFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "quoted.csv", "\"Hello, world\",こんにちは\n")?;
    let output = temp_dir.path().join("quoted.tmx");

    Converter::with_config(common::test_config(&input, &output)).run()?;

    let root = read_tmx_file(&output)?;
    assert_eq!(seg_texts(&root), vec![("Hello, world".to_string(), "こんにちは".to_string())]);

    Ok(())
}

/// Test that a single-field row aborts without creating output
#[test]
fn test_run_withSingleFieldRow_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "short.csv", "Hello,こんにちは\nOnlyOneField\n")?;
    let output = temp_dir.path().join("out").join("short.tmx");

    let err = Converter::with_config(common::test_config(&input, &output)).run().unwrap_err();
    match err {
        ConversionError::MalformedRecord { record, found, .. } => {
            assert_eq!(record, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
    assert!(!output.exists());

    Ok(())
}

/// Test that a failed run leaves a previous output untouched
#[test]
fn test_run_withSingleFieldRow_shouldNotTouchExistingOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "short.csv", "OnlyOneField\n")?;
    let output = common::create_test_file(temp_dir.path(), "previous.tmx", "previous run")?;

    assert!(Converter::with_config(common::test_config(&input, &output)).run().is_err());
    assert_eq!(fs::read_to_string(&output)?, "previous run");

    Ok(())
}

/// Test that the skip policy drops short rows and keeps the rest
#[test]
fn test_run_withSkipPolicy_shouldLeaveOutShortRows() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "short.csv", "a,1\nOnlyOneField\nb,2\n")?;
    let output = temp_dir.path().join("short.tmx");

    let mut config = common::test_config(&input, &output);
    config.short_record_policy = ShortRecordPolicy::Skip;
    let stats = Converter::with_config(config).run()?;

    assert_eq!(stats.records_read, 3);
    assert_eq!(stats.units_written, 2);
    assert_eq!(stats.records_skipped, 1);

    let root = read_tmx_file(&output)?;
    assert_eq!(
        seg_texts(&root),
        vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
    );

    Ok(())
}

/// Test that a BOM-prefixed file yields a clean first field when stripping
#[test]
fn test_run_withBomAndStripping_shouldProduceCleanFirstSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut content = UTF8_BOM.to_vec();
    content.extend_from_slice("Hello,こんにちは\n".as_bytes());
    let input = common::create_test_file_bytes(temp_dir.path(), "bom.csv", &content)?;
    let output = temp_dir.path().join("bom.tmx");

    Converter::with_config(common::test_config(&input, &output)).run()?;

    let root = read_tmx_file(&output)?;
    let texts = seg_texts(&root);
    assert_eq!(texts[0].0, "Hello");
    assert!(!fs::read_to_string(&output)?.contains('\u{FEFF}'));

    Ok(())
}

/// Test the compact and indented output layouts
#[test]
fn test_run_withEachVariant_shouldSelectIndentation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "pairs.csv", "Hello,こんにちは\n")?;

    let compact_out = temp_dir.path().join("compact.tmx");
    let mut compact = common::test_config(&input, &compact_out);
    compact.apply_variant(ConversionVariant::Baseline);
    Converter::with_config(compact).run()?;

    let pretty_out = temp_dir.path().join("pretty.tmx");
    let mut pretty = common::test_config(&input, &pretty_out);
    pretty.apply_variant(ConversionVariant::Tmx14b);
    Converter::with_config(pretty).run()?;

    let compact_xml = fs::read_to_string(&compact_out)?;
    assert_eq!(compact_xml.lines().count(), 1);
    assert!(compact_xml.contains("<tu><tuv xml:lang=\"en-US\"><seg>Hello</seg></tuv>"));

    let pretty_xml = fs::read_to_string(&pretty_out)?;
    assert!(pretty_xml.contains("\n  <header "));
    assert!(pretty_xml.contains("\n    <tu>\n      <tuv xml:lang=\"en-US\">\n        <seg>Hello</seg>\n      </tuv>"));

    // Same content regardless of layout
    assert_eq!(read_tmx_file(&compact_out)?, read_tmx_file(&pretty_out)?);

    Ok(())
}

/// Test that two runs over the same input produce identical bytes
#[test]
fn test_run_twice_shouldProduceByteIdenticalOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_csv(temp_dir.path(), "sample.csv")?;
    let output = temp_dir.path().join("sample.tmx");
    let converter = Converter::with_config(common::test_config(&input, &output));

    converter.run()?;
    let first = fs::read(&output)?;
    converter.run()?;
    let second = fs::read(&output)?;

    assert_eq!(first, second);

    Ok(())
}

/// Test the missing input error
#[test]
fn test_run_withMissingInput_shouldFailWithFileNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("missing.csv");
    let output = temp_dir.path().join("missing.tmx");

    let err = Converter::with_config(common::test_config(&input, &output)).run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert!(!output.exists());

    Ok(())
}

/// Test the output directory error when a file blocks the directory path
#[test]
fn test_run_withBlockedOutputDirectory_shouldFailWithDirectoryCreate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_sample_csv(temp_dir.path(), "sample.csv")?;
    let blocker = common::create_test_file(temp_dir.path(), "target", "not a directory")?;
    let output = blocker.join("sample.tmx");

    let err = Converter::with_config(common::test_config(&input, &output)).run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryCreate);

    Ok(())
}

/// Test that a control character in a field is reported as a serialization error
#[test]
fn test_run_withControlCharacter_shouldFailWithSerialization() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "ctrl.csv", "bell\u{7},ring\n")?;
    let output = temp_dir.path().join("ctrl.tmx");

    let err = Converter::with_config(common::test_config(&input, &output)).run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
    assert!(!output.exists());

    Ok(())
}

/// Test that a quoted multi-line cell keeps its CRLF line break
#[test]
fn test_run_withCrlfInsideQuotedField_shouldPreserveCarriageReturn() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "crlf.csv", "\"line one\r\nline two\",x\r\n")?;
    let output = temp_dir.path().join("crlf.tmx");

    let mut config = common::test_config(&input, &output);
    config.apply_variant(ConversionVariant::Baseline);
    Converter::with_config(config).run()?;

    let xml = fs::read_to_string(&output)?;
    assert!(xml.contains("<seg>line one&#13;\nline two</seg>"));
    assert!(!xml.contains('\r'));

    let root = read_tmx_file(&output)?;
    assert_eq!(seg_texts(&root), vec![("line one\r\nline two".to_string(), "x".to_string())]);

    Ok(())
}

/// Test that the baseline variant carries the BOM into the first segment
#[test]
fn test_run_withBomAndBaselineVariant_shouldKeepMarkerInFirstSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut content = UTF8_BOM.to_vec();
    content.extend_from_slice("Hello,こんにちは\nBye,さようなら\n".as_bytes());
    let input = common::create_test_file_bytes(temp_dir.path(), "bom.csv", &content)?;
    let output = temp_dir.path().join("bom.tmx");

    let mut config = common::test_config(&input, &output);
    config.apply_variant(ConversionVariant::Baseline);
    Converter::with_config(config).run()?;

    let texts = seg_texts(&read_tmx_file(&output)?);
    assert_eq!(texts[0].0, "\u{FEFF}Hello");
    assert_eq!(texts[1].0, "Bye");

    Ok(())
}
