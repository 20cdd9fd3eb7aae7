/*!
 * Streaming reader for two-column bilingual CSV files.
 *
 * Records are parsed with the csv crate using the plain comma-separated
 * dialect: `"` quoting with `""` escapes, no header row, and records of any
 * length. Records are produced lazily, in file order, and can only be
 * iterated once.
 */

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind as IoErrorKind, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter};
use log::trace;

use crate::errors::{ConversionError, Result};

/// UTF-8 encoding of U+FEFF
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Source and target text taken from the first two fields of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPair {
    pub source: String,
    pub target: String,
}

impl TextPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// One parsed CSV record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    /// 1-based position of the record in the file
    pub index: usize,
    /// Field values, unmodified
    pub fields: Vec<String>,
}

impl CsvRecord {
    /// Whether the record carries both a source and a target field
    pub fn is_complete(&self) -> bool {
        self.fields.len() >= 2
    }

    /// Take the first two fields; extra columns are ignored
    pub fn into_pair(self) -> Option<TextPair> {
        if !self.is_complete() {
            return None;
        }
        let mut fields = self.fields.into_iter();
        let source = fields.next()?;
        let target = fields.next()?;
        Some(TextPair { source, target })
    }
}

/// Lazy iterator over the records of a CSV source
pub struct CsvPairReader<R: Read> {
    source: PathBuf,
    records: StringRecordsIntoIter<BufReader<R>>,
    next_index: usize,
    // Byte-order-mark to put back in front of the first field
    retained_bom: bool,
}

impl CsvPairReader<File> {
    /// Open a CSV file for reading.
    ///
    /// With `strip_bom` set, a leading UTF-8 byte-order-mark is dropped.
    /// Without it the mark stays part of the first field of the first record,
    /// as U+FEFF.
    pub fn open<P: AsRef<Path>>(path: P, strip_bom: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == IoErrorKind::NotFound {
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

        Self::from_reader(file, strip_bom, path)
    }
}

impl<R: Read> CsvPairReader<R> {
    /// Wrap any byte source; `source` is only used to label errors
    pub fn from_reader(reader: R, strip_bom: bool, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let mut buffered = BufReader::new(reader);

        // The csv parser drops a leading mark on its own, so it is taken off
        // here and restored on the first record when it should be kept
        let starts_with_bom = buffered
            .fill_buf()
            .map_err(|e| ConversionError::IoRead {
                path: source.clone(),
                source: e,
            })?
            .starts_with(UTF8_BOM);
        if starts_with_bom {
            buffered.consume(UTF8_BOM.len());
            if strip_bom {
                trace!("Skipping byte-order-mark in {:?}", source);
            } else {
                trace!("Keeping byte-order-mark in {:?}", source);
            }
        }

        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(buffered)
            .into_records();

        Ok(Self {
            source,
            records,
            next_index: 1,
            retained_bom: starts_with_bom && !strip_bom,
        })
    }

    /// Path (or label) of the data being read
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Convert the records into text pairs, failing on the first record
    /// with fewer than two fields
    pub fn pairs(self) -> impl Iterator<Item = Result<TextPair>> {
        let source = self.source.clone();
        self.map(move |record| {
            let record = record?;
            let (index, found) = (record.index, record.fields.len());
            record.into_pair().ok_or_else(|| ConversionError::MalformedRecord {
                path: source.clone(),
                record: index,
                found,
            })
        })
    }

    fn map_csv_error(&self, error: csv::Error) -> ConversionError {
        let message = error.to_string();
        match error.into_kind() {
            csv::ErrorKind::Io(source) => ConversionError::IoRead {
                path: self.source.clone(),
                source,
            },
            _ => ConversionError::CsvParse {
                path: self.source.clone(),
                record: self.next_index,
                message,
            },
        }
    }
}

impl<R: Read> Iterator for CsvPairReader<R> {
    type Item = Result<CsvRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next()? {
            Ok(record) => {
                let index = self.next_index;
                self.next_index += 1;
                let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
                if std::mem::take(&mut self.retained_bom) {
                    match fields.first_mut() {
                        Some(first) => first.insert(0, '\u{FEFF}'),
                        None => fields.push("\u{FEFF}".to_string()),
                    }
                }
                Some(Ok(CsvRecord { index, fields }))
            }
            Err(e) => {
                let error = self.map_csv_error(e);
                self.next_index += 1;
                Some(Err(error))
            }
        }
    }
}
