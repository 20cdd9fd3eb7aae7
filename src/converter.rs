use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::app_config::{Config, ShortRecordPolicy};
use crate::csv_reader::CsvPairReader;
use crate::errors::{ConversionError, Result};
use crate::tmx::{TmxDocument, TmxWriter};

// @module: CSV to TMX conversion pipeline

/// Counters reported after a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Records consumed from the CSV input
    pub records_read: usize,
    /// Translation units appended to the document body
    pub units_written: usize,
    /// Short records left out under `ShortRecordPolicy::Skip`
    pub records_skipped: usize,
    /// Destination of the TMX output
    pub output_path: PathBuf,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

/// Runs the document initializer, CSV reader, tree builder and serializer in sequence
pub struct Converter {
    // @field: Converter configuration
    config: Config,
}

impl Converter {
    // @method: Create a converter with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create the empty document skeleton for the configured languages
    pub fn create_document(&self) -> TmxDocument {
        TmxDocument::new(
            self.config.admin_language.clone(),
            self.config.source_language.clone(),
            self.config.target_language.clone(),
        )
    }

    /// Append one translation unit per CSV record, in input order
    pub fn append_records<R: Read>(
        &self,
        document: &mut TmxDocument,
        reader: CsvPairReader<R>,
        stats: &mut ConversionStats,
    ) -> Result<()> {
        let source = reader.source().to_path_buf();

        for record in reader {
            let record = record?;
            stats.records_read += 1;
            trace!("Record {}: {:?}", record.index, record.fields);

            let (index, found) = (record.index, record.fields.len());
            match record.into_pair() {
                Some(pair) => {
                    document.push_pair(pair);
                    stats.units_written += 1;
                }
                None if self.config.short_record_policy == ShortRecordPolicy::Skip => {
                    warn!(
                        "Skipping record {} in {:?}: expected at least 2 fields, found {}",
                        index, source, found
                    );
                    stats.records_skipped += 1;
                }
                None => {
                    return Err(ConversionError::MalformedRecord {
                        path: source,
                        record: index,
                        found,
                    });
                }
            }
        }

        Ok(())
    }

    /// Read the configured CSV file into a complete document
    pub fn build_document(&self) -> Result<(TmxDocument, ConversionStats)> {
        let mut document = self.create_document();
        let mut stats = ConversionStats {
            output_path: self.config.output_path.clone(),
            ..ConversionStats::default()
        };

        info!("csv2tmx: read csv file.");
        let reader = CsvPairReader::open(&self.config.input_path, self.config.strip_byte_order_mark)?;
        self.append_records(&mut document, reader, &mut stats)?;
        debug!(
            "Read {} record(s), built {} translation unit(s)",
            stats.records_read, stats.units_written
        );

        Ok((document, stats))
    }

    /// Serialize a finished document to the configured output path
    pub fn write_document(&self, document: &TmxDocument) -> Result<()> {
        self.write_document_to(document, &self.config.output_path)
    }

    /// Serialize a finished document to an explicit path
    pub fn write_document_to<P: AsRef<Path>>(&self, document: &TmxDocument, path: P) -> Result<()> {
        info!("csv2tmx: write xml file.");
        TmxWriter::new(self.config.pretty_print).write_to_path(&document.to_element(), path)
    }

    /// Run the full conversion. Nothing is written unless every record was
    /// read and the whole document rendered successfully.
    pub fn run(&self) -> Result<ConversionStats> {
        let start_time = Instant::now();
        info!("csv2tmx: begin: {}", self.config.input_path.display());

        let (document, mut stats) = self.build_document()?;
        self.write_document(&document)?;

        stats.elapsed = start_time.elapsed();
        info!("csv2tmx: end: {}", self.config.output_path.display());

        Ok(stats)
    }
}
