use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::language_utils;

/// Application configuration module
/// This module handles the converter configuration including loading,
/// validating and saving configuration settings.
/// Represents the converter configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// CSV file to read
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// TMX file to write
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Administrative language of the TMX header (`adminlang`)
    #[serde(default = "default_admin_language")]
    pub admin_language: String,

    /// Language of the first CSV column (`srclang`, first `tuv`)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language of the second CSV column (second `tuv`)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Drop a leading UTF-8 byte-order-mark from the input
    #[serde(default = "default_true")]
    pub strip_byte_order_mark: bool,

    /// Indent the output XML by two spaces per level
    #[serde(default = "default_true")]
    pub pretty_print: bool,

    /// What to do with records that have fewer than two fields
    #[serde(default)]
    pub short_record_policy: ShortRecordPolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Handling of CSV records with fewer than two fields
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShortRecordPolicy {
    // @policy: Abort the whole conversion
    #[default]
    Fail,
    // @policy: Log a warning and leave the record out
    Skip,
}

/// Preset combinations of the two conversion toggles
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionVariant {
    // @variant: Input read as-is, compact output
    #[serde(rename = "baseline")]
    Baseline,
    // @variant: Byte-order-mark tolerant input, indented output
    #[default]
    #[serde(rename = "14b")]
    Tmx14b,
}

impl ConversionVariant {
    // @returns: Variant identifier as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Tmx14b => "14b",
        }
    }
}

impl std::fmt::Display for ConversionVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConversionVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "14b" | "tmx14b" => Ok(Self::Tmx14b),
            _ => Err(anyhow!("Invalid conversion variant: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("src/main/resources/sample.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("target/sample.tmx")
}

fn default_baseline_output_path() -> PathBuf {
    PathBuf::from("target/test.tmx")
}

fn default_admin_language() -> String {
    "en-US".to_string()
}

fn default_source_language() -> String {
    "en-US".to_string()
}

fn default_target_language() -> String {
    "ja-JP".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Build the configuration preset for a conversion variant
    pub fn for_variant(variant: ConversionVariant) -> Self {
        let mut config = Config::default();
        config.apply_variant(variant);
        if variant == ConversionVariant::Baseline {
            config.output_path = default_baseline_output_path();
        }
        config
    }

    /// Set the byte-order-mark and indentation toggles from a variant
    pub fn apply_variant(&mut self, variant: ConversionVariant) {
        let enabled = variant == ConversionVariant::Tmx14b;
        self.strip_byte_order_mark = enabled;
        self.pretty_print = enabled;
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(anyhow!("Input path must not be empty"));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(anyhow!("Output path must not be empty"));
        }

        if self.input_path == self.output_path {
            return Err(anyhow!("Output path must differ from input path: {:?}", self.input_path));
        }

        // Validate languages
        language_utils::validate_language_tag(&self.admin_language)
            .context("Invalid admin language")?;
        language_utils::validate_language_tag(&self.source_language)
            .context("Invalid source language")?;
        language_utils::validate_language_tag(&self.target_language)
            .context("Invalid target language")?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: default_input_path(),
            output_path: default_output_path(),
            admin_language: default_admin_language(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            strip_byte_order_mark: true,
            pretty_print: true,
            short_record_policy: ShortRecordPolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}
