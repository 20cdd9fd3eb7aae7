// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use csv2tmx::app_config::{self, Config, ConversionVariant, ShortRecordPolicy};
use csv2tmx::converter::Converter;
use csv2tmx::errors::AppError;
use csv2tmx::file_utils::FileManager;
use csv2tmx::language_utils;

/// CLI Wrapper for ConversionVariant to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliVariant {
    /// Input read as-is, compact output
    Baseline,
    /// Byte-order-mark tolerant input, indented output
    #[value(name = "14b")]
    Tmx14b,
}

impl From<CliVariant> for ConversionVariant {
    fn from(cli_variant: CliVariant) -> Self {
        match cli_variant {
            CliVariant::Baseline => ConversionVariant::Baseline,
            CliVariant::Tmx14b => ConversionVariant::Tmx14b,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a CSV file to TMX (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for csv2tmx
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct ConvertArgs {
    /// Input CSV file (overrides the configuration)
    #[arg(value_name = "INPUT_CSV")]
    input_path: Option<PathBuf>,

    /// Output TMX file
    #[arg(short, long, value_name = "OUTPUT_TMX")]
    output: Option<PathBuf>,

    /// Administrative language tag (e.g. 'en-US')
    #[arg(short, long)]
    admin_language: Option<String>,

    /// Language tag of the first CSV column (e.g. 'en-US')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Language tag of the second CSV column (e.g. 'ja-JP')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Conversion preset for the byte-order-mark and indentation toggles
    #[arg(long, value_enum)]
    variant: Option<CliVariant>,

    /// Strip a leading UTF-8 byte-order-mark from the input
    #[arg(long, overrides_with = "keep_bom")]
    strip_bom: bool,

    /// Keep a leading byte-order-mark as part of the first field
    #[arg(long, overrides_with = "strip_bom")]
    keep_bom: bool,

    /// Indent the output by two spaces per level
    #[arg(long, overrides_with = "compact")]
    pretty: bool,

    /// Write the output without indentation
    #[arg(long, overrides_with = "pretty")]
    compact: bool,

    /// Leave out records with fewer than two fields instead of failing
    #[arg(long)]
    skip_short_records: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "csv2tmx.json")]
    config_path: PathBuf,

    /// Do not create a default configuration file when none exists
    #[arg(long)]
    no_write_config: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// csv2tmx - convert bilingual CSV files to TMX 1.4
///
/// Each CSV record becomes one translation unit: the first field is the
/// source segment, the second field the target segment.
#[derive(Parser, Debug)]
#[command(name = "csv2tmx")]
#[command(version)]
#[command(about = "Convert bilingual CSV text pairs to a TMX 1.4 translation memory")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "csv2tmx reads a two-column CSV file (source text, target text) and writes a TMX 1.4 document.

EXAMPLES:
    csv2tmx                                     # Convert using csv2tmx.json (created if missing)
    csv2tmx pairs.csv                           # Write target/pairs.tmx
    csv2tmx pairs.csv -o out/pairs.tmx          # Convert a specific file
    csv2tmx -s en-US -t ja-JP pairs.csv         # Set the language pair
    csv2tmx --variant baseline pairs.csv        # Keep the BOM, compact output
    csv2tmx --skip-short-records pairs.csv      # Ignore rows with a single field
    csv2tmx completions bash > csv2tmx.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in csv2tmx.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically unless --no-write-config is given.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // Info until the configuration is known
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("csv2tmx: failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "csv2tmx", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => run_convert(cli.convert),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("csv2tmx: {}", e);
            if let Some(kind) = e.conversion_kind() {
                debug!("Conversion failed with {:?}", kind);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_convert(options: ConvertArgs) -> Result<(), AppError> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&options.config_path, !options.no_write_config)
        .map_err(AppError::config)?;
    apply_overrides(&mut config, &options);

    config
        .validate()
        .context("Configuration validation failed")
        .map_err(AppError::config)?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    if language_utils::language_tags_match(&config.source_language, &config.target_language) {
        warn!(
            "Source and target languages are both {}",
            language_utils::language_name(&config.source_language)?
        );
    }

    let converter = Converter::with_config(config);
    let stats = converter.run()?;

    if stats.records_skipped > 0 {
        warn!("{} short record(s) were skipped", stats.records_skipped);
    }
    info!(
        "Converted {} record(s) into {} translation unit(s) in {} ms",
        stats.records_read,
        stats.units_written,
        stats.elapsed.as_millis()
    );

    Ok(())
}

// Load the config file, or fall back to defaults and optionally persist them
fn load_or_create_config(config_path: &Path, write_default: bool) -> Result<Config> {
    if config_path.exists() {
        return Config::from_file(config_path);
    }

    let config = Config::default();
    if write_default {
        warn!("Config file not found at {:?}, creating default config.", config_path);
        config
            .save(config_path)
            .with_context(|| format!("Failed to write default config to file: {:?}", config_path))?;
    }

    Ok(config)
}

// Command line options take precedence over the configuration file
fn apply_overrides(config: &mut Config, options: &ConvertArgs) {
    if let Some(variant) = options.variant {
        config.apply_variant(variant.into());
    }

    if let Some(input_path) = &options.input_path {
        config.input_path = input_path.clone();

        // Without -o the output keeps the input's name next to the configured output
        if options.output.is_none() {
            let output_dir = config
                .output_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            config.output_path = FileManager::default_output_path(input_path, output_dir);
        }
    }

    if let Some(output) = &options.output {
        config.output_path = output.clone();
    }

    if let Some(admin_language) = &options.admin_language {
        config.admin_language = admin_language.clone();
    }

    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }

    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }

    if options.strip_bom {
        config.strip_byte_order_mark = true;
    } else if options.keep_bom {
        config.strip_byte_order_mark = false;
    }

    if options.pretty {
        config.pretty_print = true;
    } else if options.compact {
        config.pretty_print = false;
    }

    if options.skip_short_records {
        config.short_record_policy = ShortRecordPolicy::Skip;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
