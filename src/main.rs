// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, DatasetVersion, GroupingStrategy, SplitType};
use crate::app_controller::Controller;
use crate::destination::DestinationPolicy;

mod app_config;
mod app_controller;
mod catalog;
mod destination;
mod downloader;
mod errors;
mod manifest;
mod selection;

/// CLI wrapper for SplitType to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSplitType {
    Train,
    Validate,
    Test,
    Holdout,
}

impl From<CliSplitType> for SplitType {
    fn from(cli_split: CliSplitType) -> Self {
        match cli_split {
            CliSplitType::Train => SplitType::Train,
            CliSplitType::Validate => SplitType::Validate,
            CliSplitType::Test => SplitType::Test,
            CliSplitType::Holdout => SplitType::Holdout,
        }
    }
}

/// CLI wrapper for DatasetVersion to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDatasetVersion {
    #[value(name = "400")]
    K400,
    #[value(name = "600")]
    K600,
    #[value(name = "700")]
    K700,
}

impl From<CliDatasetVersion> for DatasetVersion {
    fn from(cli_version: CliDatasetVersion) -> Self {
        match cli_version {
            CliDatasetVersion::K400 => DatasetVersion::K400,
            CliDatasetVersion::K600 => DatasetVersion::K600,
            CliDatasetVersion::K700 => DatasetVersion::K700,
        }
    }
}

/// CLI wrapper for GroupingStrategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliGrouping {
    Frequency,
    Positional,
}

impl From<CliGrouping> for GroupingStrategy {
    fn from(cli_grouping: CliGrouping) -> Self {
        match cli_grouping {
            CliGrouping::Frequency => GroupingStrategy::Frequency,
            CliGrouping::Positional => GroupingStrategy::Positional,
        }
    }
}

/// CLI wrapper for DestinationPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliConflictPolicy {
    Overwrite,
    Keep,
    Abort,
}

impl From<CliConflictPolicy> for DestinationPolicy {
    fn from(cli_policy: CliConflictPolicy) -> Self {
        match cli_policy {
            CliConflictPolicy::Overwrite => DestinationPolicy::Overwrite,
            CliConflictPolicy::Keep => DestinationPolicy::Keep,
            CliConflictPolicy::Abort => DestinationPolicy::Abort,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
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
    /// Download a split of the Kinetics dataset (default command)
    #[command(alias = "dl")]
    Download(DownloadArgs),

    /// Generate shell completions for kinetics-dl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct DownloadArgs {
    /// Destination directory the dataset is extracted to
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Dataset split to download
    #[arg(short = 't', long = "type", value_enum)]
    split: Option<CliSplitType>,

    /// Kinetics release to download
    #[arg(short = 'v', long = "dataset-version", value_enum)]
    dataset_version: Option<CliDatasetVersion>,

    /// Class range to download, e.g. 1 or 1-100 (prompted for when omitted)
    #[arg(short, long)]
    range: Option<String>,

    /// Catalog grouping strategy (positional is legacy)
    #[arg(long, value_enum)]
    grouping: Option<CliGrouping>,

    /// What to do when the destination already exists (prompted for when omitted)
    #[arg(long, value_enum)]
    on_conflict: Option<CliConflictPolicy>,

    /// Directory holding the CSV manifests
    #[arg(long)]
    manifest_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// kinetics-dl - Kinetics dataset downloader
///
/// Downloads labeled Kinetics 400/600/700 videos from the published CSV
/// manifests, clipping each entry with ffmpeg and sorting the results into
/// one directory per class.
#[derive(Parser, Debug)]
#[command(name = "kinetics-dl")]
#[command(version = "1.0.0")]
#[command(about = "Kinetics dataset download tool")]
#[command(long_about = "kinetics-dl reads the official Kinetics CSV manifests and downloads the
requested classes as 10 second clips, one directory per class label.

EXAMPLES:
    kinetics-dl -t train -d /data/kinetics              # Pick the range interactively
    kinetics-dl -t validate -r 1-100 -d /data/kinetics  # Classes 1 to 100, no prompt
    kinetics-dl -v 700 -t test -r 3 --on-conflict keep  # Resume a previous test run
    kinetics-dl --grouping positional -t train -r 1     # Legacy contiguous grouping
    kinetics-dl completions bash > kinetics-dl.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. Command line flags override file values.

EXTERNAL TOOLS:
    youtube-dl (or a compatible fork) and ffmpeg must be resolvable on PATH,
    or configured explicitly in the config file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Destination directory the dataset is extracted to
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Dataset split to download
    #[arg(short = 't', long = "type", value_enum)]
    split: Option<CliSplitType>,

    /// Kinetics release to download
    #[arg(short = 'v', long = "dataset-version", value_enum)]
    dataset_version: Option<CliDatasetVersion>,

    /// Class range to download, e.g. 1 or 1-100 (prompted for when omitted)
    #[arg(short, long)]
    range: Option<String>,

    /// Catalog grouping strategy (positional is legacy)
    #[arg(long, value_enum)]
    grouping: Option<CliGrouping>,

    /// What to do when the destination already exists (prompted for when omitted)
    #[arg(long, value_enum)]
    on_conflict: Option<CliConflictPolicy>,

    /// Directory holding the CSV manifests
    #[arg(long)]
    manifest_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} [{}] {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    let args = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "kinetics-dl", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Download(args)) => args,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            DownloadArgs {
                destination: cli.destination,
                split: cli.split,
                dataset_version: cli.dataset_version,
                range: cli.range,
                grouping: cli.grouping,
                on_conflict: cli.on_conflict,
                manifest_dir: cli.manifest_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
            }
        }
    };

    match run_download(args).await {
        Ok(()) => Ok(()),
        Err(app_error) => {
            error!("{}", app_error);
            std::process::exit(app_error.exit_code());
        }
    }
}

async fn run_download(options: DownloadArgs) -> Result<(), errors::AppError> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        apply_log_level(cmd_log_level.clone().into());
    }

    // Load or create configuration
    let config = load_config(&options).map_err(|e| errors::AppError::Config(e.to_string()))?;

    // Validate the configuration after loading and overriding
    config
        .validate()
        .map_err(|e| errors::AppError::Config(e.to_string()))?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        apply_log_level(config.log_level);
    }

    // Resolve the conflict policy once, before any core logic runs
    let policy = resolve_conflict_policy(&config.split_destination(), options.on_conflict)?;

    let controller =
        Controller::with_config(config).map_err(|e| errors::AppError::Config(e.to_string()))?;
    controller.run(policy, options.range).await?;

    Ok(())
}

/// Load the config file (creating a default one when missing) and apply the
/// command line overrides on top.
fn load_config(options: &DownloadArgs) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .save_to_file(config_path)
            .context("Failed to write default config")?;
        config
    };

    // Override config with CLI options if provided
    if let Some(destination) = &options.destination {
        config.destination = destination.clone();
    }

    if let Some(split) = &options.split {
        config.split = split.clone().into();
    }

    if let Some(version) = &options.dataset_version {
        config.dataset_version = version.clone().into();
    }

    if let Some(grouping) = &options.grouping {
        config.grouping = grouping.clone().into();
    }

    if let Some(manifest_dir) = &options.manifest_dir {
        config.manifest_dir = manifest_dir.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

fn apply_log_level(level: app_config::LogLevel) {
    let filter = match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    };
    log::set_max_level(filter);
}

/// Decide what happens to an already-existing destination.
///
/// The `--on-conflict` flag wins when given; otherwise the user is asked
/// interactively, keeping the decision out of the core entirely.
fn resolve_conflict_policy(
    split_root: &Path,
    flag: Option<CliConflictPolicy>,
) -> Result<DestinationPolicy, errors::AppError> {
    if let Some(policy) = flag {
        return Ok(policy.into());
    }

    if !split_root.exists() {
        return Ok(DestinationPolicy::Keep);
    }

    let choices = [
        DestinationPolicy::Overwrite,
        DestinationPolicy::Keep,
        DestinationPolicy::Abort,
    ];
    let picked = dialoguer::Select::new()
        .with_prompt(format!(
            "Destination path '{}' already exists. Delete and recreate it?",
            split_root.display()
        ))
        .items(&choices)
        .default(1)
        .interact()
        .map_err(|e| errors::AppError::Unknown(format!("Failed to read answer: {}", e)))?;

    Ok(choices[picked])
}
