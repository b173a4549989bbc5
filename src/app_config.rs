use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Kinetics dataset release to download
    #[serde(default)]
    pub dataset_version: DatasetVersion,

    /// Dataset split to download
    #[serde(default)]
    pub split: SplitType,

    /// Root directory the dataset is written under
    #[serde(default = "default_destination")]
    pub destination: PathBuf,

    /// Directory holding the CSV manifests, one subdirectory per release
    #[serde(default = "default_manifest_dir")]
    pub manifest_dir: PathBuf,

    /// Strategy used to build the class catalog from the manifest
    #[serde(default)]
    pub grouping: GroupingStrategy,

    /// External tool settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Kinetics dataset release
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetVersion {
    // @version: Kinetics-400
    #[serde(rename = "400")]
    K400,
    // @version: Kinetics-600 (shipped manifest layout)
    #[default]
    #[serde(rename = "600")]
    K600,
    // @version: Kinetics-700
    #[serde(rename = "700")]
    K700,
}

impl DatasetVersion {
    // @returns: Numeric release identifier
    pub fn as_number(&self) -> u16 {
        match self {
            Self::K400 => 400,
            Self::K600 => 600,
            Self::K700 => 700,
        }
    }
}

impl std::fmt::Display for DatasetVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

impl std::str::FromStr for DatasetVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "400" => Ok(Self::K400),
            "600" => Ok(Self::K600),
            "700" => Ok(Self::K700),
            _ => Err(anyhow!("Invalid dataset version: {} (expected 400, 600 or 700)", s)),
        }
    }
}

/// Dataset split
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    // @split: Training partition
    #[default]
    Train,
    // @split: Validation partition
    Validate,
    // @split: Test partition
    Test,
    // @split: Holdout partition (manifest carries no labels)
    Holdout,
}

impl SplitType {
    // @returns: Lowercase split identifier, used as the on-disk directory name
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validate => "validate",
            Self::Test => "test",
            Self::Holdout => "holdout",
        }
    }

    /// Manifest filename for this split within a release directory.
    ///
    /// The shipped layout names the test and holdout manifests after the
    /// release number while train and validation manifests are unversioned.
    pub fn manifest_filename(&self, version: DatasetVersion) -> String {
        match self {
            Self::Train => "kinetics_train.csv".to_string(),
            Self::Validate => "kinetics_val.csv".to_string(),
            Self::Test => format!("kinetics_{}_test.csv", version.as_number()),
            Self::Holdout => format!("kinetics_{}_holdout_test.csv", version.as_number()),
        }
    }
}

impl std::fmt::Display for SplitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

impl std::str::FromStr for SplitType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "validate" | "val" => Ok(Self::Validate),
            "test" => Ok(Self::Test),
            "holdout" => Ok(Self::Holdout),
            _ => Err(anyhow!("Invalid split type: {} (expected train, validate, test or holdout)", s)),
        }
    }
}

/// Catalog grouping strategy
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// Count occurrences per unique label and natural-sort the labels.
    /// Tolerates labels that reappear non-contiguously in the manifest.
    #[default]
    Frequency,
    /// Legacy single-pass grouping into contiguous index ranges. Assumes the
    /// manifest is pre-sorted by label; a label that reappears later in the
    /// file produces a second catalog entry.
    Positional,
}

impl std::fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frequency => write!(f, "frequency"),
            Self::Positional => write!(f, "positional"),
        }
    }
}

/// External tool settings for the fetch and transcode pipeline
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DownloadConfig {
    // @field: Binary resolving watch pages to direct media URLs
    #[serde(default = "default_youtube_dl_bin")]
    pub youtube_dl_bin: String,

    // @field: Binary used to clip the fetched stream
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: String,

    // @field: Format code passed to the URL resolver (-f)
    #[serde(default = "default_format_code")]
    pub format_code: String,

    // @field: Clip length in seconds (-t)
    #[serde(default = "default_clip_secs")]
    pub clip_secs: u64,

    // @field: Per-tool timeout in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            youtube_dl_bin: default_youtube_dl_bin(),
            ffmpeg_bin: default_ffmpeg_bin(),
            format_code: default_format_code(),
            clip_secs: default_clip_secs(),
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

fn default_destination() -> PathBuf {
    PathBuf::from("Kinetics_dataset")
}

fn default_manifest_dir() -> PathBuf {
    PathBuf::from("dataset_splits")
}

fn default_youtube_dl_bin() -> String {
    "youtube-dl".to_string()
}

fn default_ffmpeg_bin() -> String {
    "ffmpeg".to_string()
}

fn default_format_code() -> String {
    // Format 18 is the 360p MP4 muxed stream, cheap and universally available
    "18".to_string()
}

fn default_clip_secs() -> u64 {
    10
}

fn default_tool_timeout_secs() -> u64 {
    600
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_version: DatasetVersion::default(),
            split: SplitType::default(),
            destination: default_destination(),
            manifest_dir: default_manifest_dir(),
            grouping: GroupingStrategy::default(),
            download: DownloadConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = std::io::BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Root directory this run writes into: `<destination>/<split>`
    pub fn split_destination(&self) -> PathBuf {
        self.destination.join(self.split.dir_name())
    }

    /// Path of the manifest for the configured release and split
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_dir
            .join(format!("kinetics_{}", self.dataset_version.as_number()))
            .join(self.split.manifest_filename(self.dataset_version))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.destination.as_os_str().is_empty() {
            return Err(anyhow!("Destination path must not be empty"));
        }

        if self.manifest_dir.as_os_str().is_empty() {
            return Err(anyhow!("Manifest directory must not be empty"));
        }

        if self.download.youtube_dl_bin.trim().is_empty() {
            return Err(anyhow!("youtube_dl_bin must not be empty"));
        }

        if self.download.ffmpeg_bin.trim().is_empty() {
            return Err(anyhow!("ffmpeg_bin must not be empty"));
        }

        if self.download.clip_secs == 0 {
            return Err(anyhow!("clip_secs must be greater than zero"));
        }

        if self.download.tool_timeout_secs == 0 {
            return Err(anyhow!("tool_timeout_secs must be greater than zero"));
        }

        Ok(())
    }
}
