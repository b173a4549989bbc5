/*!
 * # kinetics-dl - Kinetics dataset downloader
 *
 * A Rust library and CLI for downloading the Kinetics 400/600/700 video
 * datasets from their published CSV manifests.
 *
 * ## Features
 *
 * - Parse the official split manifests (train, validation, test)
 * - Build a numbered class catalog, grouped by contiguous ranges (legacy)
 *   or per-label counts with natural label ordering (default)
 * - Restrict a run to a single class or an inclusive class range
 * - Fetch and clip each video through youtube-dl and ffmpeg, invoked with
 *   structured argument lists
 * - Skip videos already on disk, so interrupted runs can simply be re-run
 * - Continue past failed downloads and report the failures at the end
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `manifest`: CSV manifest loading
 * - `catalog`: Class catalog construction and natural ordering
 * - `selection`: User range parsing and row selection
 * - `destination`: Destination tree preparation and conflict policy
 * - `downloader`: Sequential download driver and the external tool pipeline
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod destination;
pub mod downloader;
pub mod errors;
pub mod manifest;
pub mod selection;

// Re-export main types for easier usage
pub use app_config::{Config, DatasetVersion, GroupingStrategy, SplitType};
pub use app_controller::Controller;
pub use catalog::{natural_cmp, LabelCatalog, LabelCount, LabelRange};
pub use destination::DestinationPolicy;
pub use downloader::{destination_path, DownloadDriver, DownloadReport, MediaFetcher};
pub use errors::{AppError, DestinationError, FetchError, ManifestError, SelectionError};
pub use manifest::{ManifestRow, UNLABELED_SENTINEL};
pub use selection::{RangeSpan, Selection};
