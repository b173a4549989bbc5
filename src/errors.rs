/*!
 * Error types for the kinetics-dl application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Every fatal error
 * class maps to a distinct process exit code so that scripts wrapping the tool
 * can tell apart a bad range from a missing manifest.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a dataset manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist on disk
    #[error("Manifest file not found: {0}")]
    NotFound(PathBuf),

    /// The manifest exists but its content is unusable
    #[error("Malformed manifest {path}: {reason}")]
    Format {
        /// Path of the offending manifest
        path: PathBuf,
        /// Human-readable description of the problem
        reason: String,
    },

    /// Underlying CSV reader error
    #[error("Failed to read manifest: {0}")]
    Read(#[from] csv::Error),
}

impl ManifestError {
    /// Shorthand for a format error at the given path
    pub fn format<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::Format { path: path.into(), reason: reason.into() }
    }
}

/// Errors that can occur when parsing a user-supplied class range
#[derive(Error, Debug)]
pub enum SelectionError {
    /// The range text did not resolve to a valid catalog slice
    #[error("Invalid range '{input}': provide a single class number or an inclusive span, e.g. 1 or 1-{catalog_len}")]
    InvalidRange {
        /// The raw user input, whitespace stripped
        input: String,
        /// Size of the catalog the range was checked against
        catalog_len: usize,
    },
}

/// Errors that can occur while preparing the destination tree
#[derive(Error, Debug)]
pub enum DestinationError {
    /// The destination exists and the conflict policy was Abort
    #[error("Destination '{0}' already exists, aborting as requested")]
    Aborted(PathBuf),

    /// Filesystem operation on the destination failed
    #[error("Destination error at '{path}': {source}")]
    Io {
        /// Path the operation was applied to
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },
}

/// Errors raised by the external fetch and transcode pipeline
#[derive(Error, Debug)]
pub enum FetchError {
    /// The external tool could not be spawned at all
    #[error("Failed to launch '{tool}': {source}")]
    Spawn {
        /// Binary name that failed to start
        tool: String,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The external tool ran but exited unsuccessfully
    #[error("'{tool}' exited with {status}: {stderr}")]
    ToolFailed {
        /// Binary name that failed
        tool: String,
        /// Exit status description
        status: String,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// The external tool did not finish within the configured timeout
    #[error("'{tool}' timed out after {secs}s")]
    Timeout {
        /// Binary name that hung
        tool: String,
        /// Timeout that was applied
        secs: u64,
    },

    /// The resolver returned no usable media URL
    #[error("No media URL resolved for video id '{0}'")]
    NoMediaUrl(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error loading or parsing a manifest
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Error parsing the requested class range
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    /// Error preparing the destination tree
    #[error("Destination error: {0}")]
    Destination(#[from] DestinationError),

    /// The run finished but some items failed to download
    #[error("{failed} of {attempted} attempted downloads failed")]
    PartialFailure {
        /// Number of rows whose pipeline failed
        failed: usize,
        /// Number of rows that were attempted
        attempted: usize,
    },

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this error class.
    ///
    /// 0 is reserved for clean completion; 1 is left to unexpected errors so
    /// every deliberate failure stays distinguishable.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Manifest(_) => 3,
            AppError::Selection(_) => 4,
            AppError::Destination(_) => 5,
            AppError::PartialFailure { .. } => 6,
            AppError::Unknown(_) => 1,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
