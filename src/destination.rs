/*!
 * Destination tree preparation.
 *
 * The conflict decision is made once, before any core logic runs: the CLI
 * layer hands in an explicit policy value instead of the core blocking on a
 * prompt mid-run. The core only needs to know the root exists and is
 * writable afterwards.
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::errors::DestinationError;

/// What to do when the destination root already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationPolicy {
    /// Delete the existing tree and recreate it empty
    Overwrite,
    /// Keep the existing contents; already-downloaded videos are skipped later
    Keep,
    /// Refuse to touch the existing tree and abort the run
    Abort,
}

impl std::fmt::Display for DestinationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Keep => write!(f, "keep"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Ensure the destination root exists, applying `policy` on conflict.
///
/// Returns the root path once it is ready to be written into.
pub fn prepare<P: AsRef<Path>>(
    root: P,
    policy: DestinationPolicy,
) -> Result<PathBuf, DestinationError> {
    let root = root.as_ref();

    if root.exists() {
        match policy {
            DestinationPolicy::Overwrite => {
                warn!("Deleting and re-creating {:?}", root);
                fs::remove_dir_all(root).map_err(|source| DestinationError::Io {
                    path: root.to_path_buf(),
                    source,
                })?;
                create_root(root)?;
            }
            DestinationPolicy::Keep => {
                info!("Keeping existing destination {:?}", root);
            }
            DestinationPolicy::Abort => {
                return Err(DestinationError::Aborted(root.to_path_buf()));
            }
        }
    } else {
        create_root(root)?;
        info!("Destination path {:?} created successfully", root);
    }

    Ok(root.to_path_buf())
}

fn create_root(root: &Path) -> Result<(), DestinationError> {
    fs::create_dir_all(root).map_err(|source| DestinationError::Io {
        path: root.to_path_buf(),
        source,
    })
}
