/*!
 * Manifest loading for Kinetics dataset CSV files.
 *
 * A manifest is a plain CSV file whose first row is a header. Labeled splits
 * carry three columns (`label,video_id,start_time`); the holdout split drops
 * the label column and ships two. Embedded commas are not quoted in the
 * shipped files, so quoting is disabled on the reader to keep the historical
 * "split on every comma" contract.
 */

use std::path::Path;

use csv::ReaderBuilder;
use log::debug;

use crate::errors::ManifestError;

/// Label assigned to rows of a manifest that carries no label column
pub const UNLABELED_SENTINEL: &str = "all_data";

/// One dataset entry parsed from a manifest row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// Class label, or [`UNLABELED_SENTINEL`] for 2-column manifests
    pub label: String,
    /// YouTube video identifier
    pub video_id: String,
    /// Clip start offset within the source video, kept as the raw timecode text
    pub start_time: String,
}

impl ManifestRow {
    /// Watch-page URL for this row's video
    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Load every data row of the manifest at `path`, in file order.
///
/// The header row is discarded. Fails with [`ManifestError::NotFound`] when
/// the file is missing and [`ManifestError::Format`] when no data row remains
/// after the header or a row has an unexpected column count.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<ManifestRow>, ManifestError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;

        let row = match record.len() {
            3 => ManifestRow {
                label: record[0].to_string(),
                video_id: record[1].to_string(),
                start_time: record[2].to_string(),
            },
            // Holdout layout: no label column
            2 => ManifestRow {
                label: UNLABELED_SENTINEL.to_string(),
                video_id: record[0].to_string(),
                start_time: record[1].to_string(),
            },
            n => {
                return Err(ManifestError::format(
                    path,
                    format!("row {} has {} columns, expected 2 or 3", index + 2, n),
                ));
            }
        };

        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ManifestError::format(path, "no data rows after the header"));
    }

    debug!("Loaded {} manifest rows from {:?}", rows.len(), path);

    Ok(rows)
}
