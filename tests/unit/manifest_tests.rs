/*!
 * Tests for manifest loading
 */

use anyhow::Result;
use kinetics_dl::errors::ManifestError;
use kinetics_dl::manifest::{self, UNLABELED_SENTINEL};

use crate::common;

/// Test that a labeled three-column manifest loads with the header stripped
#[test]
fn test_load_withLabeledManifest_shouldReturnRowsInFileOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_manifest(temp_dir.path(), "kinetics_train.csv")?;

    let rows = manifest::load(&path)?;

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].label, "swimming");
    assert_eq!(rows[0].video_id, "abc123");
    assert_eq!(rows[0].start_time, "10");
    assert_eq!(rows[2].label, "running");
    assert_eq!(rows[2].video_id, "ghi789");

    Ok(())
}

/// Test that a missing manifest file fails with NotFound
#[test]
fn test_load_withMissingFile_shouldReturnNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("does_not_exist.csv");

    let err = manifest::load(&path).unwrap_err();
    assert!(matches!(err, ManifestError::NotFound(_)));

    Ok(())
}

/// Test that a manifest with only a header row fails with a format error
#[test]
fn test_load_withHeaderOnly_shouldReturnFormatError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "empty.csv", "label,youtube_id,time_start\n")?;

    let err = manifest::load(&path).unwrap_err();
    assert!(matches!(err, ManifestError::Format { .. }));

    Ok(())
}

/// Test that two-column holdout rows get the sentinel label
#[test]
fn test_load_withTwoColumnRows_shouldAssignSentinelLabel() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "youtube_id,time_start\nabc123,10\ndef456,15\n";
    let path = common::create_test_file(temp_dir.path(), "kinetics_600_holdout_test.csv", content)?;

    let rows = manifest::load(&path)?;

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.label == UNLABELED_SENTINEL));
    assert_eq!(rows[0].video_id, "abc123");
    assert_eq!(rows[1].start_time, "15");

    Ok(())
}

/// Test that a row with too many columns is rejected.
/// Quoting is disabled, so an embedded comma in a label splits the row into
/// four fields and surfaces as a format error instead of a silent misparse.
#[test]
fn test_load_withEmbeddedComma_shouldReturnFormatError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "label,youtube_id,time_start\nswimming, backstroke,abc123,10\n";
    let path = common::create_test_file(temp_dir.path(), "bad.csv", content)?;

    let err = manifest::load(&path).unwrap_err();
    assert!(matches!(err, ManifestError::Format { .. }));
    assert!(err.to_string().contains("4 columns"));

    Ok(())
}

/// Test that a quoted field is treated literally, quotes included
#[test]
fn test_load_withQuotedField_shouldKeepQuotesVerbatim() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "label,youtube_id,time_start\n\"swimming\",abc123,10\n";
    let path = common::create_test_file(temp_dir.path(), "quoted.csv", content)?;

    let rows = manifest::load(&path)?;
    assert_eq!(rows[0].label, "\"swimming\"");

    Ok(())
}

/// Test that the watch URL is derived from the video id
#[test]
fn test_youtube_url_withVideoId_shouldBuildWatchUrl() {
    let row = common::row("swimming", "abc123", "10");
    assert_eq!(row.youtube_url(), "https://www.youtube.com/watch?v=abc123");
}
