/*!
 * Tests for the download driver
 */

use anyhow::Result;
use kinetics_dl::downloader::{destination_path, DownloadDriver};

use crate::common::{self, row, MockFetcher};

/// Test the persisted on-disk naming contract
#[test]
fn test_destination_path_withLabelAndId_shouldFollowNamingContract() {
    let path = destination_path("/data/train", "playing guitar", "abc123");
    assert_eq!(
        path,
        std::path::Path::new("/data/train/playing guitar/vid_abc123.avi")
    );
}

/// Test that a run over fresh rows fetches every row and creates label dirs
#[tokio::test]
async fn test_run_withFreshRows_shouldFetchEveryRow() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let rows = vec![
        row("swimming", "a1", "10"),
        row("swimming", "a2", "15"),
        row("running", "b1", "5"),
    ];

    let fetcher = MockFetcher::succeeding();
    let calls = fetcher.call_counter();
    let driver = DownloadDriver::new(fetcher);

    let report = driver.run(&rows, temp_dir.path(), None).await?;

    assert_eq!(report.downloaded, 3);
    assert_eq!(report.skipped, 0);
    assert!(report.failures.is_empty());
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);

    assert!(destination_path(temp_dir.path(), "swimming", "a1").is_file());
    assert!(destination_path(temp_dir.path(), "swimming", "a2").is_file());
    assert!(destination_path(temp_dir.path(), "running", "b1").is_file());
    Ok(())
}

/// Test that a second run over the same selection invokes no external tool.
/// Existence of the target file is the only resume safeguard there is.
#[tokio::test]
async fn test_run_withSecondIdenticalRun_shouldSkipAllRowsWithoutFetching() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let rows = vec![row("swimming", "a1", "10"), row("running", "b1", "5")];

    let first = MockFetcher::succeeding();
    DownloadDriver::new(first).run(&rows, temp_dir.path(), None).await?;

    let second = MockFetcher::succeeding();
    let calls = second.call_counter();
    let report = DownloadDriver::new(second).run(&rows, temp_dir.path(), None).await?;

    assert_eq!(report.downloaded, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    Ok(())
}

/// Test that even an empty file counts as already downloaded
#[tokio::test]
async fn test_run_withZeroByteTarget_shouldStillSkip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let rows = vec![row("swimming", "a1", "10")];

    let target = destination_path(temp_dir.path(), "swimming", "a1");
    std::fs::create_dir_all(target.parent().unwrap())?;
    std::fs::write(&target, b"")?;

    let fetcher = MockFetcher::succeeding();
    let calls = fetcher.call_counter();
    let report = DownloadDriver::new(fetcher).run(&rows, temp_dir.path(), None).await?;

    assert_eq!(report.skipped, 1);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    Ok(())
}

/// Test that a failed fetch is recorded and processing continues
#[tokio::test]
async fn test_run_withFailingRow_shouldRecordFailureAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let rows = vec![
        row("swimming", "a1", "10"),
        row("swimming", "bad1", "15"),
        row("running", "b1", "5"),
    ];

    let fetcher = MockFetcher::failing_for(&["bad1"]);
    let report = DownloadDriver::new(fetcher).run(&rows, temp_dir.path(), None).await?;

    assert_eq!(report.downloaded, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row.video_id, "bad1");
    assert!(report.failures[0].reason.contains("bad1"));
    assert_eq!(report.total(), 3);

    // The row after the failure was still processed
    assert!(destination_path(temp_dir.path(), "running", "b1").is_file());
    // The failed row left no target behind
    assert!(!destination_path(temp_dir.path(), "swimming", "bad1").exists());
    Ok(())
}
