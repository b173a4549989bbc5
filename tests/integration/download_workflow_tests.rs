/*!
 * End-to-end download workflow tests driving the controller with a mock
 * fetcher over real manifests in a temporary directory tree.
 */

use std::fs;
use std::path::Path;

use anyhow::Result;
use kinetics_dl::app_config::{Config, DatasetVersion, GroupingStrategy, SplitType};
use kinetics_dl::app_controller::Controller;
use kinetics_dl::destination::DestinationPolicy;
use kinetics_dl::downloader::destination_path;
use kinetics_dl::errors::AppError;

use crate::common::{self, MockFetcher};

const SAMPLE_MANIFEST: &str = "label\nswimming,abc123,10\nswimming,def456,15\nrunning,ghi789,5\n";

/// Write the sample train manifest into the shipped directory layout and
/// return a config pointing at it.
fn workflow_config(base: &Path, grouping: GroupingStrategy) -> Result<Config> {
    let manifest_dir = base.join("dataset_splits");
    let release_dir = manifest_dir.join("kinetics_600");
    fs::create_dir_all(&release_dir)?;
    common::create_test_file(&release_dir, "kinetics_train.csv", SAMPLE_MANIFEST)?;

    Ok(Config {
        dataset_version: DatasetVersion::K600,
        split: SplitType::Train,
        destination: base.join("Kinetics_dataset"),
        manifest_dir,
        grouping,
        ..Config::default()
    })
}

/// Positional grouping yields catalog {1: (swimming, 0, 1), 2: (running, 2, 2)};
/// selecting "1" downloads only the two swimming rows.
#[tokio::test]
async fn test_workflow_withPositionalGroupingAndSingleClass_shouldDownloadOnlyThatRun() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let config = workflow_config(temp_dir.path(), GroupingStrategy::Positional)?;
    let split_root = config.split_destination();

    let controller = Controller::with_config(config)?;
    assert!(controller.is_initialized());
    let fetcher = MockFetcher::succeeding();
    let calls = fetcher.call_counter();

    let report = controller
        .run_with_fetcher(DestinationPolicy::Keep, Some("1".to_string()), fetcher)
        .await
        .expect("workflow should succeed");

    assert_eq!(report.downloaded, 2);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert!(destination_path(&split_root, "swimming", "abc123").is_file());
    assert!(destination_path(&split_root, "swimming", "def456").is_file());
    assert!(!destination_path(&split_root, "running", "ghi789").exists());
    Ok(())
}

/// Frequency grouping sorts the catalog to
/// [(running, 1), (swimming, 2)]; selecting "1-2" downloads all three rows.
#[tokio::test]
async fn test_workflow_withFrequencyGroupingAndFullSpan_shouldDownloadAllRows() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let config = workflow_config(temp_dir.path(), GroupingStrategy::Frequency)?;
    let split_root = config.split_destination();

    let controller = Controller::with_config(config)?;
    let report = controller
        .run_with_fetcher(
            DestinationPolicy::Keep,
            Some("1-2".to_string()),
            MockFetcher::succeeding(),
        )
        .await
        .expect("workflow should succeed");

    assert_eq!(report.downloaded, 3);
    assert!(destination_path(&split_root, "swimming", "abc123").is_file());
    assert!(destination_path(&split_root, "swimming", "def456").is_file());
    assert!(destination_path(&split_root, "running", "ghi789").is_file());
    Ok(())
}

/// Test that re-running the same selection skips everything already fetched
#[tokio::test]
async fn test_workflow_withRepeatedRun_shouldSkipExistingVideos() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = workflow_config(temp_dir.path(), GroupingStrategy::Frequency)?;

    let controller = Controller::with_config(config)?;
    controller
        .run_with_fetcher(
            DestinationPolicy::Keep,
            Some("1-2".to_string()),
            MockFetcher::succeeding(),
        )
        .await
        .expect("first run should succeed");

    let second = MockFetcher::succeeding();
    let calls = second.call_counter();
    let report = controller
        .run_with_fetcher(DestinationPolicy::Keep, Some("1-2".to_string()), second)
        .await
        .expect("second run should succeed");

    assert_eq!(report.downloaded, 0);
    assert_eq!(report.skipped, 3);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    Ok(())
}

/// Test that a failed row surfaces as a partial failure after the rest of
/// the batch was still processed
#[tokio::test]
async fn test_workflow_withOneFailingVideo_shouldFinishBatchAndReportFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = workflow_config(temp_dir.path(), GroupingStrategy::Frequency)?;
    let split_root = config.split_destination();

    let controller = Controller::with_config(config)?;
    let err = controller
        .run_with_fetcher(
            DestinationPolicy::Keep,
            Some("1-2".to_string()),
            MockFetcher::failing_for(&["def456"]),
        )
        .await
        .expect_err("failures should surface as an error");

    match err {
        AppError::PartialFailure { failed, attempted } => {
            assert_eq!(failed, 1);
            assert_eq!(attempted, 3);
        }
        other => panic!("expected PartialFailure, got {:?}", other),
    }

    // The rows around the failure were still downloaded
    assert!(destination_path(&split_root, "swimming", "abc123").is_file());
    assert!(destination_path(&split_root, "running", "ghi789").is_file());
    assert!(!destination_path(&split_root, "swimming", "def456").exists());
    Ok(())
}

/// Test that an invalid range aborts before any download is attempted
#[tokio::test]
async fn test_workflow_withInvalidRange_shouldFailWithoutFetching() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = workflow_config(temp_dir.path(), GroupingStrategy::Frequency)?;

    let controller = Controller::with_config(config)?;
    let fetcher = MockFetcher::succeeding();
    let calls = fetcher.call_counter();

    let err = controller
        .run_with_fetcher(DestinationPolicy::Keep, Some("5-2".to_string()), fetcher)
        .await
        .expect_err("invalid range should abort the run");

    assert!(matches!(err, AppError::Selection(_)));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    Ok(())
}

/// Test that the holdout split is rejected explicitly
#[tokio::test]
async fn test_workflow_withHoldoutSplit_shouldFailAsUnsupported() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = workflow_config(temp_dir.path(), GroupingStrategy::Frequency)?;
    config.split = SplitType::Holdout;

    let controller = Controller::with_config(config)?;
    let err = controller
        .run_with_fetcher(
            DestinationPolicy::Keep,
            Some("1".to_string()),
            MockFetcher::succeeding(),
        )
        .await
        .expect_err("holdout should be rejected");

    match err {
        AppError::Config(message) => assert!(message.contains("holdout")),
        other => panic!("expected Config error, got {:?}", other),
    }
    Ok(())
}

/// Test that a missing manifest surfaces as a manifest error
#[tokio::test]
async fn test_workflow_withMissingManifest_shouldFailWithManifestError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = workflow_config(temp_dir.path(), GroupingStrategy::Frequency)?;
    config.dataset_version = DatasetVersion::K400; // no kinetics_400 directory was written

    let controller = Controller::with_config(config)?;
    let err = controller
        .run_with_fetcher(
            DestinationPolicy::Keep,
            Some("1".to_string()),
            MockFetcher::succeeding(),
        )
        .await
        .expect_err("missing manifest should abort the run");

    assert!(matches!(err, AppError::Manifest(_)));
    assert_eq!(err.exit_code(), 3);
    Ok(())
}
