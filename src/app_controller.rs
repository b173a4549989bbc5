use std::path::Path;

use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::app_config::{Config, SplitType};
use crate::catalog::LabelCatalog;
use crate::destination::{self, DestinationPolicy};
use crate::downloader::{DownloadDriver, DownloadReport, ExternalToolFetcher, MediaFetcher};
use crate::errors::AppError;
use crate::manifest;
use crate::selection;

// @module: Application controller for dataset downloads

/// Main application controller wiring the manifest, catalog, selection and
/// download stages together for one run.
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> anyhow::Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Run the full download workflow.
    ///
    /// `range_text` is the class range from the command line; when absent the
    /// user is prompted after the catalog listing is printed, matching the
    /// interactive flow the tool always had.
    pub async fn run(
        &self,
        policy: DestinationPolicy,
        range_text: Option<String>,
    ) -> Result<DownloadReport, AppError> {
        let fetcher = ExternalToolFetcher::new(self.config.download.clone());
        self.run_with_fetcher(policy, range_text, fetcher).await
    }

    /// Same workflow with an injected fetcher, used by tests to avoid
    /// spawning real external tools.
    pub async fn run_with_fetcher<F: MediaFetcher>(
        &self,
        policy: DestinationPolicy,
        range_text: Option<String>,
        fetcher: F,
    ) -> Result<DownloadReport, AppError> {
        // The holdout manifest carries no labels and its handling was never
        // settled; refuse it explicitly instead of guessing.
        if self.config.split == SplitType::Holdout {
            return Err(AppError::Config(
                "the holdout split is not supported".to_string(),
            ));
        }

        let split_root = destination::prepare(self.config.split_destination(), policy)?;

        let manifest_path = self.config.manifest_path();
        info!("Loading manifest {:?}", manifest_path);
        let rows = manifest::load(&manifest_path)?;

        let catalog = LabelCatalog::build(&rows, self.config.grouping);
        self.print_catalog(&catalog);

        let range_text = match range_text {
            Some(text) => text,
            None => self.prompt_for_range(catalog.len())?,
        };

        let chosen = selection::select(&catalog, &rows, &range_text)?;
        match chosen.labels.as_slice() {
            [single] => info!("Downloading videos of '{}' only", single),
            [first, .., last] => info!("Downloading videos from class '{}' to '{}'", first, last),
            [] => unreachable!("selection always covers at least one catalog entry"),
        }
        info!("{} videos selected", chosen.rows.len());

        let progress = Self::build_progress_bar(chosen.rows.len() as u64);

        let driver = DownloadDriver::new(fetcher);
        let report = driver
            .run(&chosen.rows, &split_root, Some(&progress))
            .await
            .map_err(AppError::from)?;

        progress.finish_and_clear();
        self.report_outcome(&report, &split_root);

        if report.failures.is_empty() {
            Ok(report)
        } else {
            Err(AppError::PartialFailure {
                failed: report.failures.len(),
                attempted: report.downloaded + report.failures.len(),
            })
        }
    }

    /// Print the numbered class listing the range is chosen against
    fn print_catalog(&self, catalog: &LabelCatalog) {
        println!("List of dataset classes available for download");
        println!("-----------------------------------------------");
        for (position, label, count) in catalog.listing() {
            println!("{:4}. {} ({} videos)", position, label, count);
        }
        println!();
    }

    /// Interactive fallback when no range was given on the command line
    fn prompt_for_range(&self, catalog_len: usize) -> Result<String, AppError> {
        let text: String = Input::new()
            .with_prompt(format!(
                "Choose a range of dataset classes to download, e.g. 1 or 1-{}",
                catalog_len
            ))
            .interact_text()
            .map_err(|e| AppError::Unknown(format!("Failed to read range input: {}", e)))?;
        Ok(text)
    }

    fn build_progress_bar(total: u64) -> ProgressBar {
        let progress = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} videos ({percent}%) {msg} {eta}")
            .or_else(|_| {
                ProgressStyle::default_bar()
                    .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));
        progress
    }

    /// Log the run summary, one warning per failed row
    fn report_outcome(&self, report: &DownloadReport, split_root: &Path) {
        info!(
            "Finished: {} downloaded, {} skipped (already present), {} failed -> {:?}",
            report.downloaded,
            report.skipped,
            report.failures.len(),
            split_root
        );

        for failure in &report.failures {
            warn!(
                "  failed: {} ({}): {}",
                failure.row.video_id, failure.row.label, failure.reason
            );
        }
    }
}
