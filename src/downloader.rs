/*!
 * Download driver and the external fetch/transcode pipeline.
 *
 * For each selected manifest row the driver computes the target path
 * `<split root>/<label>/vid_<video_id>.avi`, skips rows whose target already
 * exists, and otherwise delegates to a [`MediaFetcher`]. The on-disk naming
 * is a persisted contract: prior runs are detected purely by file existence,
 * so it must never change.
 *
 * A failed fetch does not abort the batch. The failure is logged, recorded
 * in the run report and processing continues with the next row.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use tokio::process::Command;

use crate::app_config::DownloadConfig;
use crate::errors::FetchError;
use crate::manifest::ManifestRow;

/// Target path for one video: `<root>/<label>/vid_<video_id>.avi`
pub fn destination_path<P: AsRef<Path>>(root: P, label: &str, video_id: &str) -> PathBuf {
    root.as_ref().join(label).join(format!("vid_{}.avi", video_id))
}

/// Fetches one clipped video to a destination path.
///
/// The production implementation shells out to external tools; tests swap in
/// a recording mock.
#[async_trait]
pub trait MediaFetcher {
    /// Fetch the row's video, clipped at its start offset, into `dest`
    async fn fetch_clip(&self, row: &ManifestRow, dest: &Path) -> Result<(), FetchError>;
}

/// Production fetcher: resolve a direct media URL with youtube-dl, then clip
/// the stream with ffmpeg. Both tools run with structured argument arrays,
/// never through a shell, so labels with spaces or parentheses need no
/// quoting games.
pub struct ExternalToolFetcher {
    config: DownloadConfig,
}

impl ExternalToolFetcher {
    /// Create a fetcher from the download section of the configuration
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Run one external tool to completion, enforcing the configured timeout
    async fn run_tool(&self, tool: &str, args: &[&str]) -> Result<std::process::Output, FetchError> {
        debug!("Running {} {:?}", tool, args);

        let output_future = Command::new(tool).args(args).output();
        let timeout_secs = self.config.tool_timeout_secs;

        let output = tokio::select! {
            result = output_future => {
                result.map_err(|source| FetchError::Spawn {
                    tool: tool.to_string(),
                    source,
                })?
            }
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                return Err(FetchError::Timeout {
                    tool: tool.to_string(),
                    secs: timeout_secs,
                });
            }
        };

        if !output.status.success() {
            return Err(FetchError::ToolFailed {
                tool: tool.to_string(),
                status: output
                    .status
                    .code()
                    .map(|c| format!("code {}", c))
                    .unwrap_or_else(|| "signal".to_string()),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }

    /// Ask the resolver for a direct media URL for the row's watch page
    async fn resolve_media_url(&self, row: &ManifestRow) -> Result<String, FetchError> {
        let watch_url = row.youtube_url();
        let output = self
            .run_tool(
                &self.config.youtube_dl_bin,
                &["-f", &self.config.format_code, "--get-url", &watch_url],
            )
            .await?;

        let url = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        if url.is_empty() {
            return Err(FetchError::NoMediaUrl(row.video_id.clone()));
        }

        Ok(url)
    }
}

#[async_trait]
impl MediaFetcher for ExternalToolFetcher {
    async fn fetch_clip(&self, row: &ManifestRow, dest: &Path) -> Result<(), FetchError> {
        let media_url = self.resolve_media_url(row).await?;

        let clip_secs = self.config.clip_secs.to_string();
        let dest_str = dest.to_string_lossy();
        self.run_tool(
            &self.config.ffmpeg_bin,
            &[
                "-hide_banner",
                "-ss",
                &row.start_time,
                "-i",
                &media_url,
                "-t",
                &clip_secs,
                "-c:v",
                "copy",
                "-c:a",
                "copy",
                &dest_str,
            ],
        )
        .await?;

        Ok(())
    }
}

/// One row whose pipeline failed, with the reason it failed
#[derive(Debug, Clone)]
pub struct DownloadFailure {
    /// The manifest row that could not be fetched
    pub row: ManifestRow,
    /// Rendered fetch error
    pub reason: String,
}

/// Outcome of one driver run over a selection
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Rows fetched successfully in this run
    pub downloaded: usize,
    /// Rows skipped because their target file already existed
    pub skipped: usize,
    /// Rows that were attempted and failed
    pub failures: Vec<DownloadFailure>,
}

impl DownloadReport {
    /// Total rows the driver looked at
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failures.len()
    }
}

/// Sequential download driver over a resolved selection
pub struct DownloadDriver<F: MediaFetcher> {
    fetcher: F,
}

impl<F: MediaFetcher> DownloadDriver<F> {
    /// Create a driver around the given fetcher
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Process `rows` one at a time, writing under `split_root`.
    ///
    /// Existing target files are skipped without invoking any external tool,
    /// which is what makes re-runs idempotent. Note the check is existence
    /// only: a truncated file from an interrupted run still counts as done.
    pub async fn run(
        &self,
        rows: &[ManifestRow],
        split_root: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<DownloadReport> {
        let mut report = DownloadReport::default();

        for row in rows {
            let label_dir = split_root.join(&row.label);
            if !label_dir.exists() {
                fs::create_dir_all(&label_dir)
                    .with_context(|| format!("Failed to create label directory {:?}", label_dir))?;
            }

            let target = destination_path(split_root, &row.label, &row.video_id);

            if target.exists() {
                debug!("Skipped: {:?}", target);
                report.skipped += 1;
            } else {
                match self.fetcher.fetch_clip(row, &target).await {
                    Ok(()) => {
                        report.downloaded += 1;
                        info!(
                            "{} videos downloaded ({:?})",
                            report.downloaded, target
                        );
                    }
                    Err(err) => {
                        warn!("Download failed for video '{}': {}", row.video_id, err);
                        report.failures.push(DownloadFailure {
                            row: row.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        Ok(report)
    }
}
