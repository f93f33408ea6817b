//! Upload engine: walks the manifest, uploads each row, files it into its
//! album and tallies the outcomes.
//!
//! Rows are processed with bounded concurrency (`threads_num`, default 1)
//! but always reported in manifest order. Every row produces exactly one
//! [`UploadOutcome`]; no row failure stops the run. Shutdown is honoured at
//! row boundaries: rows already started finish, no new row starts.

pub mod collections;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

pub use error::UploadError;
pub use outcome::{OutcomeKind, RowReport, RunTally, UploadOutcome};
pub use report::RunReport;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::flickr::PhotoService;
use crate::license;
use crate::manifest::{ManifestError, ManifestRow, UploadRecord};
use crate::rate_limit::RateLimiter;
use crate::tags;
use crate::types::Visibility;
use collections::CollectionRegistry;

/// Subset of application config consumed by the upload engine.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub(crate) base_directory: Option<PathBuf>,
    pub(crate) visibility: Visibility,
    /// Minimum spacing between uploads once the burst is spent.
    pub(crate) delay: Duration,
    pub(crate) burst: u32,
    pub(crate) threads_num: usize,
    pub(crate) no_progress_bar: bool,
}

/// Everything a finished (or interrupted) run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub rows: Vec<RowReport>,
    pub tally: RunTally,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn report(&self) -> RunReport {
        RunReport::new(self.started_at, self.cancelled, self.tally.clone(), &self.rows)
    }
}

/// Shared per-run state borrowed by every row.
struct RunContext<'a> {
    service: &'a dyn PhotoService,
    registry: CollectionRegistry,
    limiter: RateLimiter,
    config: &'a UploadConfig,
}

/// Progress display for a manifest of unknown length.
///
/// Hidden when `--no-progress-bar` was passed or stdout is not a TTY.
fn create_progress_bar(no_progress_bar: bool) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} rows {wide_msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Upload every row of `rows` and return the per-row outcomes and tally.
pub async fn upload_manifest<I>(
    service: &dyn PhotoService,
    rows: I,
    config: &UploadConfig,
    shutdown_token: CancellationToken,
) -> RunSummary
where
    I: Iterator<Item = Result<ManifestRow, ManifestError>>,
{
    let started_at = Utc::now();
    let started = Instant::now();

    let ctx = RunContext {
        service,
        registry: CollectionRegistry::load(service).await,
        limiter: RateLimiter::new(config.delay, config.burst),
        config,
    };

    let pb = create_progress_bar(config.no_progress_bar);
    let mut results = std::pin::pin!(stream::iter(rows)
        .take_while(|_| std::future::ready(!shutdown_token.is_cancelled()))
        .map(|item| process_row(&ctx, item))
        .buffered(config.threads_num.max(1)));

    let mut reports = Vec::new();
    let mut tally = RunTally::default();
    while let Some(report) = results.next().await {
        pb.suspend(|| log_row(&report));
        pb.inc(1);
        if let Some(path) = &report.source_path {
            pb.set_message(path.display().to_string());
        }
        tally.record(&report.outcome);
        reports.push(report);
    }
    pb.finish_and_clear();

    let cancelled = shutdown_token.is_cancelled();
    log_summary(&tally, cancelled, started.elapsed());

    RunSummary {
        started_at,
        rows: reports,
        tally,
        cancelled,
    }
}

async fn process_row(
    ctx: &RunContext<'_>,
    item: Result<ManifestRow, ManifestError>,
) -> RowReport {
    let row = match item {
        Ok(row) => row,
        Err(e) => {
            return RowReport {
                line: e.line(),
                source_path: None,
                external_id: None,
                outcome: UploadError::from(e).into(),
            }
        }
    };

    let record = UploadRecord::from_row(&row, ctx.config.base_directory.as_deref());
    let outcome = upload_record(ctx, &record).await;
    RowReport {
        line: record.line,
        source_path: Some(record.source_path),
        external_id: record.external_id,
        outcome,
    }
}

/// Validate, upload, then file into the album if the row names one.
async fn upload_record(ctx: &RunContext<'_>, record: &UploadRecord) -> UploadOutcome {
    if let Err(e) = executor::ensure_source_exists(&record.source_path).await {
        return e.into();
    }

    let license = license::resolve(&record.license_label);
    let tags = tags::normalize(&record.tags);

    ctx.limiter.acquire().await;
    let asset_id = match executor::upload(
        ctx.service,
        record,
        tags,
        license,
        ctx.config.visibility,
    )
    .await
    {
        Ok(id) => id,
        Err(e) => return e.into(),
    };

    let Some(name) = record.collection_name.as_deref() else {
        return UploadOutcome::Success {
            asset_id,
            collection: None,
        };
    };

    match ctx
        .registry
        .resolve_or_create(ctx.service, name, &asset_id)
        .await
    {
        Ok(collection) => UploadOutcome::Success {
            asset_id,
            collection: Some(collection),
        },
        Err(cause) => UploadOutcome::CollectionAssignmentFailed { asset_id, cause },
    }
}

fn log_row(report: &RowReport) {
    let path = report
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let system_id = report.external_id.as_deref().unwrap_or("");
    let outcome = report.outcome.kind();

    match &report.outcome {
        UploadOutcome::Success { asset_id, collection } => tracing::info!(
            path = %path,
            system_id,
            asset_id = %asset_id,
            collection = collection.as_ref().map(|c| c.id.as_str()),
            "{}",
            outcome
        ),
        UploadOutcome::SkippedMissingFile => {
            tracing::warn!(path = %path, system_id, "{}", outcome)
        }
        other => tracing::error!(
            line = report.line,
            path = %path,
            system_id,
            asset_id = other.asset_id(),
            "{}: {}",
            outcome,
            other.detail().unwrap_or_default()
        ),
    }
}

fn log_summary(tally: &RunTally, cancelled: bool, elapsed: Duration) {
    tracing::info!("── Summary ──");
    if cancelled {
        tracing::info!("  Interrupted after {} rows", tally.total());
    }
    tracing::info!(
        "  {} uploaded, {} failed, {} total",
        tally.succeeded,
        tally.failures(),
        tally.total()
    );
    for kind in [
        OutcomeKind::SkippedMissingFile,
        OutcomeKind::UploadFailed,
        OutcomeKind::InvalidResponse,
        OutcomeKind::CollectionAssignmentFailed,
    ] {
        let n = tally.count(kind);
        if n > 0 {
            tracing::info!("  {}: {}", kind, n);
        }
    }
    tracing::info!("  albums created: {}", tally.collections_created);
    tracing::info!("  elapsed: {}", format_duration(elapsed));
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
