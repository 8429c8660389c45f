// Background sampler: fetch docker stats, parse, convert, store. One pass per tick.
// The next pass starts `interval_ms` after the previous one finished.

use crate::error::SourceError;
use crate::metrics_store::MetricsStore;
use crate::parser;
use crate::stats_source::StatsSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{Duration, Instant, sleep};
use tracing::instrument;

/// Counters for the app stats log line.
#[derive(Debug, Default)]
pub struct SamplerStats {
    pub passes: AtomicU64,
    pub samples_written: AtomicU64,
    pub lines_skipped: AtomicU64,
    pub source_failures: AtomicU64,
}

/// Outcome of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassSummary {
    pub samples_written: usize,
    pub lines_skipped: usize,
}

/// Source, store, counters, and shutdown for the sampler.
pub struct SamplerDeps<S> {
    pub source: Arc<S>,
    pub store: Arc<MetricsStore>,
    pub stats: Arc<SamplerStats>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Sampler timing and logging config.
pub struct SamplerConfig {
    pub interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Run one pass: fetch lines, then parse, convert and store each.
///
/// A bad line is logged and skipped; a sample with any unconvertible field is
/// skipped whole so its previous values stay exposed. Only a source failure
/// aborts the pass.
pub async fn sample_once<S: StatsSource>(
    source: &S,
    store: &MetricsStore,
) -> Result<PassSummary, SourceError> {
    let lines = source.fetch_lines().await?;
    let mut summary = PassSummary::default();

    for line in &lines {
        match parser::parse_and_normalize(line) {
            Ok(Some(sample)) => {
                store.write_sample(&sample);
                summary.samples_written += 1;
            }
            Ok(None) => {}
            Err(e) if e.is_malformed() => {
                tracing::warn!(error = %e, line = %line, "skipping malformed stats line");
                summary.lines_skipped += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping container sample");
                summary.lines_skipped += 1;
            }
        }
    }

    tracing::debug!(
        operation = "sample_once",
        samples_written = summary.samples_written,
        lines_skipped = summary.lines_skipped,
        "Pass complete"
    );
    Ok(summary)
}

/// Spawns the sampler task. It runs until `shutdown_rx` fires or its sender is dropped.
pub fn spawn<S>(deps: SamplerDeps<S>, config: SamplerConfig) -> tokio::task::JoinHandle<()>
where
    S: StatsSource + 'static,
{
    tokio::spawn(run(deps, config))
}

#[instrument(skip_all, fields(interval_ms = config.interval_ms))]
async fn run<S: StatsSource>(deps: SamplerDeps<S>, config: SamplerConfig) {
    let SamplerDeps {
        source,
        store,
        stats,
        mut shutdown_rx,
    } = deps;
    let interval = Duration::from_millis(config.interval_ms);
    let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs);
    let mut last_stats_log = Instant::now();

    loop {
        match sample_once(source.as_ref(), &store).await {
            Ok(summary) => {
                stats
                    .samples_written
                    .fetch_add(summary.samples_written as u64, Ordering::Relaxed);
                stats
                    .lines_skipped
                    .fetch_add(summary.lines_skipped as u64, Ordering::Relaxed);
            }
            Err(e) => {
                stats.source_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    error = %e,
                    operation = "fetch_lines",
                    "stats source failed; retrying next tick"
                );
            }
        }
        stats.passes.fetch_add(1, Ordering::Relaxed);

        if last_stats_log.elapsed() >= stats_log_interval {
            tracing::info!(
                passes = stats.passes.load(Ordering::Relaxed),
                samples_written = stats.samples_written.load(Ordering::Relaxed),
                lines_skipped = stats.lines_skipped.load(Ordering::Relaxed),
                source_failures = stats.source_failures.load(Ordering::Relaxed),
                series = store.len(),
                "app stats"
            );
            last_stats_log = Instant::now();
        }

        tokio::select! {
            _ = sleep(interval) => {}
            _ = &mut shutdown_rx => {
                tracing::debug!("Sampler shutting down");
                break;
            }
        }
    }
}
