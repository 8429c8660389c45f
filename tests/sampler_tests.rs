// Sampler tests with a scripted stats source

mod common;

use common::{FakeSource, LINE_C1, stats_line};
use docker_stats_exporter::metrics_store::MetricsStore;
use docker_stats_exporter::models::MetricKind;
use docker_stats_exporter::sampler::{
    PassSummary, SamplerConfig, SamplerDeps, SamplerStats, sample_once, spawn,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn value(store: &MetricsStore, kind: MetricKind, name: &str) -> Option<f64> {
    store
        .snapshot()
        .into_iter()
        .find(|e| e.kind == kind && e.container_name == name)
        .map(|e| e.value)
}

#[tokio::test]
async fn sample_once_writes_eight_gauges_per_container() {
    let source = FakeSource::new(vec![Some(vec![
        LINE_C1.to_string(),
        stats_line("c2", "3.00%", "1kB / 2kB"),
    ])]);
    let store = MetricsStore::new();
    let summary = sample_once(&source, &store).await.unwrap();
    assert_eq!(
        summary,
        PassSummary {
            samples_written: 2,
            lines_skipped: 0
        }
    );
    assert_eq!(store.len(), 16);
    assert_eq!(value(&store, MetricKind::BlockIoIn, "c1"), Some(13_500_000.0));
    assert_eq!(value(&store, MetricKind::MemUsage, "c1"), Some(10_285_482.0));
    assert_eq!(value(&store, MetricKind::MemLimit, "c1"), Some(34_359_738_368.0));
    assert_eq!(value(&store, MetricKind::CpuPercent, "c2"), Some(3.0));
    assert_eq!(value(&store, MetricKind::BlockIoOut, "c2"), Some(2000.0));
    assert_eq!(value(&store, MetricKind::NetIoIn, "c2"), Some(1000.0));
}

#[tokio::test]
async fn blank_lines_are_ignored() {
    let source = FakeSource::new(vec![Some(vec![
        String::new(),
        LINE_C1.to_string(),
        "   ".to_string(),
    ])]);
    let store = MetricsStore::new();
    let summary = sample_once(&source, &store).await.unwrap();
    assert_eq!(summary.samples_written, 1);
    assert_eq!(summary.lines_skipped, 0);
}

#[tokio::test]
async fn malformed_lines_do_not_stop_the_batch() {
    let source = FakeSource::new(vec![Some(vec![
        "{not json".to_string(),
        stats_line("bad-pair", "1.00%", "13.5MB"),
        stats_line("too-many", "1.00%", "1B / 2B / 3B"),
        LINE_C1.to_string(),
    ])]);
    let store = MetricsStore::new();
    let summary = sample_once(&source, &store).await.unwrap();
    assert_eq!(summary.samples_written, 1);
    assert_eq!(summary.lines_skipped, 3);
    assert_eq!(store.len(), 8);
    assert!(value(&store, MetricKind::CpuPercent, "bad-pair").is_none());
}

#[tokio::test]
async fn unconvertible_sample_keeps_previous_values() {
    let source = FakeSource::new(vec![
        Some(vec![stats_line("c2", "2.00%", "1kB / 2kB")]),
        Some(vec![stats_line("c2", "9.00%", "1XB / 2kB")]),
    ]);
    let store = MetricsStore::new();
    sample_once(&source, &store).await.unwrap();
    let summary = sample_once(&source, &store).await.unwrap();
    assert_eq!(summary.lines_skipped, 1);
    // Whole sample skipped: even the valid CPU reading is not applied.
    assert_eq!(value(&store, MetricKind::CpuPercent, "c2"), Some(2.0));
    assert_eq!(value(&store, MetricKind::BlockIoIn, "c2"), Some(1000.0));
}

#[tokio::test]
async fn source_failure_is_reported() {
    let source = FakeSource::new(vec![None]);
    let store = MetricsStore::new();
    assert!(sample_once(&source, &store).await.is_err());
    assert!(store.is_empty());
}

#[tokio::test]
async fn vanished_container_stays_exposed() {
    let source = FakeSource::new(vec![
        Some(vec![LINE_C1.to_string()]),
        Some(vec![stats_line("c2", "1.00%", "0B / 0B")]),
    ]);
    let store = MetricsStore::new();
    sample_once(&source, &store).await.unwrap();
    sample_once(&source, &store).await.unwrap();
    assert_eq!(value(&store, MetricKind::CpuPercent, "c1"), Some(1.5));
    assert_eq!(store.len(), 16);
}

#[tokio::test(start_paused = true)]
async fn spawned_sampler_retries_after_source_failure_and_shuts_down() {
    let source = Arc::new(FakeSource::new(vec![
        None,
        Some(vec![LINE_C1.to_string()]),
    ]));
    let store = Arc::new(MetricsStore::new());
    let stats = Arc::new(SamplerStats::default());
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        SamplerDeps {
            source: source.clone(),
            store: store.clone(),
            stats: stats.clone(),
            shutdown_rx,
        },
        SamplerConfig {
            interval_ms: 1000,
            stats_log_interval_secs: 3600,
        },
    );

    tokio::time::sleep(tokio::time::Duration::from_millis(2500)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    assert_eq!(source.calls(), 3);
    assert_eq!(stats.passes.load(Ordering::Relaxed), 3);
    assert_eq!(stats.source_failures.load(Ordering::Relaxed), 1);
    assert_eq!(stats.samples_written.load(Ordering::Relaxed), 2);
    assert_eq!(value(&store, MetricKind::MemPercent, "c1"), Some(0.02));
}

#[tokio::test(start_paused = true)]
async fn dropping_shutdown_sender_stops_sampler() {
    let source = Arc::new(FakeSource::new(vec![Some(vec![LINE_C1.to_string()])]));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = spawn(
        SamplerDeps {
            source: source.clone(),
            store: Arc::new(MetricsStore::new()),
            stats: Arc::new(SamplerStats::default()),
            shutdown_rx,
        },
        SamplerConfig {
            interval_ms: 60_000,
            stats_log_interval_secs: 3600,
        },
    );
    tokio::task::yield_now().await;
    drop(shutdown_tx);
    handle.await.unwrap();
    assert_eq!(source.calls(), 1);
}
