// Shared test helpers

#![allow(dead_code)]

use docker_stats_exporter::error::SourceError;
use docker_stats_exporter::stats_source::StatsSource;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const LINE_C1: &str = r#"{"BlockIO":"13.5MB / 0B","CPUPerc":"1.50%","Container":"short_id","ID":"full_id","MemPerc":"0.02%","MemUsage":"9.809MiB / 32GiB","Name":"c1","NetIO":"0B / 0B","PIDs":"5"}"#;

pub fn stats_line(name: &str, cpu: &str, block_io: &str) -> String {
    format!(
        r#"{{"BlockIO":"{block_io}","CPUPerc":"{cpu}","Container":"id","ID":"id","MemPerc":"1.00%","MemUsage":"1MiB / 2GiB","Name":"{name}","NetIO":"1kB / 2kB","PIDs":"3"}}"#
    )
}

/// Replays queued batches; an exhausted queue repeats the last batch.
pub struct FakeSource {
    batches: Mutex<VecDeque<Option<Vec<String>>>>,
    last: Mutex<Option<Vec<String>>>,
    pub calls: AtomicUsize,
}

impl FakeSource {
    /// `None` entries make that call fail like a crashed docker CLI.
    pub fn new(batches: Vec<Option<Vec<String>>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StatsSource for FakeSource {
    async fn fetch_lines(&self) -> Result<Vec<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.batches.lock().unwrap().pop_front();
        let batch = match next {
            Some(batch) => {
                *self.last.lock().unwrap() = batch.clone();
                batch
            }
            None => self.last.lock().unwrap().clone(),
        };
        batch.ok_or_else(|| SourceError::Spawn {
            command: "fake".into(),
            source: std::io::Error::other("source down"),
        })
    }
}
