// Container stats models: raw `docker stats` records and converted samples.

use serde::Deserialize;

/// One `docker stats --format "{{json .}}"` line as emitted by the CLI.
/// Extra keys (`Container`, `ID`, `PIDs`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatsRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "BlockIO")]
    pub block_io: String,
    #[serde(rename = "CPUPerc")]
    pub cpu_perc: String,
    #[serde(rename = "MemPerc")]
    pub mem_perc: String,
    #[serde(rename = "MemUsage")]
    pub mem_usage: String,
    #[serde(rename = "NetIO")]
    pub net_io: String,
}

/// Two readings of a composite field, e.g. `"13.5MB / 0B"` -> ("13.5MB", "0B").
/// `first` is in/used, `second` is out/limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoPair {
    pub first: String,
    pub second: String,
}

/// A decoded status line with composite fields already split. Values are still text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    pub name: String,
    pub block_io: IoPair,
    pub cpu_perc: String,
    pub mem_perc: String,
    pub mem_usage: IoPair,
    pub net_io: IoPair,
}

/// Fully converted reading for one container.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub block_io_in_bytes: u64,
    pub block_io_out_bytes: u64,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub mem_usage_bytes: u64,
    pub mem_limit_bytes: u64,
    pub net_io_in_bytes: u64,
    pub net_io_out_bytes: u64,
}

impl MetricSample {
    /// Each metric kind paired with its value, in `MetricKind::ALL` order.
    pub fn values(&self) -> [(MetricKind, f64); 8] {
        [
            (MetricKind::BlockIoIn, self.block_io_in_bytes as f64),
            (MetricKind::BlockIoOut, self.block_io_out_bytes as f64),
            (MetricKind::CpuPercent, self.cpu_percent),
            (MetricKind::MemPercent, self.mem_percent),
            (MetricKind::MemUsage, self.mem_usage_bytes as f64),
            (MetricKind::MemLimit, self.mem_limit_bytes as f64),
            (MetricKind::NetIoIn, self.net_io_in_bytes as f64),
            (MetricKind::NetIoOut, self.net_io_out_bytes as f64),
        ]
    }
}

/// The eight gauges exported per container. Ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    BlockIoIn,
    BlockIoOut,
    CpuPercent,
    MemPercent,
    MemUsage,
    MemLimit,
    NetIoIn,
    NetIoOut,
}

impl MetricKind {
    pub const ALL: [MetricKind; 8] = [
        MetricKind::BlockIoIn,
        MetricKind::BlockIoOut,
        MetricKind::CpuPercent,
        MetricKind::MemPercent,
        MetricKind::MemUsage,
        MetricKind::MemLimit,
        MetricKind::NetIoIn,
        MetricKind::NetIoOut,
    ];

    /// Exposition metric name.
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::BlockIoIn => "docker_block_io_in_bytes",
            MetricKind::BlockIoOut => "docker_block_io_out_bytes",
            MetricKind::CpuPercent => "docker_cpu_percentage",
            MetricKind::MemPercent => "docker_memory_percentage",
            MetricKind::MemUsage => "docker_memory_usage_bytes",
            MetricKind::MemLimit => "docker_memory_allowed_bytes",
            MetricKind::NetIoIn => "docker_net_io_in_bytes",
            MetricKind::NetIoOut => "docker_net_io_out_bytes",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            MetricKind::BlockIoIn => "Bytes read from block devices by the container",
            MetricKind::BlockIoOut => "Bytes written to block devices by the container",
            MetricKind::CpuPercent => "Container CPU usage as reported by docker stats",
            MetricKind::MemPercent => "Container memory usage as a percentage of its limit",
            MetricKind::MemUsage => "Container memory usage in bytes",
            MetricKind::MemLimit => "Memory available to the container in bytes",
            MetricKind::NetIoIn => "Bytes received by the container over the network",
            MetricKind::NetIoOut => "Bytes sent by the container over the network",
        }
    }
}
