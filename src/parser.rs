// Decode `docker stats` JSON lines and convert their fields to numbers.

use crate::error::SampleError;
use crate::models::{IoPair, MetricSample, RawSample, StatsRecord};
use crate::units::{UnitSystem, convert};

const PAIR_SEPARATOR: &str = " / ";

/// Decode one status line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<RawSample>, SampleError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let record: StatsRecord = serde_json::from_str(line)?;
    if record.name.trim().is_empty() {
        return Err(SampleError::EmptyName);
    }
    Ok(Some(RawSample {
        block_io: split_pair("BlockIO", &record.block_io)?,
        mem_usage: split_pair("MemUsage", &record.mem_usage)?,
        net_io: split_pair("NetIO", &record.net_io)?,
        cpu_perc: record.cpu_perc,
        mem_perc: record.mem_perc,
        name: record.name,
    }))
}

/// Split a composite field on `" / "`. Exactly one separator is required.
pub fn split_pair(field: &'static str, value: &str) -> Result<IoPair, SampleError> {
    let mut parts = value.split(PAIR_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok(IoPair {
            first: first.to_string(),
            second: second.to_string(),
        }),
        _ => Err(SampleError::BadPair {
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse `"1.50%"` as `1.5`. A missing `%` is tolerated.
pub fn parse_percent(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
    number.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert every field of a raw sample. Any failing field rejects the whole sample.
pub fn normalize(raw: &RawSample) -> Result<MetricSample, SampleError> {
    let bytes = |field: &'static str, token: &str, system: UnitSystem| {
        convert(token, system).map_err(|source| SampleError::UnitConversion {
            container: raw.name.clone(),
            field,
            source,
        })
    };
    let percent = |field: &'static str, value: &str| {
        parse_percent(value).ok_or_else(|| SampleError::InvalidPercent {
            container: raw.name.clone(),
            field,
            value: value.to_string(),
        })
    };

    Ok(MetricSample {
        name: raw.name.clone(),
        block_io_in_bytes: bytes("BlockIO", &raw.block_io.first, UnitSystem::Decimal)?,
        block_io_out_bytes: bytes("BlockIO", &raw.block_io.second, UnitSystem::Decimal)?,
        cpu_percent: percent("CPUPerc", &raw.cpu_perc)?,
        mem_percent: percent("MemPerc", &raw.mem_perc)?,
        mem_usage_bytes: bytes("MemUsage", &raw.mem_usage.first, UnitSystem::Binary)?,
        mem_limit_bytes: bytes("MemUsage", &raw.mem_usage.second, UnitSystem::Binary)?,
        net_io_in_bytes: bytes("NetIO", &raw.net_io.first, UnitSystem::Decimal)?,
        net_io_out_bytes: bytes("NetIO", &raw.net_io.second, UnitSystem::Decimal)?,
    })
}

/// `parse_line` followed by `normalize`.
pub fn parse_and_normalize(line: &str) -> Result<Option<MetricSample>, SampleError> {
    match parse_line(line)? {
        Some(raw) => normalize(&raw).map(Some),
        None => Ok(None),
    }
}
