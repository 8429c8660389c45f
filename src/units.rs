// Human-readable size tokens ("13.5MB", "9.809MiB") to byte counts.

use crate::error::ConversionError;

/// Which family of unit suffixes a token is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    /// kB/MB/GB/TB, base 1000. Docker uses these for block and network I/O.
    Decimal,
    /// kiB/MiB/GiB/TiB, base 1024. Docker uses these for memory.
    Binary,
}

const KB: u64 = 1000;
const KIB: u64 = 1024;

// Longest suffix first: "kB" must win over "B".
static DECIMAL_UNITS: &[(&str, u64)] = &[
    ("TB", KB * KB * KB * KB),
    ("GB", KB * KB * KB),
    ("MB", KB * KB),
    ("kB", KB),
    ("B", 1),
];

static BINARY_UNITS: &[(&str, u64)] = &[
    ("TiB", KIB * KIB * KIB * KIB),
    ("GiB", KIB * KIB * KIB),
    ("MiB", KIB * KIB),
    ("kiB", KIB),
    ("KiB", KIB),
    ("B", 1),
];

impl UnitSystem {
    fn units(self) -> &'static [(&'static str, u64)] {
        match self {
            UnitSystem::Decimal => DECIMAL_UNITS,
            UnitSystem::Binary => BINARY_UNITS,
        }
    }
}

/// Convert a token such as `"9.809MiB"` to a whole number of bytes.
///
/// The token is trimmed, the first matching suffix from the system's table is
/// stripped, and the remaining number is scaled and rounded half away from zero.
pub fn convert(token: &str, system: UnitSystem) -> Result<u64, ConversionError> {
    let trimmed = token.trim();
    let fail = |reason| ConversionError {
        token: token.to_string(),
        reason,
    };

    let (number, multiplier) = system
        .units()
        .iter()
        .find_map(|(suffix, mult)| trimmed.strip_suffix(suffix).map(|n| (n, *mult)))
        .ok_or_else(|| fail("unrecognized unit suffix"))?;

    if number.is_empty() {
        return Err(fail("missing numeric value"));
    }
    let value: f64 = number.parse().map_err(|_| fail("not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(fail("value must be finite and non-negative"));
    }

    let bytes = (value * multiplier as f64).round();
    if bytes > u64::MAX as f64 {
        return Err(fail("value out of range"));
    }
    Ok(bytes as u64)
}
