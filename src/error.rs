// Error taxonomy for sampling: source failures, malformed records, unit conversion.

use thiserror::Error;

/// A size token that could not be turned into a byte count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{token}' to bytes: {reason}")]
pub struct ConversionError {
    pub token: String,
    pub reason: &'static str,
}

/// Why a single status line was rejected. The line is skipped, the batch continues.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed record: empty container name")]
    EmptyName,

    #[error("malformed record: field {field} = '{value}' is not a single ' / ' separated pair")]
    BadPair { field: &'static str, value: String },

    #[error("container {container}: field {field}: {source}")]
    UnitConversion {
        container: String,
        field: &'static str,
        #[source]
        source: ConversionError,
    },

    #[error("container {container}: field {field}: invalid percentage '{value}'")]
    InvalidPercent {
        container: String,
        field: &'static str,
        value: String,
    },
}

impl SampleError {
    /// True for structural failures (decode or pair splitting), false for value conversion.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            SampleError::Json(_) | SampleError::EmptyName | SampleError::BadPair { .. }
        )
    }
}

/// The stats source could not produce a batch this tick.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    Exit {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{command} produced non-UTF-8 output")]
    Encoding { command: String },
}
