//! Error types.
//!
//! - `SeriesError` is what the library returns: one variant per failure kind,
//!   so callers can match on it.
//! - `AppError` is what the `fred` binary reports: a message plus the process
//!   exit code (2 = usage/config, 3 = not enough data, 4 = source/parse).

use thiserror::Error;

use crate::domain::Frequency;

/// Failures raised by fetching, parsing, constructing, or transforming a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// Network or upstream failure while retrieving a series.
    #[error("series {series_id} unavailable: {reason}")]
    SourceUnavailable { series_id: String, reason: String },

    /// Malformed header or data row in the source text.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The operation needs more observations than the series holds.
    #[error("{operation} needs at least {needed} observations, got {got}")]
    InsufficientLength {
        operation: &'static str,
        needed: usize,
        got: usize,
    },

    /// The operation has no rule for this frequency class.
    #[error("{operation} does not support {frequency} data")]
    UnsupportedFrequency {
        operation: &'static str,
        frequency: Frequency,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("dates and values differ in length: {dates} dates, {values} values")]
    DimensionMismatch { dates: usize, values: usize },

    #[error("dates are not sorted ascending at index {index}")]
    UnsortedDates { index: usize },

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("i/o error: {0}")]
    Io(String),
}

impl SeriesError {
    pub fn source_unavailable(series_id: &str, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            series_id: series_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SeriesError> for AppError {
    fn from(err: SeriesError) -> Self {
        let exit_code = match &err {
            SeriesError::SourceUnavailable { .. } | SeriesError::Parse { .. } => 4,
            SeriesError::InsufficientLength { .. } => 3,
            SeriesError::InvalidParameter(_) | SeriesError::InvalidDate(_) => 2,
            _ => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_errors_map_to_exit_codes() {
        let err: AppError = SeriesError::source_unavailable("GDP", "timeout").into();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "series GDP unavailable: timeout");

        let err: AppError = SeriesError::InsufficientLength {
            operation: "annual percent change",
            needed: 13,
            got: 5,
        }
        .into();
        assert_eq!(err.exit_code(), 3);

        let err: AppError = SeriesError::InvalidParameter("length must be > 0".into()).into();
        assert_eq!(err.exit_code(), 2);
    }
}
