//! Unified error handling for the track-heatmap library.
//!
//! Every fallible operation has a `try_*` form returning [`Result`]. The
//! boolean/`Option` forms on [`Track`](crate::Track) and in
//! [`heatmap`](crate::heatmap) are thin wrappers that discard the reason.

use std::collections::TryReserveError;
use std::fmt;

/// Unified error type for track and heatmap operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// New point is not strictly after the last point of the track
    OutOfOrder {
        timestamp: i64,
        last_timestamp: i64,
    },
    /// Latitude outside [-90, 90] or a non-finite coordinate
    InvalidCoordinates { latitude: f64, longitude: f64 },
    /// Segment range passed to a merge is not usable
    InvalidRange {
        start: usize,
        end: usize,
        segment_count: usize,
    },
    /// Heatmap cell dimensions are non-positive, NaN, or exceed the globe
    InvalidCellSize { cell_width: f64, cell_height: f64 },
    /// Growing a buffer failed; the triggering mutation was not applied
    AllocationFailed { message: String },
    /// Input line could not be parsed as a trackpoint
    Parse { line: usize, message: String },
    /// Reading input or writing output failed
    Io { message: String },
    /// Configuration error
    ConfigError { message: String },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::OutOfOrder {
                timestamp,
                last_timestamp,
            } => {
                write!(
                    f,
                    "Trackpoint at {} is not after last trackpoint at {}",
                    timestamp, last_timestamp
                )
            }
            TrackError::InvalidCoordinates {
                latitude,
                longitude,
            } => {
                write!(f, "Invalid coordinates ({}, {})", latitude, longitude)
            }
            TrackError::InvalidRange {
                start,
                end,
                segment_count,
            } => {
                write!(
                    f,
                    "Segment range [{}, {}) is invalid for a track with {} segments",
                    start, end, segment_count
                )
            }
            TrackError::InvalidCellSize {
                cell_width,
                cell_height,
            } => {
                write!(
                    f,
                    "Cell size {}x{} is invalid (width must be in (0, 360], height in (0, 180])",
                    cell_width, cell_height
                )
            }
            TrackError::AllocationFailed { message } => {
                write!(f, "Allocation failed: {}", message)
            }
            TrackError::Parse { line, message } => {
                write!(f, "Parse error on line {}: {}", line, message)
            }
            TrackError::Io { message } => {
                write!(f, "I/O error: {}", message)
            }
            TrackError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for TrackError {}

impl From<TryReserveError> for TrackError {
    fn from(err: TryReserveError) -> Self {
        TrackError::AllocationFailed {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for TrackError {
    fn from(err: std::io::Error) -> Self {
        TrackError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias for track-heatmap operations.
pub type Result<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackError::OutOfOrder {
            timestamp: 5,
            last_timestamp: 7,
        };
        assert!(err.to_string().contains("at 5"));
        assert!(err.to_string().contains("at 7"));

        let err = TrackError::Parse {
            line: 3,
            message: "missing timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "Parse error on line 3: missing timestamp");
    }

    #[test]
    fn test_try_reserve_conversion() {
        let mut v: Vec<u64> = Vec::new();
        let err: TrackError = v.try_reserve(usize::MAX).unwrap_err().into();
        assert!(matches!(err, TrackError::AllocationFailed { .. }));
    }
}
