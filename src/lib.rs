//! # Track Heatmap
//!
//! GPS track storage and point-density heatmaps.
//!
//! This library provides:
//! - Time-ordered track storage with segments and cached path lengths
//! - Heatmap binning over the narrowest longitude wedge, so tracks that
//!   cross the antimeridian stay compact
//! - A line-based text reader and a glyph renderer for the command-line tool
//!
//! ## Features
//!
//! - **`cli`** (default) - Build the `track-heatmap` binary
//!
//! ## Quick Start
//!
//! ```rust
//! use track_heatmap::{Track, Trackpoint};
//! use track_heatmap::heatmap::build_heatmap;
//! use track_heatmap::render::{render_to_string, RenderConfig};
//!
//! let mut track = Track::new();
//! track.add_point(Trackpoint::new(46.50, 6.60, 1));
//! track.add_point(Trackpoint::new(46.52, 6.63, 2));
//! track.start_segment();
//! track.add_point(Trackpoint::new(46.51, 6.61, 10));
//!
//! if let Some(grid) = build_heatmap(&track, 0.01, 0.01) {
//!     let text = render_to_string(&grid, &RenderConfig::default()).unwrap();
//!     println!("{}", text);
//! }
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackError};

// Geographic utilities (distance, longitude arithmetic)
pub mod geo_utils;

// Segmented track storage
pub mod track;
pub use track::{Segment, Track};

// Heatmap generation module
pub mod heatmap;
pub use heatmap::{
    build_heatmap, try_build_heatmap, HeatmapConfig, HeatmapGrid, LongitudeWedge,
};

// Text input and glyph output
pub mod input;
pub use input::{parse_track, read_track, ReadSummary};
pub mod render;
pub use render::{render_rows, render_to_string, RenderConfig};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use track_heatmap::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A timestamped GPS sample.
///
/// Trackpoints are immutable `Copy` values: a track stores its own copy and
/// hands out copies, never references into caller memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trackpoint {
    location: GpsPoint,
    /// Arbitrary unit, strictly increasing along a track
    timestamp: i64,
}

impl Trackpoint {
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            location: GpsPoint::new(latitude, longitude),
            timestamp,
        }
    }

    pub fn from_location(location: GpsPoint, timestamp: i64) -> Self {
        Self {
            location,
            timestamp,
        }
    }

    pub fn location(&self) -> GpsPoint {
        self.location
    }

    pub fn latitude(&self) -> f64 {
        self.location.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.location.longitude
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Finite coordinates with latitude in [-90, 90]. Longitude does not need
    /// to be normalized.
    pub fn has_valid_coordinates(&self) -> bool {
        let GpsPoint {
            latitude,
            longitude,
        } = self.location;
        latitude.is_finite() && longitude.is_finite() && (-90.0..=90.0).contains(&latitude)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trackpoint_accessors() {
        let p = Trackpoint::new(10.5, -20.25, 99);
        assert_eq!(p.latitude(), 10.5);
        assert_eq!(p.longitude(), -20.25);
        assert_eq!(p.timestamp(), 99);
        assert_eq!(p.location(), GpsPoint::new(10.5, -20.25));
        assert_eq!(Trackpoint::from_location(p.location(), 99), p);
    }

    #[test]
    fn test_trackpoint_coordinates() {
        assert!(Trackpoint::new(90.0, 540.0, 0).has_valid_coordinates());
        assert!(!Trackpoint::new(-90.1, 0.0, 0).has_valid_coordinates());
        assert!(!Trackpoint::new(0.0, f64::NAN, 0).has_valid_coordinates());
    }

    #[test]
    fn test_trackpoint_json() {
        let p = Trackpoint::new(1.0, 2.0, 3);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(
            json,
            r#"{"location":{"latitude":1.0,"longitude":2.0},"timestamp":3}"#
        );
        let back: Trackpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
