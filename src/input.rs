//! Line-based track input.
//!
//! Each non-blank line holds `latitude longitude timestamp` separated by
//! whitespace. A blank line marks a segment break.
//!
//! ```text
//! 46.5190 6.5668 1000
//! 46.5193 6.5671 1005
//!
//! 46.5201 6.5702 2000
//! ```

use std::io::BufRead;

use log::{debug, warn};

use crate::error::{Result, TrackError};
use crate::{Track, Trackpoint};

/// A track read from text, with counts of what happened along the way.
#[derive(Debug, Clone)]
pub struct ReadSummary {
    pub track: Track,
    /// Lines that parsed as trackpoints
    pub points_read: usize,
    /// Points the track refused (out of order or bad coordinates)
    pub rejected: usize,
    /// Blank lines seen
    pub segment_breaks: usize,
}

/// Read a track from `reader`.
///
/// Malformed lines stop reading with `TrackError::Parse`. Points rejected
/// by [`Track::try_add_point`] for ordering or coordinates are skipped and
/// counted in [`ReadSummary::rejected`].
pub fn read_track<R: BufRead>(reader: R) -> Result<ReadSummary> {
    let mut summary = ReadSummary {
        track: Track::new(),
        points_read: 0,
        rejected: 0,
        segment_breaks: 0,
    };

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        if line.trim().is_empty() {
            summary.segment_breaks += 1;
            summary.track.try_start_segment()?;
            continue;
        }

        let point = parse_trackpoint(&line, line_number)?;
        summary.points_read += 1;
        match summary.track.try_add_point(point) {
            Ok(()) => {}
            Err(e @ (TrackError::OutOfOrder { .. } | TrackError::InvalidCoordinates { .. })) => {
                warn!("[Input] Skipping line {}: {}", line_number, e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "[Input] Read {} points ({} rejected) in {} segments",
        summary.points_read,
        summary.rejected,
        summary.track.segment_count()
    );
    Ok(summary)
}

/// Read a track from an in-memory string.
pub fn parse_track(text: &str) -> Result<ReadSummary> {
    read_track(text.as_bytes())
}

fn parse_trackpoint(line: &str, line_number: usize) -> Result<Trackpoint> {
    let parse_error = |message: String| TrackError::Parse {
        line: line_number,
        message,
    };

    let mut fields = line.split_whitespace();
    let mut next_field = |name: &str| {
        fields
            .next()
            .ok_or_else(|| parse_error(format!("missing {}", name)))
    };

    let latitude = next_field("latitude")?;
    let longitude = next_field("longitude")?;
    let timestamp = next_field("timestamp")?;
    if let Some(extra) = fields.next() {
        return Err(parse_error(format!("unexpected field '{}'", extra)));
    }

    let latitude: f64 = latitude
        .parse()
        .map_err(|_| parse_error(format!("invalid latitude '{}'", latitude)))?;
    let longitude: f64 = longitude
        .parse()
        .map_err(|_| parse_error(format!("invalid longitude '{}'", longitude)))?;
    let timestamp: i64 = timestamp
        .parse()
        .map_err(|_| parse_error(format!("invalid timestamp '{}'", timestamp)))?;

    Ok(Trackpoint::new(latitude, longitude, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let summary = parse_track("1.0 2.0 10\n1.5 2.5 11\n\n3 4 20\n").unwrap();
        let track = &summary.track;
        assert_eq!(track.segment_count(), 2);
        assert_eq!(track.point_count(0), 2);
        assert_eq!(track.point_count(1), 1);
        assert_eq!(track.get_point(1, 0), Some(Trackpoint::new(3.0, 4.0, 20)));
        assert_eq!(summary.points_read, 3);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.segment_breaks, 1);
    }

    #[test]
    fn test_repeated_breaks_collapse() {
        let summary = parse_track("\n\n1 1 1\n\n  \n\n2 2 2\n\n").unwrap();
        assert_eq!(summary.segment_breaks, 6);
        // Trailing break leaves one empty segment at the end
        assert_eq!(summary.track.segment_count(), 3);
        assert_eq!(summary.track.point_count(2), 0);
    }

    #[test]
    fn test_out_of_order_lines_are_skipped() {
        let summary = parse_track("0 0 5\n0 1 5\n0 2 4\n0 3 6\n").unwrap();
        assert_eq!(summary.points_read, 4);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.track.point_count(0), 2);
    }

    #[test]
    fn test_invalid_coordinates_are_skipped() {
        let summary = parse_track("95 0 1\n45 0 2\n").unwrap();
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.track.total_points(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_track("1 2 3\n1 2\n").unwrap_err(),
            TrackError::Parse {
                line: 2,
                message: "missing timestamp".to_string()
            }
        );
        assert!(matches!(
            parse_track("north 2 3"),
            Err(TrackError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_track("1 2 3.5"),
            Err(TrackError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_track("1 2 3 4"),
            Err(TrackError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let summary = parse_track("").unwrap();
        assert!(summary.track.is_empty());
        assert_eq!(summary.track.segment_count(), 1);
    }
}
