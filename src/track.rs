//! Track storage: time-ordered trackpoints grouped into segments.
//!
//! A [`Track`] always holds at least one segment. Points are appended to the
//! last segment; [`Track::start_segment`] opens a new one after a recording
//! gap. Each [`Segment`] caches its path length so that
//! [`Track::segment_lengths`] never walks the points.
//!
//! # Example
//! ```
//! use track_heatmap::{Track, Trackpoint};
//!
//! let mut track = Track::new();
//! assert!(track.add_point(Trackpoint::new(46.0, 7.0, 1)));
//! assert!(track.add_point(Trackpoint::new(46.1, 7.0, 2)));
//! track.start_segment();
//! assert!(track.add_point(Trackpoint::new(46.2, 7.0, 10)));
//!
//! // Out of order points are rejected
//! assert!(!track.add_point(Trackpoint::new(46.3, 7.0, 10)));
//!
//! assert_eq!(track.segment_count(), 2);
//! assert_eq!(track.point_count(0), 2);
//! assert_eq!(track.point_count(1), 1);
//! ```

use log::{debug, warn};

use crate::error::{Result, TrackError};
use crate::geo_utils::haversine_distance;
use crate::Trackpoint;

/// One continuous recording interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    points: Vec<Trackpoint>,
    /// Sum of distances between consecutive points, in meters
    length: f64,
}

impl Segment {
    fn new() -> Self {
        Self::default()
    }

    /// Points in recording order.
    pub fn points(&self) -> &[Trackpoint] {
        &self.points
    }

    /// Cached path length in meters.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Trackpoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Trackpoint> {
        self.points.last()
    }

    /// Append without ordering checks. Only the distance to the previous
    /// last point is added to the cached length.
    fn push(&mut self, point: Trackpoint) -> Result<()> {
        self.points.try_reserve(1)?;
        if let Some(prev) = self.points.last() {
            self.length += haversine_distance(&prev.location(), &point.location());
        }
        self.points.push(point);
        Ok(())
    }
}

/// A recording session: an ordered list of segments.
///
/// Invariants:
/// - there is always at least one segment
/// - only the last segment can be empty
/// - timestamps strictly increase across the whole track
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    segments: Vec<Segment>,
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

impl Track {
    /// Create a track with one empty segment.
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::new()],
        }
    }

    /// Number of segments, including a trailing empty one.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of points in a segment, 0 if the index is out of range.
    pub fn point_count(&self, segment_index: usize) -> usize {
        self.segments
            .get(segment_index)
            .map(Segment::len)
            .unwrap_or(0)
    }

    /// Copy of a point, or `None` if either index is out of range.
    pub fn get_point(&self, segment_index: usize, point_index: usize) -> Option<Trackpoint> {
        self.segments
            .get(segment_index)
            .and_then(|s| s.points.get(point_index))
            .copied()
    }

    /// Cached length of every segment, in segment order.
    pub fn segment_lengths(&self) -> Vec<f64> {
        self.segments.iter().map(Segment::length).collect()
    }

    /// Sum of all segment lengths. Gaps between segments are not counted.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    pub fn total_points(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Segment::is_empty)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// All points in segment order, then point order.
    pub fn points(&self) -> impl Iterator<Item = &Trackpoint> {
        self.segments.iter().flat_map(|s| s.points.iter())
    }

    /// Most recent point of the track, looking back past an empty trailing
    /// segment.
    pub fn last_point(&self) -> Option<Trackpoint> {
        self.segments.iter().rev().find_map(|s| s.last()).copied()
    }

    /// Append a copy of `point` to the current segment.
    ///
    /// Returns false, leaving the track unchanged, if the point is not
    /// strictly after the last point, has unusable coordinates, or if
    /// storage could not grow.
    pub fn add_point(&mut self, point: Trackpoint) -> bool {
        match self.try_add_point(point) {
            Ok(()) => true,
            Err(TrackError::OutOfOrder { .. }) => false,
            Err(e) => {
                warn!("[Track] Point not added: {}", e);
                false
            }
        }
    }

    /// Append a copy of `point` to the current segment, reporting why it was
    /// rejected.
    pub fn try_add_point(&mut self, point: Trackpoint) -> Result<()> {
        if !point.has_valid_coordinates() {
            return Err(TrackError::InvalidCoordinates {
                latitude: point.latitude(),
                longitude: point.longitude(),
            });
        }
        if let Some(last) = self.last_point() {
            if point.timestamp() <= last.timestamp() {
                return Err(TrackError::OutOfOrder {
                    timestamp: point.timestamp(),
                    last_timestamp: last.timestamp(),
                });
            }
        }

        self.current_segment_mut().push(point)
    }

    /// Open a new segment for subsequent points. No effect if the current
    /// segment is empty.
    pub fn start_segment(&mut self) {
        if let Err(e) = self.try_start_segment() {
            warn!("[Track] Segment not started: {}", e);
        }
    }

    /// Open a new segment. Returns `Ok(false)` when the current segment is
    /// empty and nothing changed.
    pub fn try_start_segment(&mut self) -> Result<bool> {
        if self.current_segment().is_empty() {
            return Ok(false);
        }
        self.segments.try_reserve(1)?;
        self.segments.push(Segment::new());
        Ok(true)
    }

    /// Merge segments `[start, end)` into the segment at `start`.
    ///
    /// Invalid or single-segment ranges are ignored. See
    /// [`Track::try_merge_segments`].
    pub fn merge_segments(&mut self, start: usize, end: usize) {
        match self.try_merge_segments(start, end) {
            Ok(()) => {}
            Err(TrackError::InvalidRange { .. }) => {
                debug!("[Track] Ignoring merge of [{}, {})", start, end);
            }
            Err(e) => warn!("[Track] Segments not merged: {}", e),
        }
    }

    /// Merge segments `[start, end)` into the segment at `start`; later
    /// segments move down to fill the gap.
    ///
    /// The merged length is the sum of the merged lengths plus the distance
    /// across each junction. Ordering between the merged segments is not
    /// re-checked; callers must only merge segments that are already
    /// time-contiguous.
    ///
    /// A range of one segment is a successful no-op. `end == start`,
    /// `end < start`, `start >= segment_count()` and `end > segment_count()`
    /// are `InvalidRange`.
    pub fn try_merge_segments(&mut self, start: usize, end: usize) -> Result<()> {
        let segment_count = self.segments.len();
        if start >= segment_count || end <= start || end > segment_count {
            return Err(TrackError::InvalidRange {
                start,
                end,
                segment_count,
            });
        }
        if end == start + 1 {
            return Ok(());
        }

        let combined: usize = self.segments[start..end].iter().map(Segment::len).sum();
        let additional = combined - self.segments[start].len();

        // Reserve before touching anything so a failure leaves the track as is
        self.segments[start].points.try_reserve_exact(additional)?;

        for i in start + 1..end {
            let segment = std::mem::take(&mut self.segments[i]);
            let target = &mut self.segments[start];
            if let (Some(prev), Some(next)) = (target.last(), segment.first()) {
                target.length += haversine_distance(&prev.location(), &next.location());
            }
            target.length += segment.length;
            target.points.extend(segment.points);
        }
        self.segments.drain(start + 1..end);

        debug!(
            "[Track] Merged segments [{}, {}) into {} points",
            start, end, combined
        );
        Ok(())
    }

    fn current_segment(&self) -> &Segment {
        // `segments` is never empty
        &self.segments[self.segments.len() - 1]
    }

    fn current_segment_mut(&mut self) -> &mut Segment {
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }
}
