//! Heatmap generation from a complete track.
//!
//! The grid is anchored at the northernmost trackpoint latitude and at the
//! western edge of the narrowest longitude wedge containing every point, so
//! tracks that straddle the antimeridian produce a compact grid instead of
//! one spanning nearly the whole globe.
//!
//! Points on the southern or eastern border of the bounding box are counted
//! in the last row/column; the grid never grows an extra row or column for
//! them.
//!
//! # Example
//! ```
//! use track_heatmap::{Track, Trackpoint};
//! use track_heatmap::heatmap::build_heatmap;
//!
//! let mut track = Track::new();
//! track.add_point(Trackpoint::new(10.0, 170.0, 1));
//! track.add_point(Trackpoint::new(0.0, -170.0, 2));
//!
//! let grid = build_heatmap(&track, 30.0, 10.0).unwrap();
//! assert_eq!(grid.west_bound(), 170.0);
//! assert_eq!((grid.rows(), grid.cols()), (1, 1));
//! assert_eq!(grid.get(0, 0), Some(2));
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::geo_utils::{eastward_distance, normalize_longitude};
use crate::{GpsPoint, Track};

/// Cell dimensions for heatmap generation, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Degrees of longitude per column, in (0, 360]. Default: 1.0
    pub cell_width: f64,
    /// Degrees of latitude per row, in (0, 180]. Default: 1.0
    pub cell_height: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            cell_width: 1.0,
            cell_height: 1.0,
        }
    }
}

impl HeatmapConfig {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Check both dimensions are positive and fit on the globe. NaN fails.
    pub fn validate(&self) -> Result<()> {
        let width_ok = self.cell_width > 0.0 && self.cell_width <= 360.0;
        let height_ok = self.cell_height > 0.0 && self.cell_height <= 180.0;
        if width_ok && height_ok {
            Ok(())
        } else {
            Err(TrackError::InvalidCellSize {
                cell_width: self.cell_width,
                cell_height: self.cell_height,
            })
        }
    }
}

/// Narrowest arc of longitude containing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongitudeWedge {
    /// Western edge, normalized to [-180, 180)
    pub west_bound: f64,
    /// Degrees from the western edge eastward to the last point, in [0, 360)
    pub width: f64,
}

impl LongitudeWedge {
    /// Find the wedge for the given longitudes. The slice is normalized to
    /// [-180, 180) and sorted in place.
    ///
    /// A wedge starting at some longitude must reach east as far as the
    /// point just west of it, so after sorting each distinct longitude is
    /// one candidate and its width is the eastward distance to its sorted
    /// predecessor. The lowest longitude instead reaches the highest. The
    /// narrowest candidate wins; ties go to the lowest western edge. A
    /// single distinct longitude gives a zero-width wedge at that longitude.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_longitudes(longitudes: &mut [f64]) -> Option<Self> {
        for lon in longitudes.iter_mut() {
            *lon = normalize_longitude(*lon);
        }
        longitudes.sort_by(|a, b| a.total_cmp(b));

        let first = *longitudes.first()?;
        let last = *longitudes.last()?;

        let mut best = Self {
            west_bound: first,
            width: eastward_distance(first, last),
        };
        for pair in longitudes.windows(2) {
            let (predecessor, candidate) = (pair[0], pair[1]);
            // Duplicates
            if candidate == predecessor {
                continue;
            }
            let width = eastward_distance(candidate, predecessor);
            if width < best.width {
                best = Self {
                    west_bound: candidate,
                    width,
                };
            }
        }

        Some(best)
    }

    /// Degrees east of the western edge, in [0, 360).
    pub fn offset_of(&self, longitude: f64) -> f64 {
        eastward_distance(self.west_bound, normalize_longitude(longitude))
    }

    /// Eastern edge, normalized to [-180, 180).
    pub fn east_bound(&self) -> f64 {
        normalize_longitude(self.west_bound + self.width)
    }
}

/// Per-cell trackpoint counts, row-major, row 0 northernmost and column 0
/// westernmost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    rows: usize,
    cols: usize,
    north_bound: f64,
    west_bound: f64,
    /// Angular width of the longitude wedge the columns cover
    wedge_width: f64,
    cell_width: f64,
    cell_height: f64,
    counts: Vec<u32>,
}

impl HeatmapGrid {
    /// 1x1 grid holding a single zero, used for tracks without points.
    fn empty(config: &HeatmapConfig) -> Self {
        Self {
            rows: 1,
            cols: 1,
            north_bound: 0.0,
            west_bound: 0.0,
            wedge_width: 0.0,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            counts: vec![0],
        }
    }

    fn zeroed(
        rows: usize,
        cols: usize,
        north_bound: f64,
        wedge: LongitudeWedge,
        config: &HeatmapConfig,
    ) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| TrackError::AllocationFailed {
                message: format!("{}x{} grid overflows", rows, cols),
            })?;
        let mut counts = Vec::new();
        counts.try_reserve_exact(len)?;
        counts.resize(len, 0);

        Ok(Self {
            rows,
            cols,
            north_bound,
            west_bound: wedge.west_bound,
            wedge_width: wedge.width,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            counts,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn north_bound(&self) -> f64 {
        self.north_bound
    }

    pub fn west_bound(&self) -> f64 {
        self.west_bound
    }

    pub fn wedge_width(&self) -> f64 {
        self.wedge_width
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Count at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.rows && col < self.cols {
            Some(self.counts[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[u32]> {
        if row < self.rows {
            Some(&self.counts[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    /// Rows from north to south.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> {
        self.counts.chunks(self.cols)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Longitude wedge the columns cover.
    pub fn wedge(&self) -> LongitudeWedge {
        LongitudeWedge {
            west_bound: self.west_bound,
            width: self.wedge_width,
        }
    }

    /// Cell a location falls into. Locations on the south or east border
    /// land in the last row or column; locations outside the grid are
    /// clamped to the nearest edge cell.
    pub fn cell_of(&self, location: &GpsPoint) -> (usize, usize) {
        let row = ((self.north_bound - location.latitude) / self.cell_height).floor();
        let col = (self.wedge().offset_of(location.longitude) / self.cell_width).floor();
        (clamp_index(row, self.rows), clamp_index(col, self.cols))
    }

    fn increment(&mut self, row: usize, col: usize) {
        let cell = &mut self.counts[row * self.cols + col];
        *cell = cell.saturating_add(1);
    }
}

/// Build the heatmap of `track` with the given cell size in degrees.
///
/// Returns `None` if the cell size is invalid or the grid could not be
/// allocated. A track without points gives a 1x1 grid holding 0.
pub fn build_heatmap(track: &Track, cell_width: f64, cell_height: f64) -> Option<HeatmapGrid> {
    match try_build_heatmap(track, &HeatmapConfig::new(cell_width, cell_height)) {
        Ok(grid) => Some(grid),
        Err(e) => {
            warn!("[Heatmap] Not built: {}", e);
            None
        }
    }
}

/// Build the heatmap of `track`, reporting why it could not be built.
pub fn try_build_heatmap(track: &Track, config: &HeatmapConfig) -> Result<HeatmapGrid> {
    config.validate()?;

    let mut locations: Vec<GpsPoint> = Vec::new();
    locations.try_reserve_exact(track.total_points())?;
    locations.extend(track.points().map(|p| p.location()));

    let mut longitudes: Vec<f64> = Vec::new();
    longitudes.try_reserve_exact(locations.len())?;
    longitudes.extend(locations.iter().map(|p| p.longitude));

    let Some(wedge) = LongitudeWedge::from_longitudes(&mut longitudes) else {
        debug!("[Heatmap] Track has no points, returning 1x1 grid");
        return Ok(HeatmapGrid::empty(config));
    };

    let (south_bound, north_bound) = locations.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(south, north), p| (south.min(p.latitude), north.max(p.latitude)),
    );

    debug!(
        "[Heatmap] Bounds: north={} south={} west={} east={} wedge={}",
        north_bound,
        south_bound,
        wedge.west_bound,
        wedge.east_bound(),
        wedge.width
    );

    let rows = cells_spanning(north_bound - south_bound, config.cell_height);
    let cols = cells_spanning(wedge.width, config.cell_width);
    let mut grid = HeatmapGrid::zeroed(rows, cols, north_bound, wedge, config)?;

    for location in &locations {
        let (row, col) = grid.cell_of(location);
        grid.increment(row, col);
    }

    info!(
        "[Heatmap] Binned {} points into {}x{} grid",
        locations.len(),
        rows,
        cols
    );
    Ok(grid)
}

/// Number of cells of size `cell` needed to cover `extent`, at least one.
fn cells_spanning(extent: f64, cell: f64) -> usize {
    ((extent / cell).ceil() as usize).max(1)
}

fn clamp_index(value: f64, len: usize) -> usize {
    (value.max(0.0) as usize).min(len - 1)
}
