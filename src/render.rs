//! Glyph rendering of a heatmap grid.
//!
//! Each cell count maps to a glyph by bucket: `count / bucket_width` indexes
//! the glyph set, and counts past the end use the last glyph.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::heatmap::HeatmapGrid;

/// Glyph set and bucket width for text output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Glyphs from coldest to hottest. Default: `" .:-=+*#%@"`
    pub glyphs: String,
    /// Counts per glyph step. Default: 1
    pub bucket_width: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glyphs: " .:-=+*#%@".to_string(),
            bucket_width: 1,
        }
    }
}

impl RenderConfig {
    pub fn new(glyphs: impl Into<String>, bucket_width: u32) -> Self {
        Self {
            glyphs: glyphs.into(),
            bucket_width,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.glyphs.is_empty() {
            return Err(TrackError::ConfigError {
                message: "glyph set is empty".to_string(),
            });
        }
        if self.bucket_width == 0 {
            return Err(TrackError::ConfigError {
                message: "bucket width must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Render every row of `grid`, north first.
pub fn render_rows(grid: &HeatmapGrid, config: &RenderConfig) -> Result<Vec<String>> {
    config.validate()?;
    let glyphs: Vec<char> = config.glyphs.chars().collect();
    let hottest = glyphs.len() - 1;

    Ok(grid
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|&count| {
                    let bucket = (count / config.bucket_width) as usize;
                    glyphs[bucket.min(hottest)]
                })
                .collect()
        })
        .collect())
}

/// Render `grid` as newline-terminated rows.
pub fn render_to_string(grid: &HeatmapGrid, config: &RenderConfig) -> Result<String> {
    let rows = render_rows(grid, config)?;
    let mut out = String::with_capacity(rows.iter().map(|r| r.len() + 1).sum());
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    Ok(out)
}
