//! Screen geometry: viewport, rectangles and overlap tests
//!
//! Positions are in screen pixels with the origin at the top-left, except the
//! stacking board which measures `y` upward from the floor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Screen dimensions the games lay themselves out in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    /// Typical portrait phone screen
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Reject zero, negative or non-finite dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Convert a pixel position to a percentage of the screen
    pub fn px_to_percent(&self, px: Vec2) -> Vec2 {
        px / self.size() * 100.0
    }

    /// Convert a percentage of the screen back to pixels
    pub fn percent_to_px(&self, pct: Vec2) -> Vec2 {
        pct / 100.0 * self.size()
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// True if the interiors intersect (shared edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// True if `other` lies fully inside this rectangle (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        other.min.x >= self.min.x && other.min.y >= self.min.y && b_max.x <= a_max.x && b_max.y <= a_max.y
    }
}

/// Fraction of `size` shared by two equal-width spans starting at `a` and `b`
///
/// 1.0 means perfectly aligned, 0.0 or less means no overlap.
#[inline]
pub fn span_overlap_ratio(a: f32, b: f32, size: f32) -> f32 {
    (size - (a - b).abs()) / size
}

/// Uniform grid of placement cells, numbered row-major from the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
    pub cell_size: Vec2,
}

impl Grid {
    /// Split the viewport into `columns` x `rows` cells
    pub fn new(viewport: Viewport, columns: u32, rows: u32) -> Result<Self, ConfigError> {
        if columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        viewport.validate()?;
        Ok(Self {
            columns,
            rows,
            cell_size: Vec2::new(
                viewport.width / columns as f32,
                viewport.height / rows as f32,
            ),
        })
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Bounds of a cell by index
    pub fn cell_rect(&self, cell: usize) -> Rect {
        let col = (cell % self.columns as usize) as f32;
        let row = (cell / self.columns as usize) as f32;
        Rect::new(Vec2::new(col, row) * self.cell_size, self.cell_size)
    }

    /// Range of valid top-left offsets for an item of `item` size inside a cell
    ///
    /// Returns `(inset, span)` per axis: the item's left/top edge may sit
    /// anywhere in `[cell.min + inset, cell.min + inset + span]`. The inset is
    /// `padding`, shrunk when the cell cannot hold the item plus full padding,
    /// so the item never crosses its cell edge.
    pub fn placement_range(&self, item: Vec2, padding: f32) -> (Vec2, Vec2) {
        let slack = (self.cell_size - item).max(Vec2::ZERO);
        let inset = Vec2::splat(padding.max(0.0)).min(slack / 2.0);
        let span = (slack - inset * 2.0).max(Vec2::ZERO);
        (inset, span)
    }
}
