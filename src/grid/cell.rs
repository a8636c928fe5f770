use serde::{Deserialize, Serialize};

/// Scan axis used when looking for an open cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// One unit cell of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    /// Row-major index into the zone
    pub index: usize,
    /// False while covered by a widget
    pub enabled: bool,
}

/// A rectangle of cells, `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &CellRect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Column spans intersect.
    pub fn shares_cols(&self, other: &CellRect) -> bool {
        self.x < other.right() && other.x < self.right()
    }

    /// Row spans intersect.
    pub fn shares_rows(&self, other: &CellRect) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.x && col < self.right() && row >= self.y && row < self.bottom()
    }

    /// Iterate every `(col, row)` inside the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.bottom()).flat_map(move |row| (self.x..self.right()).map(move |col| (col, row)))
    }
}
