//! Grid zone options and derived pixel metrics.

use serde::{Deserialize, Serialize};

use super::cell::Axis;

/// Pixels added around the inner grid so the zone helper bar fits.
pub const ZONE_HELPER_HEIGHT: u32 = 55;
/// Bezel added to the zone width.
pub const ZONE_BEZEL_WIDTH: u32 = 15;

/// Options for one grid zone.
///
/// Every field has a default, so a partially specified TOML table or
/// `GridOptions { cols: 12, ..Default::default() }` inherits the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Columns across the grid
    pub cols: u32,
    /// Committed number of rows; `remove_row` never goes below this
    pub rows: u32,
    /// Keep the zone's pixel height fixed: rows added later shrink the row
    /// height instead of growing the zone
    pub fixed_grid: bool,
    /// Columns a widget spans on creation
    pub default_width: u32,
    /// Rows a widget spans on creation
    pub default_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Multiplier on `default_height` for the rows appended when a full
    /// grid grows; 1 appends exactly `default_height` rows
    pub row_height: u32,
    /// Widgets carry a nested container that accepts sub-widgets
    pub nested: bool,
    pub show_gridlines: bool,
    /// Flag placement and size changes for animation
    pub animate: bool,
    /// Axis walked from an explicit position when that cell is taken
    pub next_axis: Axis,
    /// Resize handles: any of n, e, s, w, ne, se, sw, nw, or "all"
    pub resize_handles: String,
    /// Flag drop targets that would revert because of minimum sizes
    pub check_revert: bool,
    /// Zone width in pixels
    pub zone_width: u32,
    /// Zone height in pixels
    pub zone_height: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            cols: 6,
            rows: 6,
            fixed_grid: false,
            default_height: 3,
            default_width: 3,
            min_height: 3,
            max_height: None,
            min_width: 3,
            max_width: None,
            row_height: 1,
            nested: true,
            show_gridlines: true,
            animate: true,
            next_axis: Axis::Y,
            resize_handles: "n".to_string(),
            check_revert: false,
            zone_width: 1200,
            zone_height: 1200,
        }
    }
}

impl GridOptions {
    /// Options used by the dashboard layout grid: a fine 22x22 grid of
    /// single-cell defaults.
    pub fn dashboard() -> Self {
        Self {
            cols: 22,
            rows: 22,
            default_height: 1,
            default_width: 1,
            min_width: 1,
            min_height: 1,
            ..Default::default()
        }
    }

    /// Whether a resize handle set lets the given dimension change.
    pub fn allows_resize(&self, axis: Axis) -> bool {
        let handles = self.resize_handles.to_ascii_lowercase();
        if handles.split(',').any(|h| h.trim() == "all") {
            return true;
        }
        handles.split(',').map(str::trim).any(|handle| match axis {
            Axis::X => handle.contains('e') || handle.contains('w'),
            Axis::Y => handle.contains('n') || handle.contains('s'),
        })
    }

    /// Rows to append when a grid has no enabled cell left.
    pub(crate) fn rows_needed_when_full(&self) -> u32 {
        if self.row_height > 1 {
            self.row_height * self.default_height
        } else {
            self.default_height
        }
        .max(1)
    }

    pub(crate) fn validate(&self) -> Result<(), super::GridError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(super::GridError::InvalidOptions(format!(
                "grid needs at least one column and one row, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.min_width > self.cols {
            return Err(super::GridError::InvalidOptions(format!(
                "min_width {} exceeds column count {}",
                self.min_width, self.cols
            )));
        }
        Ok(())
    }
}

/// Pixel geometry derived from the options and current row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneMetrics {
    pub col_width: u32,
    pub row_height: u32,
    pub inner_width: u32,
    pub inner_height: u32,
    pub outer_width: u32,
    pub outer_height: u32,
}

impl ZoneMetrics {
    pub fn compute(options: &GridOptions, rows: u32) -> Self {
        let col_width = options.zone_width / options.cols.max(1);
        let row_basis = if options.fixed_grid { rows } else { options.rows };
        let row_height = options.zone_height / row_basis.max(1);
        let inner_width = col_width * options.cols;
        let inner_height = row_height * rows;
        Self {
            col_width,
            row_height,
            inner_width,
            inner_height,
            outer_width: inner_width + ZONE_BEZEL_WIDTH,
            outer_height: inner_height + ZONE_HELPER_HEIGHT,
        }
    }

    /// Whole cells needed to hold `px` pixels across.
    pub fn cols_for(&self, px: u32) -> u32 {
        px.div_ceil(self.col_width.max(1))
    }

    /// Whole cells needed to hold `px` pixels down.
    pub fn rows_for(&self, px: u32) -> u32 {
        px.div_ceil(self.row_height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_follow_plugin_defaults() {
        let options = GridOptions::default();
        assert_eq!(options.cols, 6);
        assert_eq!(options.rows, 6);
        assert_eq!(options.default_width, 3);
        assert_eq!(options.min_height, 3);
        assert_eq!(options.next_axis, Axis::Y);
        assert!(options.max_width.is_none());
    }

    #[test]
    fn test_partial_options_inherit_defaults() {
        let options: GridOptions = toml::from_str("cols = 12\ncheck_revert = true").unwrap();
        assert_eq!(options.cols, 12);
        assert!(options.check_revert);
        assert_eq!(options.rows, 6);
        assert!(options.animate);
    }

    #[test]
    fn test_metrics_fit_zone_exactly() {
        let options = GridOptions {
            zone_width: 605,
            zone_height: 300,
            ..Default::default()
        };
        let metrics = ZoneMetrics::compute(&options, 8);
        assert_eq!(metrics.col_width, 100);
        assert_eq!(metrics.row_height, 50);
        assert_eq!(metrics.inner_width, 600);
        assert_eq!(metrics.inner_height, 400);
        assert_eq!(metrics.outer_height, 400 + ZONE_HELPER_HEIGHT);
        assert_eq!(metrics.cols_for(150), 2);
    }

    #[test]
    fn test_fixed_grid_keeps_zone_height() {
        let options = GridOptions {
            fixed_grid: true,
            zone_width: 600,
            zone_height: 600,
            ..Default::default()
        };
        let metrics = ZoneMetrics::compute(&options, 12);
        assert_eq!(metrics.row_height, 50);
        assert_eq!(metrics.inner_height, 600);
    }

    #[test]
    fn test_resize_handles() {
        let mut options = GridOptions::default();
        assert!(options.allows_resize(Axis::Y));
        assert!(!options.allows_resize(Axis::X));

        options.resize_handles = "se".to_string();
        assert!(options.allows_resize(Axis::X));
        assert!(options.allows_resize(Axis::Y));

        options.resize_handles = "all".to_string();
        assert!(options.allows_resize(Axis::X));
    }
}
