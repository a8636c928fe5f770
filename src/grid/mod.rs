//! Grid layout engine.
//!
//! A [`Grid`] is one independently configured zone: a row-major vector of
//! unit [`Cell`]s plus the [`Widget`]s placed on them. Widgets are kept
//! inside the column range and never overlap; rows grow on demand.
//!
//! # Operations
//!
//! * [`Grid::build`] materializes `rows x cols` cells
//! * [`Grid::add_widget`] places a new widget (first fit, or an explicit cell)
//! * [`Grid::adopt_widget`] / [`Grid::drop_widget`] reproduce drag and drop outcomes
//! * [`Grid::resize_widget`] grows or shrinks a widget, capped at its neighbours
//! * [`Grid::save_grid`] / [`Grid::restore`] persist placements

pub mod cell;
pub mod options;
pub mod persist;
pub mod placement;
pub mod resize;
pub mod widget;

use log::{debug, error, info};
use std::collections::HashMap;

pub use cell::{Axis, Cell, CellRect};
pub use options::{GridOptions, ZoneMetrics};
pub use persist::{SavedGrid, SavedWidget};
pub use placement::{DropOutcome, DropPreview};
pub use resize::ResizeLimits;
pub use widget::{Origin, Widget, WidgetAttr, WidgetId, WidgetSpec};

/// Errors reported by grid operations. None of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid has not been built")]
    NotBuilt,

    #[error("no host cell at column {x}, row {y}")]
    NoHostCell { x: u32, y: u32 },

    #[error("widget needs at least {needed} columns but the grid has {cols}")]
    TooWide { needed: u32, cols: u32 },

    #[error("widget {0} is not on this grid")]
    UnknownWidget(WidgetId),

    #[error("invalid grid options: {0}")]
    InvalidOptions(String),
}

/// Final position of a newly added widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: WidgetId,
    pub rect: CellRect,
}

/// What happened to a widget taken off the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The widget was created by the grid and is gone
    Deleted(WidgetId),
    /// The widget came from an outside container and goes back there
    /// with its pre-grid pixel size
    Returned {
        widget: Widget,
        container: String,
        width_px: u32,
        height_px: u32,
    },
}

/// Change notices drained by the owner of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridChange {
    Placed { id: WidgetId, rect: CellRect, animate: bool },
    Moved { id: WidgetId, from: CellRect, to: CellRect, animate: bool },
    Resized { id: WidgetId, from: CellRect, to: CellRect, animate: bool },
    Reverted { id: WidgetId },
    Removed { id: WidgetId },
    RowsAdded(u32),
    RowsRemoved(u32),
}

/// One grid zone.
#[derive(Debug, Clone)]
pub struct Grid {
    options: GridOptions,
    rows: u32,
    cells: Vec<Cell>,
    widgets: HashMap<WidgetId, Widget>,
    /// Insertion order, used by `save_grid` and scans
    order: Vec<WidgetId>,
    changes: Vec<GridChange>,
    built: bool,
}

impl Grid {
    /// Configure a zone. Call [`Grid::build`] before placing widgets.
    pub fn new(options: GridOptions) -> Result<Self, GridError> {
        options.validate()?;
        Ok(Self {
            rows: options.rows,
            options,
            cells: Vec::new(),
            widgets: HashMap::new(),
            order: Vec::new(),
            changes: Vec::new(),
            built: false,
        })
    }

    /// Configure and build in one step.
    pub fn with_options(options: GridOptions) -> Result<Self, GridError> {
        let mut grid = Self::new(options)?;
        grid.build();
        Ok(grid)
    }

    /// Materialize `rows x cols` cells. Rebuilding discards all widgets.
    pub fn build(&mut self) {
        self.widgets.clear();
        self.order.clear();
        self.cells.clear();
        self.rows = 0;
        self.push_rows(self.options.rows);
        self.built = true;
        let metrics = self.metrics();
        debug!(
            "Built grid {}x{} ({}x{} px)",
            self.options.cols, self.rows, metrics.inner_width, metrics.inner_height
        );
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn cols(&self) -> u32 {
        self.options.cols
    }

    /// Current row count, including rows added on demand.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn metrics(&self) -> ZoneMetrics {
        ZoneMetrics::compute(&self.options, self.rows)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<&Cell> {
        if col >= self.options.cols || row >= self.rows {
            return None;
        }
        self.cells.get((row * self.options.cols + col) as usize)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    /// Widgets in insertion order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.order.iter().filter_map(|id| self.widgets.get(id))
    }

    pub fn widget_count(&self) -> usize {
        self.order.len()
    }

    /// `true` for every covered cell, row-major, one `Vec` per row.
    pub fn occupancy(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.options.cols as usize)
            .map(|row| row.iter().map(|cell| !cell.enabled).collect())
            .collect()
    }

    pub fn toggle_gridlines(&mut self) -> bool {
        self.options.show_gridlines = !self.options.show_gridlines;
        self.options.show_gridlines
    }

    /// Take the change notices accumulated since the last call.
    pub fn drain_changes(&mut self) -> Vec<GridChange> {
        std::mem::take(&mut self.changes)
    }

    /// Place a new widget.
    ///
    /// Without an explicit position the first open cell (row-major) hosts
    /// it. With one, the cell is used unless covered, in which case the
    /// scan advances along `next_axis`, adding rows when it runs out.
    /// Overflow resolution then moves the widget forward until it fits
    /// inside the columns without overlapping anything.
    pub fn add_widget(&mut self, spec: WidgetSpec) -> Result<Placement, GridError> {
        let widget = spec.build(&self.options, Origin::Created);
        self.place_new(widget, spec.x.zip(spec.y)).inspect_err(|e| {
            error!("add_widget: {}", e);
        })
    }

    /// Take a widget off the grid, freeing its cells.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<Removal, GridError> {
        let widget = self.widgets.remove(&id).ok_or(GridError::UnknownWidget(id))?;
        self.order.retain(|other| *other != id);
        self.sync_cells();
        self.changes.push(GridChange::Removed { id });
        Ok(Self::release(widget))
    }

    /// Remove every widget and rebuild the cells.
    pub fn clear_grid(&mut self) -> Vec<Removal> {
        let removals = self
            .order
            .drain(..)
            .filter_map(|id| self.widgets.remove(&id))
            .map(Self::release)
            .collect();
        self.build();
        removals
    }

    /// Append `n` rows at the bottom.
    pub fn add_row(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        self.push_rows(n);
        self.sync_cells();
        self.changes.push(GridChange::RowsAdded(n));
    }

    /// Remove up to `n` rows from the bottom.
    ///
    /// Never goes below the committed row count, and a widget reaching into
    /// a removed row grows the grid back instead of being cut.
    pub fn remove_row(&mut self, n: u32) {
        let mut removed = 0;
        for _ in 0..n {
            if self.rows <= self.options.rows {
                break;
            }
            self.rows -= 1;
            self.cells.truncate((self.rows * self.options.cols) as usize);
            removed += 1;
        }
        if removed == 0 {
            return;
        }
        self.changes.push(GridChange::RowsRemoved(removed));

        let lowest = self.widgets.values().map(|w| w.rect().bottom()).max().unwrap_or(0);
        self.ensure_rows(lowest);
        self.sync_cells();
    }

    /// Set one attribute of a widget, in cells.
    ///
    /// The change is validated like a moved widget: it may shrink to fit,
    /// and reverts to the previous state when even the minimum size would
    /// not fit.
    pub fn move_or_resize(&mut self, id: WidgetId, attr: WidgetAttr, value: u32) -> Result<DropOutcome, GridError> {
        let current = self.widgets.get(&id).cloned().ok_or(GridError::UnknownWidget(id))?;
        let mut candidate = current.clone();
        match attr {
            WidgetAttr::X => candidate.x = value,
            WidgetAttr::Y => candidate.y = value,
            WidgetAttr::Width => candidate.width = candidate.clamp_width(value),
            WidgetAttr::Height => candidate.height = candidate.clamp_height(value),
            WidgetAttr::MinWidth => {
                candidate.min_width = value.max(1);
                candidate.width = candidate.clamp_width(candidate.width);
            }
            WidgetAttr::MinHeight => {
                candidate.min_height = value.max(1);
                candidate.height = candidate.clamp_height(candidate.height);
            }
            WidgetAttr::MaxWidth => {
                candidate.max_width = (value > 0).then_some(value);
                candidate.width = candidate.clamp_width(candidate.width);
            }
            WidgetAttr::MaxHeight => {
                candidate.max_height = (value > 0).then_some(value);
                candidate.height = candidate.clamp_height(candidate.height);
            }
        }

        let target = candidate.rect();
        Ok(self.settle_moved(candidate, target, current.rect(), false))
    }

    fn release(widget: Widget) -> Removal {
        match &widget.origin {
            Origin::Created => Removal::Deleted(widget.id),
            Origin::Adopted {
                container,
                original_width_px,
                original_height_px,
            } => Removal::Returned {
                container: container.clone(),
                width_px: *original_width_px,
                height_px: *original_height_px,
                widget,
            },
        }
    }

    fn insert(&mut self, widget: Widget) {
        if !self.widgets.contains_key(&widget.id) {
            self.order.push(widget.id);
        }
        self.widgets.insert(widget.id, widget);
        self.sync_cells();
    }

    fn push_rows(&mut self, n: u32) {
        let cols = self.options.cols;
        for row in self.rows..self.rows + n {
            for col in 0..cols {
                let index = self.cells.len();
                self.cells.push(Cell {
                    row,
                    col,
                    index,
                    enabled: true,
                });
            }
        }
        self.rows += n;
    }

    /// Grow until at least `bottom` rows exist.
    pub(crate) fn ensure_rows(&mut self, bottom: u32) {
        if bottom > self.rows {
            let needed = bottom - self.rows;
            info!("Growing grid by {} row(s) to fit a widget", needed);
            self.add_row(needed);
        }
    }

    /// Recompute enabled flags from the widget rectangles.
    fn sync_cells(&mut self) {
        let cols = self.options.cols;
        for cell in &mut self.cells {
            cell.enabled = true;
        }
        for widget in self.widgets.values() {
            for (col, row) in widget.rect().cells() {
                if col < cols && row < self.rows {
                    if let Some(cell) = self.cells.get_mut((row * cols + col) as usize) {
                        cell.enabled = false;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid() -> Grid {
        Grid::with_options(GridOptions {
            default_width: 1,
            default_height: 1,
            min_width: 1,
            min_height: 1,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_build_materializes_cells() {
        let grid = unit_grid();
        assert_eq!(grid.cells().len(), 36);
        assert_eq!(grid.cell(5, 5).map(|c| c.index), Some(35));
        assert!(grid.cells().iter().all(|c| c.enabled));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let result = Grid::new(GridOptions {
            cols: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(GridError::InvalidOptions(_))));
    }

    #[test]
    fn test_remove_row_keeps_committed_rows() {
        let mut grid = unit_grid();
        grid.add_row(2);
        assert_eq!(grid.rows(), 8);
        grid.remove_row(5);
        assert_eq!(grid.rows(), 6);
        assert_eq!(grid.cells().len(), 36);
    }

    #[test]
    fn test_remove_row_regrows_for_widgets() {
        let mut grid = unit_grid();
        grid.add_row(2);
        grid.add_widget(WidgetSpec::at(0, 7)).unwrap();
        grid.remove_row(1);
        assert_eq!(grid.rows(), 8);
        assert!(grid.occupancy()[7][0]);
    }

    #[test]
    fn test_remove_widget_frees_cells() {
        let mut grid = unit_grid();
        let placed = grid.add_widget(WidgetSpec::at(1, 1).sized(2, 2)).unwrap();
        assert!(!grid.cell(2, 2).unwrap().enabled);
        let removal = grid.remove_widget(placed.id).unwrap();
        assert_eq!(removal, Removal::Deleted(placed.id));
        assert!(grid.cells().iter().all(|c| c.enabled));
    }

    #[test]
    fn test_full_grid_grows_by_row_height_multiple() {
        let mut grid = Grid::with_options(GridOptions {
            default_width: 6,
            default_height: 1,
            min_width: 1,
            min_height: 1,
            row_height: 2,
            ..Default::default()
        })
        .unwrap();
        for _ in 0..6 {
            grid.add_widget(WidgetSpec::default()).unwrap();
        }
        assert_eq!(grid.rows(), 6);

        let placed = grid.add_widget(WidgetSpec::default()).unwrap();
        assert_eq!(grid.rows(), 8);
        assert_eq!(placed.rect, CellRect::new(0, 6, 6, 1));
    }

    #[test]
    fn test_drain_changes() {
        let mut grid = unit_grid();
        grid.add_widget(WidgetSpec::default()).unwrap();
        let changes = grid.drain_changes();
        assert!(matches!(changes.last(), Some(GridChange::Placed { animate: true, .. })));
        assert!(grid.drain_changes().is_empty());
    }
}
