//! Placement and overflow resolution.
//!
//! New widgets walk forward cell by cell until their rectangle fits inside
//! the columns without overlapping another widget, appending rows when the
//! walk runs off the end. Moved widgets (drops, attribute changes) never
//! walk: they shrink to fit when their minimum size allows it and revert
//! otherwise.

use log::{debug, warn};

use super::cell::{Axis, CellRect};
use super::widget::{Origin, Widget, WidgetId, WidgetSpec};
use super::{Grid, GridChange, GridError, Placement, Removal};

/// Outcome of dropping, adopting or editing a widget that is already sized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Landed where requested at its own size
    Placed(CellRect),
    /// Landed where requested, shrunk to the available span
    Shrunk(CellRect),
    /// Snapped back to where it was before
    Reverted(CellRect),
    /// Came from an outside container and went back there
    Returned(Removal),
}

impl DropOutcome {
    /// Rectangle the widget occupies afterwards, if it is still on the grid.
    pub fn rect(&self) -> Option<CellRect> {
        match self {
            Self::Placed(rect) | Self::Shrunk(rect) | Self::Reverted(rect) => Some(*rect),
            Self::Returned(_) => None,
        }
    }
}

/// Hover feedback while dragging over a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropPreview {
    /// Dropping here would revert, even at minimum size
    pub would_revert: bool,
    /// `would_revert`, reported only when `check_revert` is enabled
    pub danger: bool,
}

enum Resolution {
    Fits(CellRect),
    Shrunk(CellRect),
    Revert,
}

impl Grid {
    /// Widgets whose rectangles overlap `rect`, in insertion order.
    pub fn collisions(&self, rect: CellRect, except: Option<WidgetId>) -> Vec<WidgetId> {
        self.widgets()
            .filter(|w| Some(w.id) != except && w.rect().overlaps(&rect))
            .map(|w| w.id)
            .collect()
    }

    /// First enabled cell in row-major order.
    pub fn first_open_cell(&self) -> Option<usize> {
        self.cells.iter().position(|cell| cell.enabled)
    }

    /// Take a widget dragged in from an outside container.
    ///
    /// Its pixel size is rounded up to whole cells. If it cannot fit at the
    /// drop cell even at minimum size it is handed back to `container`.
    pub fn adopt_widget(
        &mut self,
        spec: WidgetSpec,
        container: impl Into<String>,
        width_px: u32,
        height_px: u32,
        x: u32,
        y: u32,
    ) -> Result<DropOutcome, GridError> {
        self.ensure_built()?;
        let metrics = self.metrics();
        let origin = Origin::Adopted {
            container: container.into(),
            original_width_px: width_px,
            original_height_px: height_px,
        };
        let mut widget = WidgetSpec {
            width: Some(metrics.cols_for(width_px)),
            height: Some(metrics.rows_for(height_px)),
            ..spec
        }
        .build(&self.options, origin);
        widget.x = x;
        widget.y = y;

        let target = widget.rect();
        Ok(self.settle_moved(widget, target, target, true))
    }

    /// Drop a widget that is already on the grid at cell `(x, y)`.
    pub fn drop_widget(&mut self, id: WidgetId, x: u32, y: u32) -> Result<DropOutcome, GridError> {
        let widget = self.widgets.get(&id).cloned().ok_or(GridError::UnknownWidget(id))?;
        let previous = widget.rect();
        let target = CellRect::new(x, y, widget.width, widget.height);
        Ok(self.settle_moved(widget, target, previous, true))
    }

    /// Check a drop target without changing anything.
    ///
    /// The widget's minimum footprint at `(x, y)` must stay inside the
    /// columns and must not cover a cell taken by another widget.
    pub fn drop_preview(&self, id: WidgetId, x: u32, y: u32) -> Result<DropPreview, GridError> {
        let widget = self.widgets.get(&id).ok_or(GridError::UnknownWidget(id))?;
        let footprint = CellRect::new(x, y, widget.min_width, widget.min_height);
        let would_revert = x >= self.options.cols
            || self.options.cols - x < widget.min_width
            || !self.collisions(footprint, Some(id)).is_empty();
        Ok(DropPreview {
            would_revert,
            danger: would_revert && self.options.check_revert,
        })
    }

    pub(crate) fn ensure_built(&self) -> Result<(), GridError> {
        if self.built {
            Ok(())
        } else {
            Err(GridError::NotBuilt)
        }
    }

    pub(crate) fn place_new(&mut self, mut widget: Widget, position: Option<(u32, u32)>) -> Result<Placement, GridError> {
        self.ensure_built()?;
        let cols = self.options.cols;
        if widget.width > cols {
            if widget.min_width > cols {
                return Err(GridError::TooWide {
                    needed: widget.min_width,
                    cols,
                });
            }
            widget.width = cols;
        }

        if self.first_open_cell().is_none() {
            self.add_row(self.options.rows_needed_when_full());
        }

        let start = match position {
            Some((x, y)) => self.scan_from(x, y, self.options.next_axis)?,
            None => self.first_open_cell().ok_or(GridError::NoHostCell { x: 0, y: 0 })?,
        };

        let rect = self.walk_to_fit(start, widget.width, widget.height);
        widget.set_rect(rect);
        let id = widget.id;
        self.insert(widget);
        self.changes.push(GridChange::Placed {
            id,
            rect,
            animate: self.options.animate,
        });
        debug!("Placed widget {} at {:?}", id, rect);
        Ok(Placement { id, rect })
    }

    /// Resolve an explicit `(x, y)` to the index of an enabled cell.
    fn scan_from(&mut self, x: u32, y: u32, axis: Axis) -> Result<usize, GridError> {
        let cols = self.options.cols;
        if x >= cols {
            return Err(GridError::NoHostCell { x, y });
        }
        match axis {
            Axis::Y => {
                let mut row = y;
                loop {
                    self.ensure_rows(row + 1);
                    let index = (row * cols + x) as usize;
                    if self.cells[index].enabled {
                        return Ok(index);
                    }
                    row += 1;
                }
            }
            Axis::X => {
                self.ensure_rows(y + 1);
                let mut index = (y * cols + x) as usize;
                loop {
                    if index >= self.cells.len() {
                        self.add_row(1);
                    }
                    if self.cells[index].enabled {
                        return Ok(index);
                    }
                    index += 1;
                }
            }
        }
    }

    /// Walk forward from `start` until a `width x height` rectangle fits.
    ///
    /// Terminates because `width <= cols`: past the lowest widget every
    /// row has room at column 0.
    fn walk_to_fit(&mut self, start: usize, width: u32, height: u32) -> CellRect {
        let cols = self.options.cols;
        let mut index = start;
        loop {
            if index >= self.cells.len() {
                self.add_row(1);
            }
            let col = index as u32 % cols;
            let row = index as u32 / cols;
            let rect = CellRect::new(col, row, width, height);
            if rect.right() <= cols && self.collisions(rect, None).is_empty() {
                self.ensure_rows(rect.bottom());
                return rect;
            }
            index += 1;
        }
    }

    /// Commit a moved or adopted widget, or revert it.
    pub(crate) fn settle_moved(
        &mut self,
        mut widget: Widget,
        target: CellRect,
        previous: CellRect,
        is_drop: bool,
    ) -> DropOutcome {
        let id = widget.id;
        let resident = self.widgets.contains_key(&id);
        let (rect, shrunk) = match self.resolve_moved(&widget, target) {
            Resolution::Fits(rect) => (rect, false),
            Resolution::Shrunk(rect) => (rect, true),
            Resolution::Revert if is_drop && widget.is_adopted() => {
                warn!("Widget {} does not fit at {:?}, returning it to its container", id, target);
                if resident {
                    self.widgets.remove(&id);
                    self.order.retain(|other| *other != id);
                    self.sync_cells();
                }
                self.changes.push(GridChange::Reverted { id });
                return DropOutcome::Returned(Self::release(widget));
            }
            Resolution::Revert => {
                warn!("Widget {} does not fit at {:?}, reverting", id, target);
                self.changes.push(GridChange::Reverted { id });
                return DropOutcome::Reverted(previous);
            }
        };

        widget.set_rect(rect);
        self.insert(widget);
        let animate = self.options.animate;
        let change = if !resident {
            Some(GridChange::Placed { id, rect, animate })
        } else if rect == previous {
            None
        } else if (previous.x, previous.y) != (rect.x, rect.y) {
            Some(GridChange::Moved {
                id,
                from: previous,
                to: rect,
                animate,
            })
        } else {
            Some(GridChange::Resized {
                id,
                from: previous,
                to: rect,
                animate,
            })
        };
        self.changes.extend(change);

        if shrunk {
            DropOutcome::Shrunk(rect)
        } else {
            DropOutcome::Placed(rect)
        }
    }

    /// Shrink-or-revert resolution for a widget of known size.
    ///
    /// 1. Past the last column: shrink to the remaining span, or revert
    ///    when that span is under the minimum width.
    /// 2. Overlapping a widget: shrink along the axis where the collider
    ///    leaves the larger gap, or revert when neither axis can give up
    ///    enough room without going under the minimum.
    /// 3. Past the last row: append rows.
    fn resolve_moved(&mut self, widget: &Widget, mut rect: CellRect) -> Resolution {
        let cols = self.options.cols;
        if rect.x >= cols || cols - rect.x < widget.min_width {
            return Resolution::Revert;
        }

        let mut shrunk = false;
        if rect.right() > cols {
            rect.width = cols - rect.x;
            shrunk = true;
        }

        while let Some(other) = self.collisions(rect, Some(widget.id)).first().copied() {
            let Some(other) = self.widgets.get(&other).map(Widget::rect) else {
                break;
            };
            let x_gap = other.x.saturating_sub(rect.x);
            let y_gap = other.y.saturating_sub(rect.y);
            let can_x = other.x > rect.x && x_gap >= widget.min_width;
            let can_y = other.y > rect.y && y_gap >= widget.min_height;
            match (can_x, can_y) {
                (true, true) if x_gap > y_gap => rect.width = x_gap,
                (true, true) => rect.height = y_gap,
                (true, false) => rect.width = x_gap,
                (false, true) => rect.height = y_gap,
                (false, false) => return Resolution::Revert,
            }
            shrunk = true;
        }

        self.ensure_rows(rect.bottom());
        if shrunk {
            Resolution::Shrunk(rect)
        } else {
            Resolution::Fits(rect)
        }
    }
}
