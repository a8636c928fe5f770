//! Collision-capped resizing.
//!
//! While a widget is resized, each growing edge stops at the first
//! neighbouring widget in its path. The cap is a dynamic max size that is
//! recomputed on every step, so it lifts again as soon as the neighbour no
//! longer lines up with the edge.

use log::debug;

use super::cell::{Axis, CellRect};
use super::widget::{Widget, WidgetId};
use super::{Grid, GridChange, GridError};

/// Live maximum size of a widget given its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeLimits {
    pub max_width: u32,
    pub max_height: Option<u32>,
}

impl Grid {
    /// Current resize caps for a widget.
    pub fn resize_limits(&self, id: WidgetId) -> Result<ResizeLimits, GridError> {
        let widget = self.widgets.get(&id).ok_or(GridError::UnknownWidget(id))?;
        let rect = widget.rect();
        Ok(ResizeLimits {
            max_width: self.width_cap(widget, rect),
            max_height: self.height_cap(widget, rect),
        })
    }

    /// Resize a widget to `width x height` cells, anchored at its top-left.
    ///
    /// Dimensions outside the allowed resize handles stay unchanged; both
    /// are clamped to the widget's min/max and to the neighbour caps.
    pub fn resize_widget(&mut self, id: WidgetId, width: u32, height: u32) -> Result<CellRect, GridError> {
        let widget = self.widgets.get(&id).cloned().ok_or(GridError::UnknownWidget(id))?;
        let from = widget.rect();

        let width = if self.options.allows_resize(Axis::X) {
            widget.clamp_width(width).min(self.width_cap(&widget, from))
        } else {
            from.width
        };

        // The height cap is measured against the new width so a widget that
        // just grew sideways cannot slide down into a neighbour's corner.
        let widened = CellRect { width, ..from };
        let height = if self.options.allows_resize(Axis::Y) {
            let height = widget.clamp_height(height);
            match self.height_cap(&widget, widened) {
                Some(cap) => height.min(cap),
                None => height,
            }
        } else {
            from.height
        };

        let to = CellRect { width, height, ..from };
        if to == from {
            return Ok(to);
        }

        self.ensure_rows(to.bottom());
        if let Some(stored) = self.widgets.get_mut(&id) {
            stored.set_rect(to);
        }
        self.sync_cells();
        self.changes.push(GridChange::Resized {
            id,
            from,
            to,
            animate: self.options.animate,
        });
        debug!("Resized widget {} from {:?} to {:?}", id, from, to);
        Ok(to)
    }

    /// Columns available to the right edge: up to the grid edge, the
    /// widget's max width, or the nearest widget sharing a row.
    fn width_cap(&self, widget: &Widget, rect: CellRect) -> u32 {
        let grid_cap = self.options.cols.saturating_sub(rect.x);
        let neighbour_cap = self
            .widgets()
            .filter(|other| other.id != widget.id)
            .map(Widget::rect)
            .filter(|other| other.shares_rows(&rect) && other.x >= rect.right())
            .map(|other| other.x - rect.x)
            .min()
            .unwrap_or(grid_cap);
        let cap = grid_cap.min(neighbour_cap);
        match widget.max_width {
            Some(max) => cap.min(max),
            None => cap,
        }
        .max(rect.width)
    }

    /// Rows available to the bottom edge. Rows grow on demand, so without a
    /// neighbour below or a max height there is no cap.
    fn height_cap(&self, widget: &Widget, rect: CellRect) -> Option<u32> {
        let neighbour_cap = self
            .widgets()
            .filter(|other| other.id != widget.id)
            .map(Widget::rect)
            .filter(|other| other.shares_cols(&rect) && other.y >= rect.y)
            .map(|other| other.y - rect.y)
            .min();
        let cap = match (neighbour_cap, widget.max_height) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        cap.map(|cap| cap.max(widget.min_height))
    }
}
