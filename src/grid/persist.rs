//! Saving and restoring widget placements.

use serde::{Deserialize, Serialize};

use super::options::GridOptions;
use super::widget::WidgetSpec;
use super::{Grid, GridError};

/// One saved zone: enough to rebuild placement without re-running the
/// placement heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGrid {
    pub cols: u32,
    pub rows: u32,
    pub widgets: Vec<SavedWidget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWidget {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// 0 when unbounded
    pub max_width: u32,
    pub max_height: u32,
    pub inner_content: String,
}

impl From<&SavedWidget> for WidgetSpec {
    fn from(saved: &SavedWidget) -> Self {
        Self {
            x: Some(saved.x),
            y: Some(saved.y),
            width: Some(saved.width),
            height: Some(saved.height),
            min_width: Some(saved.min_width),
            min_height: Some(saved.min_height),
            max_width: Some(saved.max_width),
            max_height: Some(saved.max_height),
            content: saved.inner_content.clone(),
        }
    }
}

impl Grid {
    /// Snapshot every widget in insertion order.
    ///
    /// The result is a one-element sequence, the shape the layout editor
    /// stores.
    pub fn save_grid(&self) -> Vec<SavedGrid> {
        let widgets = self
            .widgets()
            .map(|w| SavedWidget {
                x: w.x,
                y: w.y,
                width: w.width,
                height: w.height,
                min_width: w.min_width,
                min_height: w.min_height,
                max_width: w.max_width.unwrap_or(0),
                max_height: w.max_height.unwrap_or(0),
                inner_content: w.content.clone(),
            })
            .collect();
        vec![SavedGrid {
            cols: self.options.cols,
            rows: self.options.rows,
            widgets,
        }]
    }

    /// Build a grid from a saved zone, re-adding each widget at its
    /// recorded position and size.
    pub fn restore(options: GridOptions, saved: &SavedGrid) -> Result<Self, GridError> {
        let mut grid = Self::with_options(GridOptions {
            cols: saved.cols,
            rows: saved.rows,
            ..options
        })?;
        for widget in &saved.widgets {
            grid.add_widget(WidgetSpec::from(widget))?;
        }
        grid.drain_changes();
        Ok(grid)
    }
}
