use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::cell::CellRect;
use super::options::GridOptions;

/// Stable identity of a widget placed on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a widget came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Added through `add_widget`; removing it deletes it
    Created,
    /// Dragged in from an outside container; removing it hands it back
    Adopted {
        container: String,
        original_width_px: u32,
        original_height_px: u32,
    },
}

/// A rectangle placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: WidgetId,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub origin: Origin,
    /// Markup carried inside the widget
    pub content: String,
    /// Has a nested container for sub-widgets
    pub nested: bool,
}

impl Widget {
    pub fn rect(&self) -> CellRect {
        CellRect::new(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn set_rect(&mut self, rect: CellRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Clamp a width into `[min_width, max_width]`.
    pub fn clamp_width(&self, width: u32) -> u32 {
        let width = width.max(self.min_width);
        match self.max_width {
            Some(max) => width.min(max.max(self.min_width)),
            None => width,
        }
    }

    /// Clamp a height into `[min_height, max_height]`.
    pub fn clamp_height(&self, height: u32) -> u32 {
        let height = height.max(self.min_height);
        match self.max_height {
            Some(max) => height.min(max.max(self.min_height)),
            None => height,
        }
    }

    pub fn is_adopted(&self) -> bool {
        matches!(self.origin, Origin::Adopted { .. })
    }
}

/// Request for a new widget. Omitted fields fall back to the grid options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSpec {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
    /// `Some(0)` means unbounded, like an unset option
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub content: String,
}

impl WidgetSpec {
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_min(mut self, min_width: u32, min_height: u32) -> Self {
        self.min_width = Some(min_width);
        self.min_height = Some(min_height);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub(crate) fn build(&self, options: &GridOptions, origin: Origin) -> Widget {
        let unbounded = |value: Option<u32>| value.filter(|v| *v > 0);
        let mut widget = Widget {
            id: WidgetId::new(),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            min_width: self.min_width.unwrap_or(options.min_width).max(1),
            min_height: self.min_height.unwrap_or(options.min_height).max(1),
            max_width: unbounded(self.max_width.or(options.max_width)),
            max_height: unbounded(self.max_height.or(options.max_height)),
            origin,
            content: self.content.clone(),
            nested: options.nested,
        };
        widget.width = widget.clamp_width(self.width.unwrap_or(options.default_width));
        widget.height = widget.clamp_height(self.height.unwrap_or(options.default_height));
        widget
    }
}

/// Widget attribute addressed by `Grid::move_or_resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetAttr {
    X,
    Y,
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_falls_back_to_options() {
        let options = GridOptions::default();
        let widget = WidgetSpec::default().build(&options, Origin::Created);
        assert_eq!((widget.width, widget.height), (3, 3));
        assert_eq!((widget.min_width, widget.min_height), (3, 3));
        assert!(widget.nested);
    }

    #[test]
    fn test_width_never_below_minimum() {
        let options = GridOptions::default();
        let widget = WidgetSpec::default().sized(1, 1).build(&options, Origin::Created);
        assert_eq!((widget.width, widget.height), (3, 3));
    }

    #[test]
    fn test_zero_max_is_unbounded() {
        let options = GridOptions::default();
        let mut spec = WidgetSpec::default().sized(4, 4);
        spec.max_width = Some(0);
        spec.max_height = Some(3);
        let widget = spec.build(&options, Origin::Created);
        assert_eq!(widget.max_width, None);
        assert_eq!(widget.height, 3);
    }
}
