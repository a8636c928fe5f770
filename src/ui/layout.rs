//! Dashboard regions and grid-driven region placement

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::grid::{CellRect, Grid, GridOptions, WidgetSpec};

/// A named placement slot in the dashboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    TopBar,
    TopLeft,
    TopCenter,
    TopRight,
    UpperThird,
    MiddleCenter,
    LowerThird,
    BottomLeft,
    BottomCenter,
    BottomRight,
    BottomBar,
    FullscreenAbove,
    FullscreenBelow,
}

impl Region {
    /// Every region, in document order.
    pub const ALL: [Region; 13] = [
        Region::TopBar,
        Region::TopLeft,
        Region::TopCenter,
        Region::TopRight,
        Region::UpperThird,
        Region::MiddleCenter,
        Region::LowerThird,
        Region::BottomLeft,
        Region::BottomCenter,
        Region::BottomRight,
        Region::BottomBar,
        Region::FullscreenAbove,
        Region::FullscreenBelow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::TopBar => "top_bar",
            Region::TopLeft => "top_left",
            Region::TopCenter => "top_center",
            Region::TopRight => "top_right",
            Region::UpperThird => "upper_third",
            Region::MiddleCenter => "middle_center",
            Region::LowerThird => "lower_third",
            Region::BottomLeft => "bottom_left",
            Region::BottomCenter => "bottom_center",
            Region::BottomRight => "bottom_right",
            Region::BottomBar => "bottom_bar",
            Region::FullscreenAbove => "fullscreen_above",
            Region::FullscreenBelow => "fullscreen_below",
        }
    }

    /// Class list of the region element, e.g. `top bar`.
    pub fn classes(self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    /// Fullscreen regions overlay the whole screen and never take a grid slot.
    pub fn is_fullscreen(self) -> bool {
        matches!(self, Region::FullscreenAbove | Region::FullscreenBelow)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown region '{}'", s))
    }
}

/// Where a region sits on the layout grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPlacement {
    pub region: Region,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionPlacement {
    pub fn new(region: Region, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            region,
            x,
            y,
            width,
            height,
        }
    }
}

/// `[layout]` section: places regions on a grid instead of the fixed
/// stacked layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub grid: GridOptions,
    pub regions: Vec<RegionPlacement>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid: GridOptions::dashboard(),
            regions: LayoutManager::default_placements(),
        }
    }
}

/// Computes region geometry for the dashboard
pub struct LayoutManager;

impl LayoutManager {
    /// Standard dashboard arrangement on the 22x22 layout grid: a bar, three
    /// columns, three full-width bands, three columns and a closing bar.
    #[must_use]
    pub fn default_placements() -> Vec<RegionPlacement> {
        vec![
            RegionPlacement::new(Region::TopBar, 0, 0, 22, 2),
            RegionPlacement::new(Region::TopLeft, 0, 2, 7, 5),
            RegionPlacement::new(Region::TopCenter, 7, 2, 8, 5),
            RegionPlacement::new(Region::TopRight, 15, 2, 7, 5),
            RegionPlacement::new(Region::UpperThird, 0, 7, 22, 3),
            RegionPlacement::new(Region::MiddleCenter, 0, 10, 22, 3),
            RegionPlacement::new(Region::LowerThird, 0, 13, 22, 3),
            RegionPlacement::new(Region::BottomLeft, 0, 16, 7, 4),
            RegionPlacement::new(Region::BottomCenter, 7, 16, 8, 4),
            RegionPlacement::new(Region::BottomRight, 15, 16, 7, 4),
            RegionPlacement::new(Region::BottomBar, 0, 20, 22, 2),
        ]
    }

    /// Place every configured region as a widget on a fresh grid.
    ///
    /// The grid engine resolves overlaps and overflow, so the returned
    /// rectangles are where regions actually landed, which can differ from
    /// the configured ones.
    pub fn place_regions(layout: &LayoutConfig) -> Result<(Grid, Vec<(Region, CellRect)>)> {
        let mut grid = Grid::with_options(layout.grid.clone()).context("Failed to build layout grid")?;
        let mut placed: Vec<(Region, CellRect)> = Vec::with_capacity(layout.regions.len());

        for placement in &layout.regions {
            if placement.region.is_fullscreen() {
                warn!("Region {} overlays the screen and cannot be placed on the grid", placement.region);
                continue;
            }
            if placed.iter().any(|(region, _)| *region == placement.region) {
                warn!("Region {} is placed more than once, keeping the first", placement.region);
                continue;
            }

            let spec = WidgetSpec::at(placement.x, placement.y)
                .sized(placement.width, placement.height)
                .with_min(1, 1)
                .with_content(placement.region.as_str());
            let widget = grid
                .add_widget(spec)
                .with_context(|| format!("Failed to place region {}", placement.region))?;
            debug!("Region {} placed at {:?}", placement.region, widget.rect);
            placed.push((placement.region, widget.rect));
        }
        grid.drain_changes();

        Ok((grid, placed))
    }
}
