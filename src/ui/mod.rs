//! Dashboard UI for mirrorgrid
//!
//! This module owns the module lifecycle, the notification bus, region
//! layout and the reconciliation of rendered module content into the
//! [`Document`].

pub mod app_component;
pub mod core;
pub mod dom;
pub mod events;
pub mod layout;
pub mod renderer;
pub mod selection;

pub use app_component::ModuleManager;
pub use dom::{Document, Node};
pub use events::BusError;
pub use layout::{LayoutConfig, LayoutManager, Region, RegionPlacement};
pub use renderer::UpdateError;
pub use selection::ModuleSelection;
