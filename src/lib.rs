//! mirrorgrid - the core of a modular information dashboard
//!
//! Independently written modules are placed into named screen regions,
//! talk to each other over a notification bus and have their rendered
//! content reconciled into a retained document with animated transitions.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`config`] - Dashboard configuration and module declarations
//! * [`grid`] - Cell grid engine used to lay out regions and widgets
//! * [`helper`] - Socket transport between modules and their helpers
//! * [`i18n`] - Translation tables
//! * [`modules`] - Module factories and the bundled modules
//! * [`ui`] - Module lifecycle, notification bus and DOM reconciliation

/// Configuration module for managing dashboard settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Cell grid placement, resizing and persistence
pub mod grid;

/// Helper-side socket transport
pub mod helper;

/// Translation lookup with language fallback
pub mod i18n;

/// Logging setup
pub mod logger;

/// Module factories and bundled modules
pub mod modules;

/// Module lifecycle and document reconciliation
pub mod ui;

pub use config::{Config, ModuleConfig};
pub use ui::ModuleManager;
