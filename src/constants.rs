//! Constants used throughout the application
//!
//! Core notification names, file locations and other fixed values.

// Core notifications
/// Broadcast once every configured module has been started
pub const ALL_MODULES_STARTED: &str = "ALL_MODULES_STARTED";
/// Sent to a single module after its initial render
pub const MODULE_DOM_CREATED: &str = "MODULE_DOM_CREATED";
/// Broadcast after every initial render has settled
pub const DOM_OBJECTS_CREATED: &str = "DOM_OBJECTS_CREATED";

// Files and directories
pub const APP_NAME: &str = "mirrorgrid";
pub const CONFIG_FILE_NAME: &str = "mirrorgrid.toml";
pub const XDG_CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "mirrorgrid.log";

// Messages
pub const CONFIG_GENERATED: &str = "Generated default configuration file";
pub const CONFIG_MISSING: &str = "Config file is missing! Please create a config file.";

// Server defaults
pub const DEFAULT_ADDRESS: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Fade duration used by modules that do not pick their own, in ms
pub const DEFAULT_ANIMATION_SPEED_MS: u64 = 1000;
