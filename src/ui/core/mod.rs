//! Core building blocks shared by the manager and the modules.
//!
//! - [`actions`] - notifications, queued module commands and show/hide options
//! - [`component`] - the [`Module`] capability trait and instance data
//! - [`context`] - the per-hook [`ModuleContext`] and the manager's registry
//! - [`task_manager`] - cancellable show/hide transitions

pub mod actions;
pub mod component;
pub mod context;
pub mod task_manager;

pub use actions::{Callback, Command, ErrorCallback, HideOptions, LockError, Notification, SenderRef, ShowOptions};
pub use component::{merge_config, DomFuture, Module, ModuleData};
pub use context::ModuleContext;
pub use task_manager::{TransitionId, TransitionSlot};
