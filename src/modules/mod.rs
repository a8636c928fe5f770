//! Module factories and the modules shipped with the dashboard

pub mod clock;
pub mod helloworld;
pub mod registry;

use thiserror::Error;

pub use clock::Clock;
pub use helloworld::HelloWorld;
pub use registry::{ModuleFactory, ModuleFactoryRegistry};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Module '{0}' is already registered")]
    AlreadyRegistered(String),
}
