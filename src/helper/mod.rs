//! Out-of-process module helpers.
//!
//! A module talks to its helper with socket notifications. The dashboard
//! only depends on the [`SocketTransport`] contract; replies come back in
//! through [`ModuleManager::deliver_socket_notification`].
//!
//! [`ModuleManager::deliver_socket_notification`]: crate::ui::ModuleManager::deliver_socket_notification

pub mod loopback;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use loopback::LoopbackTransport;

/// One message between a module and its helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketMessage {
    /// Module name, shared by every instance of the module
    pub module: String,
    pub name: String,
    pub payload: Value,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("helper channel for {0} is closed")]
    Closed(String),

    #[error("helper rejected {name}: {reason}")]
    Rejected { name: String, reason: String },
}

/// Outbound half of the module/helper channel.
#[async_trait]
pub trait SocketTransport: Send + Sync {
    async fn send(&self, message: SocketMessage) -> Result<(), TransportError>;
}
