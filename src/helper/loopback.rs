use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{SocketMessage, SocketTransport, TransportError};
use crate::ui::ModuleManager;

/// In-process transport: socket notifications land on a tokio channel.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    sender: mpsc::UnboundedSender<SocketMessage>,
}

impl LoopbackTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SocketMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: tx }, rx)
    }

    /// Helper that answers every message by sending it straight back to
    /// the module instances it came from. Runs until the channel closes.
    pub fn spawn_echo(mut receiver: mpsc::UnboundedReceiver<SocketMessage>, manager: ModuleManager) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                debug!("Echoing {} back to {}", message.name, message.module);
                let delivered = manager.deliver_socket_notification(&message.module, &message.name, message.payload);
                if delivered == 0 {
                    warn!("No instance of {} left to receive {}", message.module, message.name);
                }
            }
        })
    }
}

#[async_trait]
impl SocketTransport for LoopbackTransport {
    async fn send(&self, message: SocketMessage) -> Result<(), TransportError> {
        let module = message.module.clone();
        self.sender
            .send(message)
            .map_err(|_| TransportError::Closed(module))
    }
}
