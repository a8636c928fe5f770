//! Notification bus
//!
//! Delivery is synchronous and follows registration order. The sender never
//! receives its own notification, and a target restricts delivery to that
//! one instance. Commands queued by the receivers are handed back to the
//! caller so they run after the fan-out, never in the middle of it.

use std::sync::Arc;

use log::{debug, error};
use serde_json::Value;
use thiserror::Error;

use super::core::context::ModuleRegistry;
use super::core::{Command, ModuleContext, Notification, SenderRef};
use crate::i18n::Translator;

/// Contract violations that abort a publish before any delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("sendNotification: notification name should not be empty")]
    EmptyName,

    #[error("sendNotification: sender {0} is not a registered module")]
    UnknownSender(String),
}

/// Result of one publish call.
#[derive(Debug, Default)]
pub(crate) struct Dispatch {
    /// Identifiers that received the notification, in delivery order
    pub delivered: Vec<String>,
    /// Commands queued by receivers, tagged with the receiver's identifier
    pub commands: Vec<(String, Command)>,
}

/// Validate a publish and build the notification.
pub(crate) fn prepare(
    registry: &ModuleRegistry,
    name: &str,
    payload: Value,
    sender: Option<&str>,
) -> Result<Notification, BusError> {
    if name.is_empty() {
        let err = BusError::EmptyName;
        error!("{}", err);
        return Err(err);
    }

    let sender = match sender {
        Some(identifier) => {
            let entry = registry.get(identifier).ok_or_else(|| {
                let err = BusError::UnknownSender(identifier.to_string());
                error!("{}", err);
                err
            })?;
            Some(SenderRef {
                identifier: entry.data.identifier.clone(),
                name: entry.data.name.clone(),
            })
        }
        None => None,
    };

    Ok(Notification {
        sender,
        ..Notification::new(name, payload)
    })
}

/// Deliver `notification` to every registered module except its sender,
/// or only to `target` when one is given.
pub(crate) fn dispatch(
    registry: &mut ModuleRegistry,
    notification: &Notification,
    target: Option<&str>,
    translator: &Arc<Translator>,
) -> Dispatch {
    let mut result = Dispatch::default();
    if !registry.is_active() {
        debug!("Dropping {}: no modules registered yet", notification.name);
        return result;
    }

    let sender = notification.sender.as_ref().map(|s| s.identifier.as_str());
    for entry in registry.entries_mut() {
        let identifier = entry.data.identifier.as_str();
        if Some(identifier) == sender {
            continue;
        }
        if target.is_some_and(|t| t != identifier) {
            continue;
        }

        let mut ctx = ModuleContext::new(identifier, Arc::clone(translator));
        entry.module.notification_received(notification, &entry.data, &mut ctx);
        result.delivered.push(identifier.to_string());
        result
            .commands
            .extend(ctx.take_commands().into_iter().map(|c| (identifier.to_string(), c)));
    }

    debug!(
        "{} from {} delivered to {} module(s)",
        notification.name,
        notification.sender.as_ref().map_or("core", |s| s.name.as_str()),
        result.delivered.len()
    );
    result
}
