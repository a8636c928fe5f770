#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use futures::future;
use mirrorgrid::ui::core::{DomFuture, Module, ModuleContext, ModuleData, Notification};
use mirrorgrid::ui::dom::Node;
use serde_json::Value;

/// Shared view into a [`Recorder`] after it has been handed to the manager.
#[derive(Clone, Default)]
pub struct RecorderHandle {
    log: Arc<Mutex<Vec<String>>>,
    content: Arc<Mutex<String>>,
}

impl RecorderHandle {
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Received notifications, minus the core lifecycle broadcasts
    pub fn received(&self) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|n| !matches!(n.as_str(), "ALL_MODULES_STARTED" | "MODULE_DOM_CREATED" | "DOM_OBJECTS_CREATED"))
            .collect()
    }

    pub fn set_content(&self, text: &str) {
        *self.content.lock().unwrap() = text.to_string();
    }
}

/// Test module that records what it receives.
///
/// - `RELAY` is answered with a `RELAYED` broadcast
/// - `FORWARD` is passed to the helper as an `ECHO` socket notification
/// - an `announce` config key is broadcast from `start`
pub struct Recorder {
    handle: RecorderHandle,
    render: Render,
}

enum Render {
    Content,
    Fail,
    /// Content future that never resolves
    Stall,
}

impl Recorder {
    pub fn new(content: &str) -> (Self, RecorderHandle) {
        Self::with_render(content, Render::Content)
    }

    /// A recorder whose content generation always fails.
    pub fn failing() -> (Self, RecorderHandle) {
        Self::with_render("", Render::Fail)
    }

    /// A recorder whose content generation never completes.
    pub fn stalled() -> (Self, RecorderHandle) {
        Self::with_render("", Render::Stall)
    }

    fn with_render(content: &str, render: Render) -> (Self, RecorderHandle) {
        let handle = RecorderHandle::default();
        handle.set_content(content);
        (
            Self {
                handle: handle.clone(),
                render,
            },
            handle,
        )
    }
}

impl Module for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn start(&mut self, data: &ModuleData, ctx: &mut ModuleContext) {
        if let Some(name) = data.config_str("announce") {
            ctx.send_notification(name, Value::Null);
        }
    }

    fn dom(&self, data: &ModuleData) -> DomFuture {
        match self.render {
            Render::Content => {
                let text = self.handle.content.lock().unwrap().clone();
                Box::pin(async move { Ok(Node::element("div").with_text(text)) })
            }
            Render::Fail => {
                let identifier = data.identifier.clone();
                Box::pin(async move { Err::<Node, _>(anyhow!("feed for {} unavailable", identifier)) })
            }
            Render::Stall => Box::pin(future::pending::<anyhow::Result<Node>>()),
        }
    }

    fn notification_received(&mut self, notification: &Notification, _data: &ModuleData, ctx: &mut ModuleContext) {
        self.handle.log.lock().unwrap().push(notification.name.clone());
        match notification.name.as_str() {
            "RELAY" => ctx.send_notification("RELAYED", notification.payload.clone()),
            "FORWARD" => ctx.send_socket_notification("ECHO", notification.payload.clone()),
            _ => {}
        }
    }

    fn socket_notification_received(&mut self, name: &str, _payload: &Value, _data: &ModuleData, _ctx: &mut ModuleContext) {
        self.handle.log.lock().unwrap().push(format!("socket:{}", name));
    }
}
