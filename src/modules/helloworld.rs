//! Static text module

use serde_json::{json, Map, Value};

use crate::constants::DEFAULT_ANIMATION_SPEED_MS;
use crate::ui::core::{DomFuture, Module, ModuleContext, ModuleData, Notification};
use crate::ui::dom::Node;

/// Notification that replaces the displayed text; the payload is the text.
pub const SET_TEXT: &str = "HELLOWORLD_SET_TEXT";

/// Displays the configured `text`. The text can be replaced at runtime by
/// a `HELLOWORLD_SET_TEXT` notification or a `SET_TEXT` socket
/// notification from the module's helper.
#[derive(Default)]
pub struct HelloWorld {
    text: Option<String>,
}

impl HelloWorld {
    fn set_text(&mut self, payload: &Value, data: &ModuleData, ctx: &mut ModuleContext) {
        let Some(text) = payload.as_str() else {
            log::warn!("{} ignores non-text payload {}", data.identifier, payload);
            return;
        };
        self.text = Some(text.to_string());
        ctx.update_dom(data.config_u64("animation_speed").unwrap_or(DEFAULT_ANIMATION_SPEED_MS));
    }
}

impl Module for HelloWorld {
    fn name(&self) -> &str {
        "helloworld"
    }

    fn defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert("text".to_string(), json!("Hello World!"));
        defaults.insert("animation_speed".to_string(), json!(DEFAULT_ANIMATION_SPEED_MS));
        defaults
    }

    fn dom(&self, data: &ModuleData) -> DomFuture {
        let text = self
            .text
            .clone()
            .or_else(|| data.config_str("text").map(str::to_string))
            .unwrap_or_default();
        Box::pin(async move { Ok(Node::element("div").with_text(text)) })
    }

    fn notification_received(&mut self, notification: &Notification, data: &ModuleData, ctx: &mut ModuleContext) {
        if notification.name == SET_TEXT {
            self.set_text(&notification.payload, data, ctx);
        }
    }

    fn socket_notification_received(&mut self, name: &str, payload: &Value, data: &ModuleData, ctx: &mut ModuleContext) {
        if name == "SET_TEXT" {
            self.set_text(payload, data, ctx);
        }
    }
}
