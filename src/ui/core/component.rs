use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};

use super::actions::Notification;
use super::context::ModuleContext;
use crate::ui::dom::Node;
use crate::ui::layout::Region;

/// Content produced by a module. Synchronous producers return a ready
/// future, e.g. `Box::pin(async move { Ok(node) })`.
pub type DomFuture = BoxFuture<'static, anyhow::Result<Node>>;

/// Identity and merged configuration of one module instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleData {
    /// `module_<index>_<name>`, unique per declaration
    pub identifier: String,
    pub name: String,
    pub index: usize,
    pub position: Option<Region>,
    pub header: Option<String>,
    /// Space separated, always ends with the module name
    pub classes: String,
    pub config: Map<String, Value>,
}

impl ModuleData {
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    pub fn config_u64(&self, key: &str) -> Option<u64> {
        self.config.get(key).and_then(Value::as_u64)
    }

    pub fn config_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).and_then(Value::as_bool)
    }

    /// Whether the instance carries `class` (case-insensitive).
    pub fn has_class(&self, class: &str) -> bool {
        self.classes
            .split_whitespace()
            .any(|c| c.eq_ignore_ascii_case(class))
    }
}

/// Capability set of a dashboard module.
///
/// Only `name` and `dom` are required. Hooks that want to talk back to the
/// dashboard queue requests on the [`ModuleContext`] they are handed.
pub trait Module: Send {
    fn name(&self) -> &str;

    /// Instance defaults; configured values win key by key.
    fn defaults(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Called once after the instance is created.
    fn start(&mut self, _data: &ModuleData, _ctx: &mut ModuleContext) {}

    fn header(&self, data: &ModuleData) -> Option<String> {
        data.header.clone()
    }

    fn dom(&self, data: &ModuleData) -> DomFuture;

    fn notification_received(&mut self, _notification: &Notification, _data: &ModuleData, _ctx: &mut ModuleContext) {}

    /// Message from the module's out-of-process helper.
    fn socket_notification_received(
        &mut self,
        _name: &str,
        _payload: &Value,
        _data: &ModuleData,
        _ctx: &mut ModuleContext,
    ) {
    }
}

/// Shallow merge: every key of `supplied` replaces the same key of
/// `defaults`, nested objects included.
pub fn merge_config(defaults: Map<String, Value>, supplied: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = defaults;
    for (key, value) in supplied {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_is_shallow() {
        let defaults = json!({"a": 1, "nested": {"x": 1, "y": 2}}).as_object().cloned().unwrap();
        let supplied = json!({"nested": {"x": 5}, "b": true}).as_object().cloned().unwrap();
        let merged = merge_config(defaults, &supplied);

        assert_eq!(merged["a"], json!(1));
        assert_eq!(merged["b"], json!(true));
        assert_eq!(merged["nested"], json!({"x": 5}));
    }

    #[test]
    fn test_class_match_is_case_insensitive() {
        let data = ModuleData {
            identifier: "module_0_clock".into(),
            name: "clock".into(),
            index: 0,
            position: None,
            header: None,
            classes: "Night clock".into(),
            config: Map::new(),
        };
        assert!(data.has_class("night"));
        assert!(data.has_class("CLOCK"));
        assert!(!data.has_class("day"));
    }
}
