//! Digital clock module

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDateTime};
use serde_json::{json, Map, Value};

use crate::i18n::Translator;
use crate::ui::core::{DomFuture, Module, ModuleContext, ModuleData};
use crate::ui::dom::Node;

/// Shows the current time and, optionally, the date and ISO week.
#[derive(Default)]
pub struct Clock {
    /// Fixed instant to render instead of the wall clock
    frozen: Option<NaiveDateTime>,
    translator: Option<Arc<Translator>>,
}

impl Clock {
    /// A clock that always shows `time`.
    pub fn frozen_at(time: NaiveDateTime) -> Self {
        Self {
            frozen: Some(time),
            translator: None,
        }
    }

    fn now(&self) -> NaiveDateTime {
        self.frozen.unwrap_or_else(|| Local::now().naive_local())
    }

    fn render(&self, data: &ModuleData, now: NaiveDateTime) -> Node {
        let twelve_hour = data.config_u64("time_format") == Some(12);
        let mut time = Node::element("div")
            .with_class("time")
            .with_class("bright")
            .with_class("large")
            .with_text(now.format(if twelve_hour { "%-I:%M" } else { "%H:%M" }).to_string());
        if data.config_bool("display_seconds").unwrap_or(true) {
            time = time.with_child(
                Node::element("sup")
                    .with_class("dimmed")
                    .with_text(now.format("%S").to_string()),
            );
        }
        if twelve_hour && data.config_bool("show_period").unwrap_or(true) {
            time = time.with_child(
                Node::element("span")
                    .with_class("period")
                    .with_text(now.format("%p").to_string()),
            );
        }

        let mut wrapper = Node::element("div").with_class("clock");
        if data.config_bool("show_date").unwrap_or(true) {
            let format = data.config_str("date_format").unwrap_or("%A, %B %-d, %Y");
            wrapper = wrapper.with_child(
                Node::element("div")
                    .with_class("date")
                    .with_class("normal")
                    .with_text(now.format(format).to_string()),
            );
        }
        wrapper = wrapper.with_child(time);

        if data.config_bool("show_week").unwrap_or(false) {
            let week = now.iso_week().week().to_string();
            let vars = [("weekNumber", week.as_str())];
            let text = match &self.translator {
                Some(translator) => translator.translate("WEEK", &vars),
                None => Translator::default().translate("WEEK", &vars),
            };
            wrapper = wrapper.with_child(Node::element("div").with_class("week").with_text(text));
        }
        wrapper
    }
}

impl Module for Clock {
    fn name(&self) -> &str {
        "clock"
    }

    fn defaults(&self) -> Map<String, Value> {
        match json!({
            "time_format": 24,
            "display_seconds": true,
            "show_period": true,
            "show_date": true,
            "date_format": "%A, %B %-d, %Y",
            "show_week": false,
        }) {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn start(&mut self, _data: &ModuleData, ctx: &mut ModuleContext) {
        self.translator = Some(ctx.translator());
    }

    fn dom(&self, data: &ModuleData) -> DomFuture {
        let node = self.render(data, self.now());
        Box::pin(async move { Ok(node) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn data(config: Value) -> ModuleData {
        let mut merged = Clock::default().defaults();
        if let Value::Object(supplied) = config {
            merged.extend(supplied);
        }
        ModuleData {
            identifier: "module_0_clock".into(),
            name: "clock".into(),
            index: 0,
            position: None,
            header: None,
            classes: "clock".into(),
            config: merged,
        }
    }

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(15, 7, 9)
            .unwrap()
    }

    #[tokio::test]
    async fn test_24_hour_rendering() {
        let clock = Clock::frozen_at(instant());
        let node = clock.dom(&data(json!({}))).await.unwrap();
        assert_eq!(node.text_content(), "Monday, March 4, 202415:0709");
    }

    #[tokio::test]
    async fn test_12_hour_rendering_with_week() {
        let clock = Clock::frozen_at(instant());
        let config = json!({"time_format": 12, "display_seconds": false, "show_date": false, "show_week": true});
        let node = clock.dom(&data(config)).await.unwrap();
        assert_eq!(node.text_content(), "3:07PMWeek 10");
    }
}
