mod common;

use common::{Recorder, RecorderHandle};
use mirrorgrid::config::ModuleConfig;
use mirrorgrid::i18n::Translator;
use mirrorgrid::ui::{BusError, ModuleManager, Region};
use serde_json::{json, Value};

struct Bus {
    manager: ModuleManager,
    ids: Vec<String>,
    recorders: Vec<RecorderHandle>,
}

/// Three recorders: positioned, unpositioned, positioned.
async fn bus() -> Bus {
    let manager = ModuleManager::new(Translator::default());
    let mut ids = Vec::new();
    let mut recorders = Vec::new();
    for spec in [
        ModuleConfig::new("recorder").at(Region::TopLeft),
        ModuleConfig::new("recorder").with_config("announce", json!("EARLY")),
        ModuleConfig::new("recorder").at(Region::TopRight),
    ] {
        let (recorder, handle) = Recorder::new("content");
        ids.push(manager.add_module(Box::new(recorder), &spec));
        recorders.push(handle);
    }
    manager.modules_started().await.unwrap();
    Bus { manager, ids, recorders }
}

#[tokio::test]
async fn test_broadcast_skips_sender() {
    let bus = bus().await;

    let delivered = bus
        .manager
        .send_notification("HELLO", json!({"n": 1}), &bus.ids[0])
        .unwrap();

    assert_eq!(delivered, vec![bus.ids[1].clone(), bus.ids[2].clone()]);
    assert!(bus.recorders[0].received().is_empty());
    assert_eq!(bus.recorders[1].received(), vec!["HELLO"]);
    assert_eq!(bus.recorders[2].received(), vec!["HELLO"]);
}

#[tokio::test]
async fn test_targeted_delivery() {
    let bus = bus().await;

    let delivered = bus.manager.publish("PING", Value::Null, None, Some(&bus.ids[2])).unwrap();

    assert_eq!(delivered, vec![bus.ids[2].clone()]);
    assert!(bus.recorders[0].received().is_empty());
    assert!(bus.recorders[1].received().is_empty());
    assert_eq!(bus.recorders[2].received(), vec!["PING"]);
}

#[tokio::test]
async fn test_reply_is_sent_from_receiver() {
    let bus = bus().await;

    bus.manager.publish("RELAY", Value::Null, None, Some(&bus.ids[0])).unwrap();

    assert_eq!(bus.recorders[0].received(), vec!["RELAY"]);
    assert_eq!(bus.recorders[1].received(), vec!["RELAYED"]);
    assert_eq!(bus.recorders[2].received(), vec!["RELAYED"]);
}

#[tokio::test]
async fn test_invalid_notifications_are_rejected() {
    let bus = bus().await;

    assert_eq!(
        bus.manager.send_notification("HELLO", Value::Null, "module_9_missing"),
        Err(BusError::UnknownSender("module_9_missing".to_string()))
    );
    assert_eq!(bus.manager.publish("", Value::Null, None, None), Err(BusError::EmptyName));
    assert!(bus.recorders.iter().all(|p| p.received().is_empty()));
}

#[tokio::test]
async fn test_notifications_before_start_are_dropped() {
    let bus = bus().await;

    // The second recorder announced EARLY from its start hook.
    assert!(bus.recorders.iter().all(|p| !p.log().contains(&"EARLY".to_string())));
    assert_eq!(bus.recorders[0].log()[0], "ALL_MODULES_STARTED");
}

#[tokio::test]
async fn test_lifecycle_broadcasts() {
    let bus = bus().await;

    assert_eq!(
        bus.recorders[0].log(),
        vec!["ALL_MODULES_STARTED", "MODULE_DOM_CREATED", "DOM_OBJECTS_CREATED"]
    );
    // Never mounted, so no MODULE_DOM_CREATED.
    assert_eq!(bus.recorders[1].log(), vec!["ALL_MODULES_STARTED", "DOM_OBJECTS_CREATED"]);
}
