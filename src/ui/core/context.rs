use std::sync::Arc;

use serde_json::Value;

use super::actions::{Callback, Command, HideOptions, ShowOptions};
use super::component::{Module, ModuleData};
use super::task_manager::TransitionSlot;
use crate::i18n::Translator;

/// Handle a module gets while one of its hooks runs.
///
/// Everything a module asks of the dashboard is queued here and executed
/// by the manager after the hook returns, so a module never touches
/// another module or the document directly.
pub struct ModuleContext {
    identifier: String,
    translator: Arc<Translator>,
    commands: Vec<Command>,
}

impl ModuleContext {
    pub fn new(identifier: impl Into<String>, translator: Arc<Translator>) -> Self {
        Self {
            identifier: identifier.into(),
            translator,
            commands: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Broadcast to every other module.
    pub fn send_notification(&mut self, name: impl Into<String>, payload: Value) {
        self.commands.push(Command::SendNotification {
            name: name.into(),
            payload,
        });
    }

    pub fn update_dom(&mut self, speed_ms: u64) {
        self.commands.push(Command::UpdateDom { speed_ms });
    }

    pub fn hide(&mut self, speed_ms: u64, callback: Option<Callback>, options: HideOptions) {
        self.commands.push(Command::Hide {
            speed_ms,
            callback,
            options,
        });
    }

    pub fn show(&mut self, speed_ms: u64, callback: Option<Callback>, options: ShowOptions) {
        self.commands.push(Command::Show {
            speed_ms,
            callback,
            options,
        });
    }

    /// Message for this module's helper.
    pub fn send_socket_notification(&mut self, name: impl Into<String>, payload: Value) {
        self.commands.push(Command::SendSocketNotification {
            name: name.into(),
            payload,
        });
    }

    pub fn translate(&self, key: &str, vars: &[(&str, &str)]) -> String {
        self.translator.translate(key, vars)
    }

    pub fn translator(&self) -> Arc<Translator> {
        Arc::clone(&self.translator)
    }

    pub fn pending(&self) -> &[Command] {
        &self.commands
    }

    pub(crate) fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

/// Manager-side state of one module instance.
pub(crate) struct ModuleEntry {
    pub data: ModuleData,
    pub module: Box<dyn Module>,
    pub hidden: bool,
    pub lock_strings: Vec<String>,
    pub transition: TransitionSlot,
}

impl ModuleEntry {
    pub fn new(data: ModuleData, module: Box<dyn Module>) -> Self {
        Self {
            data,
            module,
            hidden: false,
            lock_strings: Vec::new(),
            transition: TransitionSlot::default(),
        }
    }
}

/// The module instances owned by the manager, in registration order.
#[derive(Default)]
pub(crate) struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
    next_index: usize,
    active: bool,
}

impl ModuleRegistry {
    /// Reserve the next declaration index.
    pub fn next_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    pub fn push(&mut self, entry: ModuleEntry) {
        self.entries.push(entry);
    }

    /// Whether the instances have been registered as the active set.
    /// Notifications published before that have no listeners.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn get(&self, identifier: &str) -> Option<&ModuleEntry> {
        self.entries.iter().find(|e| e.data.identifier == identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut ModuleEntry> {
        self.entries.iter_mut().find(|e| e.data.identifier == identifier)
    }

    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [ModuleEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
