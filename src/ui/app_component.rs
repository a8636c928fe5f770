//! Module lifecycle manager
//!
//! [`ModuleManager`] owns every module instance and the live [`Document`].
//! It is a cheap `Clone` handle; clones share the same state. Module hooks
//! run while the registry is locked, which is why modules only ever see
//! their own [`ModuleData`] and a [`ModuleContext`] to queue requests on.
//!
//! Lock order is registry, then document. Neither lock is held across an
//! await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::core::context::{ModuleEntry, ModuleRegistry};
use super::core::{merge_config, Callback, Command, HideOptions, LockError, Module, ModuleContext, ModuleData, ShowOptions};
use super::dom::{Document, Flow, Node};
use super::events::{self, BusError};
use super::layout::{LayoutConfig, LayoutManager};
use super::renderer::{self, UpdateError};
use super::selection::ModuleSelection;
use crate::config::{Config, ModuleConfig};
use crate::constants::{ALL_MODULES_STARTED, DOM_OBJECTS_CREATED, MODULE_DOM_CREATED};
use crate::helper::{SocketMessage, SocketTransport};
use crate::i18n::Translator;
use crate::modules::ModuleFactoryRegistry;

struct Inner {
    registry: Mutex<ModuleRegistry>,
    document: Mutex<Document>,
    translator: Arc<Translator>,
    transport: Mutex<Option<Arc<dyn SocketTransport>>>,
}

impl Inner {
    fn registry(&self) -> MutexGuard<'_, ModuleRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn document(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct ModuleManager {
    inner: Arc<Inner>,
}

impl ModuleManager {
    pub fn new(translator: Translator) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(ModuleRegistry::default()),
                document: Mutex::new(Document::new()),
                translator: Arc::new(translator),
                transport: Mutex::new(None),
            }),
        }
    }

    /// Run the whole start-up sequence: localized strings, optional grid
    /// layout, module instantiation, the "all modules started" broadcast
    /// and the mounting of every positioned module.
    ///
    /// Returns as soon as the modules are mounted. Initial renders run in
    /// the background; the returned handle resolves once they have all
    /// settled and `DOM_OBJECTS_CREATED` went out.
    ///
    /// Nothing here is fatal. Unknown modules and a broken layout are
    /// logged and skipped. Must be called from within a tokio runtime.
    pub fn start(config: &Config, factories: &ModuleFactoryRegistry) -> (Self, JoinHandle<()>) {
        info!("Initializing mirrorgrid.");
        let manager = Self::new(Translator::new(&config.language));

        if let Some(layout) = &config.layout {
            if let Err(err) = manager.apply_layout(layout) {
                error!("Falling back to the stacked layout: {:#}", err);
            }
        }

        let started = manager.load_modules(&config.modules, factories);
        info!("Loaded {} of {} configured module(s)", started, config.modules.len());

        let settled = manager.modules_started();
        (manager, settled)
    }

    /// Place regions on a layout grid and record where each one landed.
    pub fn apply_layout(&self, layout: &LayoutConfig) -> anyhow::Result<()> {
        let (_, placed) = LayoutManager::place_regions(layout)?;
        let mut document = self.inner.document();
        for (region, rect) in placed {
            document.set_region_rect(region, rect);
        }
        Ok(())
    }

    pub fn set_transport(&self, transport: Arc<dyn SocketTransport>) {
        *self.inner.transport.lock().unwrap_or_else(PoisonError::into_inner) = Some(transport);
    }

    /// Instantiate and start every configured module. Each declaration
    /// consumes an index, including skipped ones, so identifiers match the
    /// configuration order. Returns the number of started instances.
    pub fn load_modules(&self, modules: &[ModuleConfig], factories: &ModuleFactoryRegistry) -> usize {
        let mut started = 0;
        for spec in modules {
            let index = self.inner.registry().next_index();
            if spec.disabled {
                debug!("Skipping disabled module {}", spec.module);
                continue;
            }
            match factories.create(&spec.module) {
                Ok(module) => {
                    self.register(index, module, spec);
                    started += 1;
                }
                Err(err) => error!(
                    "{} ({})",
                    self.inner
                        .translator
                        .translate("MODULE_NOT_FOUND", &[("MODULE_NAME", &spec.module)]),
                    err
                ),
            }
        }
        started
    }

    /// Start a module built outside the factory registry. Returns its
    /// identifier.
    pub fn add_module(&self, module: Box<dyn Module>, spec: &ModuleConfig) -> String {
        let index = self.inner.registry().next_index();
        self.register(index, module, spec)
    }

    fn register(&self, index: usize, mut module: Box<dyn Module>, spec: &ModuleConfig) -> String {
        let identifier = format!("module_{}_{}", index, spec.module);
        let classes = match &spec.classes {
            Some(classes) if !classes.trim().is_empty() => format!("{} {}", classes.trim(), spec.module),
            _ => spec.module.clone(),
        };
        let data = ModuleData {
            identifier: identifier.clone(),
            name: spec.module.clone(),
            index,
            position: spec.position,
            header: spec.header.clone(),
            classes,
            config: merge_config(module.defaults(), &spec.config),
        };

        let mut ctx = ModuleContext::new(identifier.as_str(), Arc::clone(&self.inner.translator));
        module.start(&data, &mut ctx);
        self.inner.registry().push(ModuleEntry::new(data, module));
        info!("Module started: {}", identifier);

        self.run_commands(&identifier, ctx.take_commands());
        identifier
    }

    /// Register the started instances as the active set, broadcast
    /// `ALL_MODULES_STARTED` and build every module's DOM. See
    /// [`create_dom_objects`](Self::create_dom_objects) for the handle.
    pub fn modules_started(&self) -> JoinHandle<()> {
        self.inner.registry().activate();
        info!("All modules started!");
        let _ = self.publish(ALL_MODULES_STARTED, Value::Null, None, None);
        self.create_dom_objects()
    }

    /// Mount a wrapper for every positioned module, in declaration order,
    /// then render each one on a background task.
    ///
    /// The returned handle resolves once every initial render settled and
    /// `DOM_OBJECTS_CREATED` has been broadcast. A module whose content
    /// never resolves holds back only that broadcast; its siblings still
    /// render and receive `MODULE_DOM_CREATED`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn create_dom_objects(&self) -> JoinHandle<()> {
        let mounted = self.mount_all();
        self.inner.document().update_wrapper_states();

        let manager = self.clone();
        tokio::spawn(async move {
            let renders = mounted.into_iter().map(|identifier| {
                let manager = manager.clone();
                async move {
                    match manager.update_dom(&identifier, 0).await {
                        Ok(()) => {
                            let _ = manager.publish(MODULE_DOM_CREATED, Value::Null, None, Some(&identifier));
                        }
                        Err(err) => debug!("No MODULE_DOM_CREATED for {}: {}", identifier, err),
                    }
                }
            });
            join_all(renders).await;

            let _ = manager.publish(DOM_OBJECTS_CREATED, Value::Null, None, None);
        })
    }

    fn mount_all(&self) -> Vec<String> {
        let registry = self.inner.registry();
        let mut document = self.inner.document();
        registry
            .entries()
            .iter()
            .filter_map(|entry| {
                let region = entry.data.position?;
                let header = entry.module.header(&entry.data).unwrap_or_default();
                let classes = format!("module {}", entry.data.classes);
                document
                    .mount(region, &entry.data.identifier, &classes, &header)
                    .then(|| entry.data.identifier.clone())
            })
            .collect()
    }

    /// Deliver a notification to every registered module except `sender`,
    /// or to `target` only. Returns the receivers in delivery order.
    pub fn publish(
        &self,
        name: &str,
        payload: Value,
        sender: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<String>, BusError> {
        let dispatch = {
            let mut registry = self.inner.registry();
            let notification = events::prepare(&registry, name, payload, sender)?;
            events::dispatch(&mut registry, &notification, target, &self.inner.translator)
        };

        for (identifier, command) in dispatch.commands {
            self.run_command(&identifier, command);
        }
        Ok(dispatch.delivered)
    }

    /// Module-originated broadcast.
    pub fn send_notification(&self, name: &str, payload: Value, sender: &str) -> Result<Vec<String>, BusError> {
        self.publish(name, payload, Some(sender), None)
    }

    /// Route a helper message to every instance of `module_name`. Returns
    /// the number of instances reached.
    pub fn deliver_socket_notification(&self, module_name: &str, name: &str, payload: Value) -> usize {
        let mut queued = Vec::new();
        {
            let mut registry = self.inner.registry();
            for entry in registry.entries_mut().iter_mut().filter(|e| e.data.name == module_name) {
                let mut ctx = ModuleContext::new(entry.data.identifier.as_str(), Arc::clone(&self.inner.translator));
                entry
                    .module
                    .socket_notification_received(name, &payload, &entry.data, &mut ctx);
                queued.push((entry.data.identifier.clone(), ctx.take_commands()));
            }
        }

        let delivered = queued.len();
        for (identifier, commands) in queued {
            self.run_commands(&identifier, commands);
        }
        delivered
    }

    fn run_commands(&self, identifier: &str, commands: Vec<Command>) {
        for command in commands {
            self.run_command(identifier, command);
        }
    }

    fn run_command(&self, identifier: &str, command: Command) {
        debug!("{} requested {:?}", identifier, command);
        match command {
            Command::SendNotification { name, payload } => {
                let _ = self.send_notification(&name, payload, identifier);
            }
            Command::UpdateDom { speed_ms } => {
                let manager = self.clone();
                let identifier = identifier.to_string();
                tokio::spawn(async move {
                    let _ = manager.update_dom(&identifier, speed_ms).await;
                });
            }
            Command::Hide {
                speed_ms,
                callback,
                options,
            } => self.hide(identifier, speed_ms, callback, options),
            Command::Show {
                speed_ms,
                callback,
                options,
            } => self.show(identifier, speed_ms, callback, options),
            Command::SendSocketNotification { name, payload } => self.send_socket_notification(identifier, name, payload),
        }
    }

    fn send_socket_notification(&self, identifier: &str, name: String, payload: Value) {
        let Some(module) = self.inner.registry().get(identifier).map(|e| e.data.name.clone()) else {
            return;
        };
        let transport = self
            .inner
            .transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(transport) = transport else {
            warn!("{} has no helper transport, dropping {}", identifier, name);
            return;
        };

        tokio::spawn(async move {
            if let Err(err) = transport.send(SocketMessage { module, name, payload }).await {
                error!("{}", err);
            }
        });
    }

    /// Re-render a module. With a non-zero `speed_ms` and a visible module
    /// the change is cross-faded: out over half the time, content swapped,
    /// back in over the other half. Resolves when the sequence completes.
    ///
    /// A module without a position is never rendered; the call logs a
    /// warning and returns [`UpdateError::NotDisplayed`].
    pub async fn update_dom(&self, identifier: &str, speed_ms: u64) -> Result<(), UpdateError> {
        let (content, header) = {
            let registry = self.inner.registry();
            let entry = registry
                .get(identifier)
                .ok_or_else(|| UpdateError::UnknownModule(identifier.to_string()))
                .inspect_err(|err| error!("updateDom: {}", err))?;
            if entry.data.position.is_none() {
                let err = UpdateError::NotDisplayed(identifier.to_string());
                warn!("{}", err);
                return Err(err);
            }
            (
                entry.module.dom(&entry.data),
                entry.module.header(&entry.data).unwrap_or_default(),
            )
        };

        let content = content.await.map_err(|source| {
            let err = UpdateError::Content {
                identifier: identifier.to_string(),
                source,
            };
            error!("{:#}", err);
            err
        })?;

        self.update_dom_with_content(identifier, speed_ms, header, content).await
    }

    async fn update_dom_with_content(
        &self,
        identifier: &str,
        speed_ms: u64,
        header: String,
        content: Node,
    ) -> Result<(), UpdateError> {
        if self.is_hidden(identifier) || speed_ms == 0 {
            renderer::apply_update(&mut self.inner.document(), identifier, &header, content);
            return Ok(());
        }

        let changed = {
            let document = self.inner.document();
            renderer::needs_update(&document, identifier, &header, &content)
        };
        if !changed {
            return Ok(());
        }

        let (faded_tx, faded_rx) = oneshot::channel::<()>();
        self.fade_out(
            identifier,
            speed_ms / 2,
            Some(Box::new(move || {
                let _ = faded_tx.send(());
            })),
            HideOptions::default(),
        );
        if faded_rx.await.is_err() {
            debug!("Fade-out of {} was superseded, swapping content anyway", identifier);
        }

        renderer::apply_update(&mut self.inner.document(), identifier, &header, content);

        if !self.is_hidden(identifier) {
            let (shown_tx, shown_rx) = oneshot::channel::<()>();
            self.show(
                identifier,
                speed_ms / 2,
                Some(Box::new(move || {
                    let _ = shown_tx.send(());
                })),
                ShowOptions::default(),
            );
            let _ = shown_rx.await;
        }
        Ok(())
    }

    /// Mark a module hidden right away, fade it out, then take it out of
    /// the layout flow. `options.lock_string` keeps it hidden until that
    /// lock is released by a show.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime: the transition timer is spawned on
    /// the current runtime.
    pub fn hide(&self, identifier: &str, speed_ms: u64, callback: Option<Callback>, options: HideOptions) {
        match self.inner.registry().get_mut(identifier) {
            Some(entry) => entry.hidden = true,
            None => {
                warn!("Cannot hide unknown module {}", identifier);
                return;
            }
        }
        self.fade_out(identifier, speed_ms, callback, options);
    }

    fn fade_out(&self, identifier: &str, speed_ms: u64, callback: Option<Callback>, options: HideOptions) {
        let mut registry = self.inner.registry();
        let Some(entry) = registry.get_mut(identifier) else {
            return;
        };
        if let Some(lock) = options.lock_string {
            if !entry.lock_strings.contains(&lock) {
                entry.lock_strings.push(lock);
            }
        }

        let mut document = self.inner.document();
        let Some(wrapper) = document.wrapper_mut(identifier) else {
            drop(document);
            drop(registry);
            // No wrapper to animate; still report completion.
            if let Some(callback) = callback {
                callback();
            }
            return;
        };
        wrapper.transition_ms = speed_ms;
        wrapper.opacity = 0.0;
        drop(document);

        self.schedule(entry, speed_ms, Some(Flow::Fixed), callback);
    }

    /// Release `options.lock_string`, then show the module unless other
    /// locks remain. A refused show calls `options.on_error` and changes
    /// nothing; `options.force` overrides and clears all locks.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime, like [`hide`](Self::hide).
    pub fn show(&self, identifier: &str, speed_ms: u64, callback: Option<Callback>, options: ShowOptions) {
        let ShowOptions {
            lock_string,
            force,
            on_error,
        } = options;

        let mut registry = self.inner.registry();
        let Some(entry) = registry.get_mut(identifier) else {
            warn!("Cannot show unknown module {}", identifier);
            return;
        };

        if let Some(lock) = &lock_string {
            entry.lock_strings.retain(|l| l != lock);
        }
        if !entry.lock_strings.is_empty() && !force {
            let locks = entry.lock_strings.clone();
            info!("Will not show {}. LockStrings active: {}", entry.data.name, locks.join(","));
            drop(registry);
            if let Some(on_error) = on_error {
                on_error(LockError::LockStringActive { locks });
            }
            return;
        }

        entry.hidden = false;
        if !entry.lock_strings.is_empty() {
            info!("Force show of module: {}", entry.data.name);
            entry.lock_strings.clear();
        }

        let mut document = self.inner.document();
        let Some(wrapper) = document.wrapper_mut(identifier) else {
            drop(document);
            drop(registry);
            if let Some(callback) = callback {
                callback();
            }
            return;
        };
        wrapper.transition_ms = speed_ms;
        wrapper.flow = Flow::Static;
        document.update_wrapper_states();
        if let Some(wrapper) = document.wrapper_mut(identifier) {
            wrapper.opacity = 1.0;
        }
        drop(document);

        self.schedule(entry, speed_ms, None, callback);
    }

    /// Replace the module's pending transition with a timer that applies
    /// `flow` and fires `callback` after `delay_ms`.
    fn schedule(&self, entry: &mut ModuleEntry, delay_ms: u64, flow: Option<Flow>, callback: Option<Callback>) {
        let generation = entry.transition.begin();
        let inner = Arc::downgrade(&self.inner);
        let identifier = entry.data.identifier.clone();

        entry.transition.attach(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let manager = ModuleManager { inner };
            if manager.finish_transition(&identifier, generation, flow) {
                if let Some(callback) = callback {
                    callback();
                }
            }
        });
    }

    fn finish_transition(&self, identifier: &str, generation: u64, flow: Option<Flow>) -> bool {
        let mut registry = self.inner.registry();
        let Some(entry) = registry.get_mut(identifier) else {
            return false;
        };
        if !entry.transition.finish(generation) {
            return false;
        }
        if let Some(flow) = flow {
            let mut document = self.inner.document();
            if let Some(wrapper) = document.wrapper_mut(identifier) {
                wrapper.flow = flow;
            }
            document.update_wrapper_states();
        }
        true
    }

    /// The active module set. Empty until [`modules_started`](Self::modules_started).
    pub fn get_modules(&self) -> ModuleSelection {
        let registry = self.inner.registry();
        if !registry.is_active() {
            return ModuleSelection::default();
        }
        ModuleSelection::new(registry.entries().iter().map(|e| e.data.clone()).collect())
    }

    pub fn module_data(&self, identifier: &str) -> Option<ModuleData> {
        self.inner.registry().get(identifier).map(|e| e.data.clone())
    }

    pub fn module_count(&self) -> usize {
        self.inner.registry().len()
    }

    pub fn is_hidden(&self, identifier: &str) -> bool {
        self.inner
            .registry()
            .get(identifier)
            .is_some_and(|e| e.hidden)
    }

    pub fn lock_strings(&self, identifier: &str) -> Vec<String> {
        self.inner
            .registry()
            .get(identifier)
            .map(|e| e.lock_strings.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the live document.
    pub fn document(&self) -> Document {
        self.inner.document().clone()
    }

    pub fn translator(&self) -> Arc<Translator> {
        Arc::clone(&self.inner.translator)
    }
}
