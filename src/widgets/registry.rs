/// Active widget instances and their persisted records
use super::{Widget, WidgetAction, WidgetDescriptor, builtin_descriptors};
use crate::error::{DashboardError, Result};
use crate::favorites::id_string;
use crate::notify::Notifier;
use crate::random::unique_id;
use crate::storage::{self, KeyValueStore, WIDGETS_KEY, widget_data_key};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

/// One entry of the stored `widgets` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub config: Value,
}

impl WidgetRecord {
    fn of(widget: &dyn Widget) -> WidgetRecord {
        WidgetRecord {
            kind: widget.kind().to_string(),
            id: widget.id().to_string(),
            config: widget.config().clone(),
        }
    }
}

/// Creates widgets by tag and keeps the `widgets` list in step with them.
///
/// Each widget's own state lives under `widget_<id>`; it is written after an
/// action or settings change reports a change and deleted with the widget.
pub struct WidgetRegistry<S: KeyValueStore> {
    store: Rc<S>,
    descriptors: Vec<WidgetDescriptor>,
    widgets: RefCell<Vec<Box<dyn Widget>>>,
    notifier: Notifier,
}

impl<S: KeyValueStore> WidgetRegistry<S> {
    /// Registry with no widget kinds registered
    pub fn new(store: Rc<S>) -> Self {
        WidgetRegistry {
            store,
            descriptors: Vec::new(),
            widgets: RefCell::new(Vec::new()),
            notifier: Notifier::new(),
        }
    }

    pub fn with_builtin(store: Rc<S>) -> Self {
        let mut registry = Self::new(store);
        for descriptor in builtin_descriptors() {
            registry.register(descriptor);
        }
        registry
    }

    /// Register a widget kind; a later registration of the same tag replaces the earlier one
    pub fn register(&mut self, descriptor: WidgetDescriptor) {
        self.descriptors.retain(|d| d.tag != descriptor.tag);
        self.descriptors.push(descriptor);
    }

    pub fn descriptors(&self) -> &[WidgetDescriptor] {
        &self.descriptors
    }

    fn descriptor(&self, tag: &str) -> Option<&WidgetDescriptor> {
        self.descriptors.iter().find(|d| d.tag == tag)
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.notifier.subscribe(listener);
    }

    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }

    /// Run `f` against the active widgets, in display order
    pub fn with_widgets<R>(&self, f: impl FnOnce(&[Box<dyn Widget>]) -> R) -> R {
        f(&self.widgets.borrow())
    }

    pub fn records(&self) -> Vec<WidgetRecord> {
        self.widgets
            .borrow()
            .iter()
            .map(|w| WidgetRecord::of(w.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.widgets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.borrow().is_empty()
    }

    /// `(widget id, url)` for every widget waiting on a fetch
    pub fn pending_fetches(&self) -> Vec<(String, String)> {
        self.widgets
            .borrow()
            .iter()
            .filter_map(|w| w.pending_fetch().map(|url| (w.id().to_string(), url)))
            .collect()
    }

    /// Rebuild instances from the stored list, hydrating each from its own blob.
    /// Records with an unregistered tag are skipped.
    pub async fn load(&self) {
        let records: Vec<WidgetRecord> = storage::load_json_list(&*self.store, WIDGETS_KEY).await;

        let mut loaded: Vec<Box<dyn Widget>> = Vec::with_capacity(records.len());
        for record in records {
            let Some(descriptor) = self.descriptor(&record.kind).copied() else {
                log::warn!("Skipping widget {} of unknown type '{}'", record.id, record.kind);
                continue;
            };
            if loaded.iter().any(|w| w.id() == record.id) {
                log::warn!("Skipping duplicate widget id {}", record.id);
                continue;
            }

            let data = self.store.get(&widget_data_key(&record.id), json!({})).await;
            let mut widget = (descriptor.create)(record.id, record.config);
            widget.initialize(&data);
            loaded.push(widget);
        }
        log::info!("Loaded {} widgets", loaded.len());

        let previous = std::mem::replace(&mut *self.widgets.borrow_mut(), loaded);
        for mut widget in previous {
            widget.destroy();
        }
        self.notifier.notify();
    }

    /// Create a widget of kind `tag` with a fresh id and append it
    pub async fn add_widget(&self, tag: &str, config: Value) -> Result<WidgetRecord> {
        let descriptor = self
            .descriptor(tag)
            .ok_or_else(|| DashboardError::UnknownWidgetType(tag.to_string()))?;

        let id = {
            let widgets = self.widgets.borrow();
            let suffix = unique_id(|candidate| {
                let id = format!("{}_{}", tag, candidate);
                widgets.iter().any(|w| w.id() == id)
            });
            format!("{}_{}", tag, suffix)
        };

        let mut widget = (descriptor.create)(id, config);
        widget.initialize(&json!({}));
        let record = WidgetRecord::of(widget.as_ref());
        self.widgets.borrow_mut().push(widget);
        log::info!("Added {} widget {}", record.kind, record.id);

        self.persist_list().await;
        self.notifier.notify();
        Ok(record)
    }

    /// Remove a widget and its stored data. False when no widget has `id`.
    pub async fn remove_widget(&self, id: &str) -> bool {
        let removed = {
            let mut widgets = self.widgets.borrow_mut();
            let index = widgets.iter().position(|w| w.id() == id);
            index.map(|i| widgets.remove(i))
        };
        let Some(mut widget) = removed else {
            log::debug!("Widget {} already gone", id);
            return false;
        };
        widget.destroy();
        log::info!("Removed widget {}", id);

        self.persist_list().await;
        if !self.store.remove(&widget_data_key(id)).await {
            log::warn!("Failed to remove data of widget {}", id);
        }
        self.notifier.notify();
        true
    }

    /// Route a user interaction to widget `id`, saving its data if it changed
    pub async fn widget_action(&self, id: &str, action: WidgetAction) -> bool {
        let data = self.update(id, |widget| widget.apply(action));
        self.save_widget_data(id, data).await
    }

    /// Apply a settings dialog answer to widget `id`
    pub async fn update_widget_settings(&self, id: &str, value: &str) -> bool {
        let data = self.update(id, |widget| widget.apply_settings(value));
        self.save_widget_data(id, data).await
    }

    // Returns the widget's data when `change` reports a change.
    fn update(&self, id: &str, change: impl FnOnce(&mut Box<dyn Widget>) -> bool) -> Option<Value> {
        let mut widgets = self.widgets.borrow_mut();
        let Some(widget) = widgets.iter_mut().find(|w| w.id() == id) else {
            log::warn!("No widget with id {}", id);
            return None;
        };
        change(&mut *widget).then(|| widget.data())
    }

    async fn save_widget_data(&self, id: &str, data: Option<Value>) -> bool {
        let Some(data) = data else {
            return false;
        };
        storage::write(&*self.store, &widget_data_key(id), data).await;
        self.notifier.notify();
        true
    }

    async fn persist_list(&self) -> bool {
        let records = self.records();
        storage::save_json(&*self.store, WIDGETS_KEY, &records).await
    }
}
