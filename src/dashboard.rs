/// Everything the new-tab page works with, over one shared store
use crate::favorites::FavoriteGroupRegistry;
use crate::notify::Notifier;
use crate::settings::{Layout, Settings, Theme};
use crate::storage::KeyValueStore;
use crate::widgets::WidgetRegistry;
use std::cell::RefCell;
use std::rc::Rc;

pub struct Dashboard<S: KeyValueStore> {
    store: Rc<S>,
    favorites: FavoriteGroupRegistry<S>,
    widgets: WidgetRegistry<S>,
    settings: RefCell<Settings>,
    notifier: Notifier,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Dashboard with the built-in widget kinds registered
    pub fn new(store: Rc<S>) -> Self {
        Dashboard {
            favorites: FavoriteGroupRegistry::new(store.clone()),
            widgets: WidgetRegistry::with_builtin(store.clone()),
            settings: RefCell::new(Settings::default()),
            notifier: Notifier::new(),
            store,
        }
    }

    pub fn favorites(&self) -> &FavoriteGroupRegistry<S> {
        &self.favorites
    }

    pub fn widgets(&self) -> &WidgetRegistry<S> {
        &self.widgets
    }

    pub fn settings(&self) -> Settings {
        self.settings.borrow().clone()
    }

    /// Called after every settings change
    pub fn subscribe_settings(&self, listener: impl Fn() + 'static) {
        self.notifier.subscribe(listener);
    }

    pub fn settings_revision(&self) -> u64 {
        self.notifier.revision()
    }

    /// Load favorites, widgets and settings, in that order
    pub async fn load(&self) {
        self.favorites.load().await;
        self.widgets.load().await;

        let settings = Settings::load(&*self.store).await;
        log::info!("Loaded settings: theme {}, layout {}", settings.theme, settings.layout);
        *self.settings.borrow_mut() = settings;
        self.notifier.notify();
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.update_settings(|s| {
            s.theme = theme;
            true
        })
        .await;
    }

    /// Switch to the next theme and return it
    pub async fn cycle_theme(&self) -> Theme {
        let mut theme = Theme::default();
        self.update_settings(|s| {
            theme = s.cycle_theme();
            true
        })
        .await;
        theme
    }

    pub async fn set_layout(&self, layout: Layout) {
        self.update_settings(|s| {
            s.layout = layout;
            true
        })
        .await;
    }

    pub async fn set_background(&self, image_url: &str) {
        self.update_settings(|s| {
            s.set_background(image_url);
            true
        })
        .await;
    }

    /// False when `color` is not a hex color; the old color stays
    pub async fn set_custom_color(&self, color: &str) -> bool {
        self.update_settings(|s| s.set_custom_color(color)).await
    }

    pub async fn set_title(&self, title: &str) {
        self.update_settings(|s| {
            s.set_title(title);
            true
        })
        .await;
    }

    pub async fn reset_settings(&self) {
        self.update_settings(|s| {
            *s = Settings::default();
            true
        })
        .await;
    }

    async fn update_settings(&self, change: impl FnOnce(&mut Settings) -> bool) -> bool {
        let settings = {
            let mut settings = self.settings.borrow_mut();
            if !change(&mut settings) {
                return false;
            }
            settings.clone()
        };
        log::debug!("Settings changed: {:?}", settings);

        settings.save(&*self.store).await;
        self.notifier.notify();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SETTINGS_KEY};
    use pollster::block_on;
    use serde_json::{Value, json};

    fn create_test_dashboard() -> (Rc<MemoryStore>, Dashboard<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        let dashboard = Dashboard::new(store.clone());
        block_on(dashboard.load());
        (store, dashboard)
    }

    fn stored_settings(store: &MemoryStore) -> Value {
        block_on(store.get(SETTINGS_KEY, Value::Null))
    }

    #[test]
    fn test_load_reads_all_three() {
        let store = Rc::new(MemoryStore::new());
        block_on(store.set(SETTINGS_KEY, json!({ "theme": "dark" })));
        block_on(store.set("widgets", json!([{ "type": "clock", "id": "clock_1", "config": {} }])));
        let dashboard = Dashboard::new(store.clone());

        block_on(dashboard.load());

        assert_eq!(dashboard.settings().theme, Theme::Dark);
        assert_eq!(dashboard.widgets().len(), 1);
        assert_eq!(dashboard.favorites().groups().len(), 1);
    }

    #[test]
    fn test_cycle_theme_persists() {
        let (store, dashboard) = create_test_dashboard();

        assert_eq!(block_on(dashboard.cycle_theme()), Theme::Dark);
        assert_eq!(stored_settings(&store)["theme"], "dark");
        assert_eq!(dashboard.settings_revision(), 2);
    }

    #[test]
    fn test_invalid_color_neither_saves_nor_notifies() {
        let (store, dashboard) = create_test_dashboard();
        let revision = dashboard.settings_revision();

        assert!(!block_on(dashboard.set_custom_color("nope")));
        assert_eq!(dashboard.settings_revision(), revision);
        assert_eq!(stored_settings(&store), Value::Null);

        assert!(block_on(dashboard.set_custom_color("#123")));
        assert_eq!(stored_settings(&store)["customColor"], "#123");
    }

    #[test]
    fn test_setters_and_reset() {
        let (store, dashboard) = create_test_dashboard();

        block_on(dashboard.set_theme(Theme::Custom));
        block_on(dashboard.set_layout(Layout::Compact));
        block_on(dashboard.set_background("https://img.example/a.png"));
        block_on(dashboard.set_title("Start"));

        let settings = dashboard.settings();
        assert_eq!(settings.theme, Theme::Custom);
        assert_eq!(settings.layout, Layout::Compact);
        assert_eq!(settings.background_image, "https://img.example/a.png");
        assert_eq!(stored_settings(&store)["dashboardTitle"], "Start");

        block_on(dashboard.reset_settings());
        assert_eq!(dashboard.settings(), Settings::default());
        assert_eq!(stored_settings(&store)["layout"], "grid");
    }
}
