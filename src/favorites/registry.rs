/// Favorites and groups bound to persistent storage
use super::collection::FavoritesData;
use super::model::{Favorite, Group, GroupUpdate, SiteEntry};
use super::transfer::{ExportDocument, import_into};
use crate::error::Result;
use crate::notify::Notifier;
use crate::storage::{self, FAVORITES_KEY, GROUPS_KEY, KeyValueStore};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Owns the session's favorites and groups.
///
/// The in-memory collections are the source of truth; the store is a
/// best-effort mirror written after every mutation. A failed write is logged
/// and does not roll back the change. Borrows of the collections are never
/// held across a store round-trip, so commands may interleave at those points.
pub struct FavoriteGroupRegistry<S: KeyValueStore> {
    store: Rc<S>,
    data: RefCell<FavoritesData>,
    notifier: Notifier,
}

impl<S: KeyValueStore> FavoriteGroupRegistry<S> {
    pub fn new(store: Rc<S>) -> Self {
        FavoriteGroupRegistry {
            store,
            data: RefCell::new(FavoritesData::new()),
            notifier: Notifier::new(),
        }
    }

    /// Call `listener` after every successful mutation
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.notifier.subscribe(listener);
    }

    /// Increases with every mutation
    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }

    /// Run `f` against the current collections
    pub fn with_data<R>(&self, f: impl FnOnce(&FavoritesData) -> R) -> R {
        f(&self.data.borrow())
    }

    pub fn snapshot(&self) -> FavoritesData {
        self.data.borrow().clone()
    }

    pub fn favorites(&self) -> Vec<Favorite> {
        self.data.borrow().favorites().to_vec()
    }

    pub fn groups(&self) -> Vec<Group> {
        self.data.borrow().groups().to_vec()
    }

    /// Load from storage, repairing missing default group and group references.
    /// Repairs are written back immediately.
    pub async fn load(&self) {
        let favorites: Vec<Favorite> = storage::load_json_list(&*self.store, FAVORITES_KEY).await;
        let groups: Vec<Group> = storage::load_json_list(&*self.store, GROUPS_KEY).await;

        let (data, repaired) = FavoritesData::from_parts(favorites, groups);
        log::info!(
            "Loaded {} favorites in {} groups",
            data.favorites().len(),
            data.groups().len()
        );
        *self.data.borrow_mut() = data;

        if repaired {
            log::info!("Repaired stored favorites, saving");
            self.persist_groups().await;
            self.persist_favorites().await;
        }
        self.notifier.notify();
    }

    pub async fn add_favorite(
        &self,
        name: &str,
        url: &str,
        icon: Option<&str>,
        group_id: Option<&str>,
    ) -> Result<Favorite> {
        let favorite = self.data.borrow_mut().add_favorite(name, url, icon, group_id)?;
        log::info!("Added favorite {} ({})", favorite.name, favorite.url);

        self.persist_favorites().await;
        self.notifier.notify();
        Ok(favorite)
    }

    /// Returns how many favorites were added; invalid entries are skipped
    pub async fn add_favorites_bulk(&self, sites: &[SiteEntry], group_id: Option<&str>) -> usize {
        let added = self.data.borrow_mut().add_favorites_bulk(sites, group_id);
        log::info!("Bulk added {} of {} sites", added, sites.len());

        if added > 0 {
            self.persist_favorites().await;
            self.notifier.notify();
        }
        added
    }

    pub async fn remove_favorite(&self, id: &str) {
        if self.data.borrow_mut().remove_favorite(id) {
            log::info!("Removed favorite {}", id);
        } else {
            log::debug!("Favorite {} already gone", id);
        }

        self.persist_favorites().await;
        self.notifier.notify();
    }

    pub async fn move_favorite(&self, id: &str, group_id: &str) -> Result<bool> {
        let moved = self.data.borrow_mut().move_favorite(id, group_id)?;

        if moved {
            log::info!("Moved favorite {} to group {}", id, group_id);
            self.persist_favorites().await;
            self.notifier.notify();
        }
        Ok(moved)
    }

    pub async fn create_group(&self, name: &str, color: Option<&str>) -> Group {
        let group = self.data.borrow_mut().create_group(name, color);
        log::info!("Created group {} ({})", group.name, group.id);

        self.persist_groups().await;
        self.notifier.notify();
        group
    }

    pub async fn edit_group(&self, id: &str, updates: GroupUpdate) -> Option<Group> {
        let group = self.data.borrow_mut().edit_group(id, updates)?;
        log::info!("Edited group {}", id);

        self.persist_groups().await;
        self.notifier.notify();
        Some(group)
    }

    /// Remove a group, refiling its favorites. False for unknown or last group.
    pub async fn remove_group(&self, id: &str) -> bool {
        if !self.data.borrow_mut().remove_group(id) {
            return false;
        }
        log::info!("Removed group {}", id);

        self.persist_groups().await;
        self.persist_favorites().await;
        self.notifier.notify();
        true
    }

    /// Merge an export file; returns how many favorites were added
    pub async fn import_favorites(&self, contents: &str) -> Result<usize> {
        let count = import_into(&mut self.data.borrow_mut(), contents)?;

        self.persist_groups().await;
        self.persist_favorites().await;
        self.notifier.notify();
        Ok(count)
    }

    pub fn export_favorites(&self) -> ExportDocument {
        ExportDocument::new(&self.data.borrow())
    }

    async fn persist_favorites(&self) -> bool {
        let value = to_json(self.data.borrow().favorites());
        match value {
            Some(value) => storage::write(&*self.store, FAVORITES_KEY, value).await,
            None => false,
        }
    }

    async fn persist_groups(&self) -> bool {
        let value = to_json(self.data.borrow().groups());
        match value {
            Some(value) => storage::write(&*self.store, GROUPS_KEY, value).await,
            None => false,
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| log::error!("Failed to serialize: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::storage::MemoryStore;
    use pollster::block_on;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::collections::HashSet;

    fn create_test_registry() -> (Rc<MemoryStore>, FavoriteGroupRegistry<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        let registry = FavoriteGroupRegistry::new(store.clone());
        block_on(registry.load());
        (store, registry)
    }

    fn stored(store: &MemoryStore, key: &str) -> Value {
        block_on(store.get(key, Value::Null))
    }

    #[test]
    fn test_load_empty_store_creates_and_saves_default_group() {
        let (store, registry) = create_test_registry();

        let groups = registry.groups();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_default);
        assert_eq!(stored(&store, GROUPS_KEY)[0]["isDefault"], true);
        assert_eq!(registry.revision(), 1);
    }

    #[test]
    fn test_load_backfills_group_ids() {
        let store = Rc::new(MemoryStore::new());
        block_on(store.set(
            FAVORITES_KEY,
            json!([
                { "id": 1, "name": "Google", "url": "https://www.google.com/", "icon": "fab fa-google" },
                { "id": 2, "name": "Broken" }
            ]),
        ));
        let registry = FavoriteGroupRegistry::new(store.clone());

        block_on(registry.load());

        let default_id = registry.groups()[0].id.clone();
        let favorites = registry.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].group_id.as_deref(), Some(default_id.as_str()));
        assert_eq!(stored(&store, FAVORITES_KEY)[0]["groupId"], json!(default_id));
    }

    #[test]
    fn test_load_keeps_existing_default() {
        let (store, registry) = create_test_registry();
        let default_id = registry.groups()[0].id.clone();

        let reloaded = FavoriteGroupRegistry::new(store.clone());
        block_on(reloaded.load());

        assert_eq!(reloaded.groups().len(), 1);
        assert_eq!(reloaded.groups()[0].id, default_id);
    }

    #[test]
    fn test_add_favorite_persists_and_notifies() {
        let (store, registry) = create_test_registry();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        registry.subscribe(move || counter.set(counter.get() + 1));

        let favorite = block_on(registry.add_favorite("GitHub", " https://github.com ", None, None)).unwrap();

        assert_eq!(favorite.url, "https://github.com");
        assert_eq!(registry.favorites().len(), 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(stored(&store, FAVORITES_KEY)[0]["url"], "https://github.com");
    }

    #[test]
    fn test_add_favorite_errors_leave_state_unchanged() {
        let (_store, registry) = create_test_registry();
        block_on(registry.add_favorite("A", "https://a.com", None, None)).unwrap();
        let revision = registry.revision();

        let duplicate = block_on(registry.add_favorite("A", "https://a.com", None, None));
        let invalid = block_on(registry.add_favorite("B", "not a url", None, None));

        assert_eq!(duplicate, Err(DashboardError::DuplicateFavorite));
        assert_eq!(invalid, Err(DashboardError::InvalidUrl));
        assert_eq!(registry.favorites().len(), 1);
        assert_eq!(registry.revision(), revision);
    }

    #[test]
    fn test_failed_write_keeps_in_memory_change() {
        let (store, registry) = create_test_registry();
        store.set_fail_writes(true);

        block_on(registry.add_favorite("A", "https://a.com", None, None)).unwrap();

        assert_eq!(registry.favorites().len(), 1);
        assert_eq!(stored(&store, FAVORITES_KEY), json!([]));
    }

    #[test]
    fn test_load_repairs_repeated_urls_and_ids() {
        let store = Rc::new(MemoryStore::new());
        block_on(store.set(
            FAVORITES_KEY,
            json!([
                {"id": 1700000000000u64, "name": "A", "url": "https://a.com"},
                {"id": 1700000000000u64, "name": "A", "url": "https://a.com"},
                {"id": 1700000000001u64, "name": "B", "url": "https://b.com"},
                {"id": 1700000000001u64, "name": "C", "url": "https://c.com"}
            ]),
        ));
        let registry = FavoriteGroupRegistry::new(store.clone());
        block_on(registry.load());

        assert_eq!(stored(&store, FAVORITES_KEY).as_array().map(Vec::len), Some(3));

        block_on(registry.remove_favorite("1700000000001"));

        let urls: Vec<String> = registry.favorites().into_iter().map(|f| f.url).collect();
        assert_eq!(urls, vec!["https://a.com".to_string(), "https://c.com".to_string()]);
    }

    #[test]
    fn test_bulk_add_notifies_only_when_something_added() {
        let (_store, registry) = create_test_registry();
        let revision = registry.revision();

        let none = block_on(registry.add_favorites_bulk(&[SiteEntry::new("", "")], None));
        assert_eq!(none, 0);
        assert_eq!(registry.revision(), revision);

        let sites = [SiteEntry::new("", "https://a.com"), SiteEntry::new("", "https://a.com")];
        assert_eq!(block_on(registry.add_favorites_bulk(&sites, None)), 1);
        assert_eq!(registry.revision(), revision + 1);
    }

    #[test]
    fn test_remove_favorite_absent_is_not_an_error() {
        let (_store, registry) = create_test_registry();
        let favorite = block_on(registry.add_favorite("A", "https://a.com", None, None)).unwrap();

        block_on(registry.remove_favorite(&favorite.id));
        block_on(registry.remove_favorite(&favorite.id));

        assert!(registry.favorites().is_empty());
    }

    #[test]
    fn test_remove_default_group_reassigns_to_second() {
        let (store, registry) = create_test_registry();
        let default_id = registry.groups()[0].id.clone();
        block_on(registry.add_favorite("A", "https://a.com", None, None)).unwrap();
        block_on(registry.add_favorite("B", "https://b.com", None, None)).unwrap();
        let second = block_on(registry.create_group("Second", None));

        assert!(block_on(registry.remove_group(&default_id)));

        let groups = registry.groups();
        assert!(groups.iter().all(|g| g.id != default_id));
        assert!(groups[0].is_default);
        assert!(registry.favorites().iter().all(|f| f.group_id.as_deref() == Some(second.id.as_str())));
        assert_eq!(stored(&store, GROUPS_KEY).as_array().unwrap().len(), 1);
        assert_eq!(stored(&store, FAVORITES_KEY)[1]["groupId"], json!(second.id));
    }

    #[test]
    fn test_remove_last_group_refused() {
        let (_store, registry) = create_test_registry();
        let default_id = registry.groups()[0].id.clone();

        assert!(!block_on(registry.remove_group(&default_id)));
        assert_eq!(registry.groups().len(), 1);
    }

    #[test]
    fn test_edit_and_move() {
        let (store, registry) = create_test_registry();
        let work = block_on(registry.create_group("Work", Some("#00ff00")));
        let favorite = block_on(registry.add_favorite("A", "https://a.com", None, None)).unwrap();

        let edited = block_on(registry.edit_group(
            &work.id,
            GroupUpdate { name: Some("Office".to_string()), color: None },
        ));
        let moved = block_on(registry.move_favorite(&favorite.id, &work.id));

        assert_eq!(edited.unwrap().name, "Office");
        assert_eq!(moved, Ok(true));
        assert_eq!(stored(&store, GROUPS_KEY)[1]["name"], "Office");
        assert_eq!(stored(&store, FAVORITES_KEY)[0]["groupId"], json!(work.id));
        assert!(block_on(registry.edit_group("missing", GroupUpdate::default())).is_none());
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_store, registry) = create_test_registry();
        let work = block_on(registry.create_group("Work", None));
        block_on(registry.add_favorite("A", "https://a.com", None, None)).unwrap();
        block_on(registry.add_favorite("B", "https://b.com", None, Some(&work.id))).unwrap();
        let exported = registry.export_favorites().to_json();

        let (store, fresh) = create_test_registry();
        let count = block_on(fresh.import_favorites(&exported)).unwrap();

        let original: HashSet<String> = registry.favorites().into_iter().map(|f| f.url).collect();
        let imported: HashSet<String> = fresh.favorites().into_iter().map(|f| f.url).collect();
        assert_eq!(count, 2);
        assert_eq!(imported, original);
        assert_eq!(stored(&store, FAVORITES_KEY).as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_import_invalid_file() {
        let (_store, registry) = create_test_registry();
        let result = block_on(registry.import_favorites(r#"{"groups": []}"#));
        assert!(matches!(result, Err(DashboardError::InvalidFileFormat(_))));
    }

    #[test]
    fn test_with_data_queries() {
        let (_store, registry) = create_test_registry();
        block_on(registry.add_favorite("GitHub", "https://github.com", None, None)).unwrap();

        let hits = registry.with_data(|data| data.search("git").len());
        let buckets = registry.with_data(|data| data.grouped().len());

        assert_eq!(hits, 1);
        assert_eq!(buckets, 1);
        assert_eq!(registry.snapshot().favorites().len(), 1);
    }
}
