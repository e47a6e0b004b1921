/// In-memory store for native builds and tests

use super::{BoxFuture, KeyValueStore};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set`/`remove` fail, like a full or revoked storage area
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str, default: Value) -> BoxFuture<'_, Value> {
        let value = self.values.borrow().get(key).cloned().unwrap_or(default);
        Box::pin(async move { value })
    }

    fn set(&self, key: &str, value: Value) -> BoxFuture<'_, bool> {
        let key = key.to_string();
        Box::pin(async move {
            if self.fail_writes.get() {
                return false;
            }
            self.values.borrow_mut().insert(key, value);
            true
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, bool> {
        let key = key.to_string();
        Box::pin(async move {
            if self.fail_writes.get() {
                return false;
            }
            self.values.borrow_mut().remove(&key);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use serde_json::json;

    #[test]
    fn test_get_returns_default_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(block_on(store.get("favorites", json!([]))), json!([]));
    }

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new();

        assert!(block_on(store.set("settings", json!({"theme": "dark"}))));
        assert_eq!(block_on(store.get("settings", Value::Null)), json!({"theme": "dark"}));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        block_on(store.set("widget_a", json!({"notes": "hi"})));

        assert!(block_on(store.remove("widget_a")));
        assert!(!store.contains("widget_a"));
        assert!(block_on(store.remove("widget_a")));
    }

    #[test]
    fn test_failing_writes_leave_data_untouched() {
        let store = MemoryStore::new();
        block_on(store.set("groups", json!([1])));
        store.set_fail_writes(true);

        assert!(!block_on(store.set("groups", json!([2]))));
        assert!(!block_on(store.remove("groups")));
        assert_eq!(block_on(store.get("groups", Value::Null)), json!([1]));
    }
}
