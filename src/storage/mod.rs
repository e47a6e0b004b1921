/// Key-value persistence for the dashboard (chrome.storage.sync in the browser)

mod memory;

#[cfg(target_arch = "wasm32")]
mod chrome;

pub use memory::MemoryStore;

#[cfg(target_arch = "wasm32")]
pub use chrome::ChromeStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

pub const FAVORITES_KEY: &str = "favorites";
pub const GROUPS_KEY: &str = "groups";
pub const WIDGETS_KEY: &str = "widgets";
pub const SETTINGS_KEY: &str = "settings";

/// Boxed future for store operations. Not `Send`: browser handles are single-threaded.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Async string-keyed store of JSON values.
///
/// Reads never fail: a missing or unreadable key yields `default`.
/// Writes report success as a bool and are never retried.
pub trait KeyValueStore {
    fn get(&self, key: &str, default: Value) -> BoxFuture<'_, Value>;

    fn set(&self, key: &str, value: Value) -> BoxFuture<'_, bool>;

    fn remove(&self, key: &str) -> BoxFuture<'_, bool>;
}

/// Storage key holding a widget's own data blob
pub fn widget_data_key(widget_id: &str) -> String {
    format!("widget_{}", widget_id)
}

/// Read `key` and decode it, falling back to `default` when absent or undecodable
pub async fn load_json<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let value = store.get(key, Value::Null).await;
    if value.is_null() {
        return default;
    }

    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Discarding unreadable data under '{}': {}", key, e);
            default
        }
    }
}

/// Read a JSON array under `key`, decoding each element on its own.
/// Elements that fail to decode are dropped so one bad entry cannot wipe the list.
pub async fn load_json_list<S, T>(store: &S, key: &str) -> Vec<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let values = match store.get(key, Value::Array(Vec::new())).await {
        Value::Array(values) => values,
        Value::Null => Vec::new(),
        other => {
            log::warn!("Expected a list under '{}', found {}", key, other);
            Vec::new()
        }
    };

    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Dropping unreadable entry under '{}': {}", key, e);
                None
            }
        })
        .collect()
}

/// Encode `value` and write it under `key`
pub async fn save_json<S, T>(store: &S, key: &str, value: &T) -> bool
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(json) => write(store, key, json).await,
        Err(e) => {
            log::warn!("Failed to serialize '{}': {}", key, e);
            false
        }
    }
}

/// Write an already-encoded value, logging failures
pub async fn write<S>(store: &S, key: &str, value: Value) -> bool
where
    S: KeyValueStore + ?Sized,
{
    let ok = store.set(key, value).await;
    if !ok {
        log::warn!("Failed to persist '{}'", key);
    }
    ok
}
