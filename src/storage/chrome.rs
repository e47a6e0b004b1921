/// chrome.storage.sync backend, reached through the extension's JS bridge

use super::{BoxFuture, KeyValueStore};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/newtab.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(key: &str) -> Result<(), JsValue>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeStore;

impl ChromeStore {
    pub fn new() -> Self {
        ChromeStore
    }
}

impl KeyValueStore for ChromeStore {
    fn get(&self, key: &str, default: Value) -> BoxFuture<'_, Value> {
        let key = key.to_string();
        Box::pin(async move {
            match getStorage(&key).await {
                Ok(js) if js.is_null() || js.is_undefined() => default,
                Ok(js) => serde_wasm_bindgen::from_value(js).unwrap_or_else(|e| {
                    log::warn!("Failed to parse storage '{}': {:?}", key, e);
                    default
                }),
                Err(e) => {
                    log::error!("Error getting storage '{}': {:?}", key, e);
                    default
                }
            }
        })
    }

    fn set(&self, key: &str, value: Value) -> BoxFuture<'_, bool> {
        let key = key.to_string();
        Box::pin(async move {
            let serializer = serde_wasm_bindgen::Serializer::json_compatible();
            let js = match value.serialize(&serializer) {
                Ok(js) => js,
                Err(e) => {
                    log::error!("Failed to serialize storage '{}': {:?}", key, e);
                    return false;
                }
            };

            match setStorage(&key, js).await {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Error setting storage '{}': {:?}", key, e);
                    false
                }
            }
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, bool> {
        let key = key.to_string();
        Box::pin(async move {
            match removeStorage(&key).await {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Error removing storage '{}': {:?}", key, e);
                    false
                }
            }
        })
    }
}
