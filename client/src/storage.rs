use gloo_storage::{LocalStorage, Storage};
use migration_map_shared::KeyValueStore;
use serde_json::Value;

/// View-state persistence backed by the browser's `localStorage`. Values are
/// stored as JSON under the bare key names so other pages on the same origin
/// can read them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<Value> {
        LocalStorage::get::<Value>(key).ok()
    }

    fn set(&mut self, key: &str, value: Value) {
        if let Err(e) = LocalStorage::set(key, &value) {
            log::warn!("failed to persist {key}: {e}");
        }
    }
}
