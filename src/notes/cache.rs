use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, warn};

use super::ExtractedNotes;
use crate::error::StorageError;

/// String key/value storage with `localStorage` semantics.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// The browser's `window.localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(format!("{e:?}"))
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

/// In-process store, used off the browser.
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Last extracted notes per pull request, stored under `notes-<id>`.
/// Last write wins; entries never expire.
pub struct NotesCache<S> {
    store: S,
}

impl NotesCache<LocalStore> {
    /// Cache backed by `localStorage`, if the browser exposes one.
    pub fn browser() -> Option<Self> {
        match LocalStore::open() {
            Ok(store) => Some(Self::new(store)),
            Err(e) => {
                warn!("Notes cache unavailable: {e}");
                None
            }
        }
    }
}

impl<S: KeyValueStore> NotesCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn key(id: &str) -> String {
        format!("notes-{id}")
    }

    /// Unreadable or malformed entries are reported as a miss.
    pub fn get(&self, id: &str) -> Option<ExtractedNotes> {
        match self.load(id) {
            Ok(notes) => notes,
            Err(e) => {
                warn!("Failed to load saved notes for {id}: {e}");
                None
            }
        }
    }

    fn load(&self, id: &str) -> Result<Option<ExtractedNotes>, StorageError> {
        let Some(raw) = self.store.get_item(&Self::key(id))? else {
            return Ok(None);
        };
        let notes: ExtractedNotes = serde_json::from_str(&raw)?;
        Ok(Some(notes.with_fallbacks()))
    }

    pub fn set(&self, id: &str, notes: &ExtractedNotes) -> Result<(), StorageError> {
        let raw = serde_json::to_string(notes)?;
        self.store.set_item(&Self::key(id), &raw)?;
        debug!("Saved notes for {id}");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.store.remove_item(&Self::key(id))?;
        debug!("Cleared notes for {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(developer: &str) -> ExtractedNotes {
        ExtractedNotes {
            developer: developer.into(),
            marketing: "m".into(),
            contributors: "c".into(),
            related_issues: "r".into(),
        }
    }

    #[test]
    fn test_set_then_get() {
        let cache = NotesCache::new(MemoryStore::new());
        cache.set("1", &notes("A")).unwrap();
        assert_eq!(cache.get("1"), Some(notes("A")));
        assert_eq!(cache.get("2"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = NotesCache::new(MemoryStore::new());
        cache.set("1", &notes("A")).unwrap();
        cache.set("1", &notes("B")).unwrap();
        assert_eq!(cache.get("1"), Some(notes("B")));
    }

    #[test]
    fn test_delete_clears_entry() {
        let cache = NotesCache::new(MemoryStore::new());
        cache.set("1", &notes("A")).unwrap();
        cache.delete("1").unwrap();
        assert_eq!(cache.get("1"), None);
    }

    #[test]
    fn test_stored_under_prefixed_key() {
        let store = MemoryStore::new();
        NotesCache::new(&store).set("17", &notes("A")).unwrap();
        let raw = store.get_item("notes-17").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["developer"], "A");
        assert_eq!(json["relatedIssues"], "r");
    }

    #[test]
    fn test_malformed_entry_is_a_miss() {
        let store = MemoryStore::new();
        store.set_item("notes-3", "{not json").unwrap();
        assert_eq!(NotesCache::new(&store).get("3"), None);
    }

    #[test]
    fn test_older_entries_get_fallbacks() {
        let store = MemoryStore::new();
        store
            .set_item("notes-5", r#"{"developer":"d","marketing":"m"}"#)
            .unwrap();
        let loaded = NotesCache::new(&store).get("5").unwrap();
        assert_eq!(loaded.developer, "d");
        assert_eq!(loaded.contributors, "No contributors identified");
        assert_eq!(loaded.related_issues, "No related issues identified");
    }
}
