use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{validate_key, ObjectStore, StorageError};

/// In-process object store used by tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail_writes: bool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `put` fails (for error-path tests).
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .ok()
            .and_then(|m| m.get(key).map(|(_, ct)| ct.clone()))
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError> {
        validate_key(key)?;
        if self.fail_writes {
            return Err(StorageError::Backend("write rejected".into()));
        }
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StorageError::Backend("store lock poisoned".into()))?;
        match objects.entry(key.to_string()) {
            Entry::Occupied(_) => return Err(StorageError::AlreadyExists(key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert((bytes.to_vec(), content_type.to_string()));
            }
        }
        Ok(self.get_public_url(key))
    }

    fn get_public_url(&self, key: &str) -> String {
        format!("memory://{key}")
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .lock()
            .map_err(|_| StorageError::Backend("store lock poisoned".into()))?
            .get(key)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get() {
        let store = MemoryObjectStore::new();
        let url = store.put("u/1-a.png", b"abc", "image/png").unwrap();
        assert_eq!(url, "memory://u/1-a.png");
        assert_eq!(store.get("u/1-a.png").unwrap(), b"abc");
        assert_eq!(store.content_type("u/1-a.png").as_deref(), Some("image/png"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn existing_key_is_rejected() {
        let store = MemoryObjectStore::new();
        store.put("u/1-a.png", b"abc", "image/png").unwrap();
        let err = store.put("u/1-a.png", b"xyz", "image/jpeg").unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
        assert_eq!(store.get("u/1-a.png").unwrap(), b"abc");
        assert_eq!(store.content_type("u/1-a.png").as_deref(), Some("image/png"));
    }

    #[test]
    fn failing_store_rejects_writes() {
        let store = MemoryObjectStore::failing();
        assert!(store.put("u/1-a.png", b"abc", "image/png").is_err());
        assert!(store.is_empty());
    }
}
