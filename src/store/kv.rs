use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;

/// Key-value blob storage injected into everything that persists state.
///
/// Values are opaque strings (JSON documents in practice).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

/// In-process store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set_delete() {
        let store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.delete("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete("missing").is_ok());
    }

    #[test]
    fn test_shared_reference_is_a_store() {
        fn write_through<S: KeyValueStore>(store: S) {
            store.set("k", "v").unwrap();
        }
        let store = MemoryStore::new();
        write_through(&store);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
