use super::KeyValueStore;
use crate::error::{FarmError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage for testing.
///
/// Uses `RefCell` for interior mutability since stores are single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `KeyValueStore` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemStore {
    values: RefCell<HashMap<String, String>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Enable read error simulation for testing the seed fallback.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Stores a raw value directly, bypassing error simulation.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.values.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(FarmError::PersistenceFailed(
                "Simulated read error".to_string(),
            ));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(FarmError::PersistenceFailed(
                "Simulated write error".to_string(),
            ));
        }
        self.insert_raw(key, value);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_values() {
        let store = MemStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn simulated_write_error_leaves_value_untouched() {
        let store = MemStore::new();
        store.set("k", "old").unwrap();
        store.set_simulate_write_error(true);

        assert!(matches!(
            store.set("k", "new"),
            Err(FarmError::PersistenceFailed(_))
        ));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
    }
}
