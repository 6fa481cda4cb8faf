//! Session storage capability injected into controllers.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Key/value session storage.
///
/// Implementations back this with whatever the application uses (cookie
/// store, Redis, ...). Methods take `&self` so one store can be shared by the
/// dispatcher and the controller it builds.
pub trait SessionStore: Send + Sync {
    fn get(&self, name: &str) -> Option<Value>;
    fn set(&self, name: &str, value: Value);
    fn remove(&self, name: &str);
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, name: &str) -> Option<Value> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(name).cloned()
    }

    fn set(&self, name: &str, value: Value) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(name.to_owned(), value);
    }

    fn remove(&self, name: &str) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(name);
    }
}
