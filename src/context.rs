//! In-memory key/value scope threaded through one task execution.
//!
//! Context is internal task state, not external state: `WriteContext`
//! mutates it even during a dry run. Clones share the same map, which is
//! how parallel branches see each other's writes; concurrent writers to
//! the same key are last-writer-wins.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default)]
pub struct ContextMap {
    inner: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().unwrap().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.inner.lock().unwrap().insert(key.into(), value);
    }

    /// All entries at this moment, for inspection in tests and logs.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.inner.lock().unwrap().clone()
    }
}
