//! Per-user personalization artifacts.
//!
//! The server holds one store in its shared state. Records are opaque JSON
//! values keyed by user id; nothing is persisted across restarts.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

/// Keyed storage for personalization records.
pub trait PersonalizationStore: Send + Sync {
    /// Store a record, replacing any previous one for the user.
    fn put(&self, user_id: &str, record: Value);

    /// Fetch a user's record.
    fn get(&self, user_id: &str) -> Option<Value>;

    /// Remove a user's record. Returns whether one existed.
    fn delete(&self, user_id: &str) -> bool;
}

/// Process-local store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryPersonalizationStore {
    records: RwLock<HashMap<String, Value>>,
}

impl InMemoryPersonalizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersonalizationStore for InMemoryPersonalizationStore {
    fn put(&self, user_id: &str, record: Value) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.to_string(), record);
    }

    fn get(&self, user_id: &str) -> Option<Value> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    fn delete(&self, user_id: &str) -> bool {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id)
            .is_some()
    }
}
