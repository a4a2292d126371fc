use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::DraftStorage;

/// A restart-proof staging area for one form, scoped to a string key.
///
/// Construction loads the persisted value for the key; a missing or
/// unparseable payload falls back to the initial value without surfacing
/// an error. Every mutation is persisted immediately; persistence faults
/// are swallowed so editing keeps working in memory.
///
/// Instances do not share in-memory state, even under the same key - each
/// call site owns its instance, and the durable entry is the only common
/// ground.
pub struct Draft<T> {
    key: String,
    initial: T,
    value: T,
    storage: Arc<dyn DraftStorage>,
}

impl<T: Clone + Serialize + DeserializeOwned> Draft<T> {
    pub fn new(storage: Arc<dyn DraftStorage>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = match storage.get(&key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(saved) => saved,
                Err(e) => {
                    debug!(key = %key, error = %e, "Discarding unparseable draft");
                    initial.clone()
                }
            },
            None => initial.clone(),
        };
        Self {
            key,
            initial,
            value,
            storage,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the draft value and persist it.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Derive the next value from the previous one, then persist.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        self.value = f(&self.value);
        self.persist();
    }

    /// Reset to the initial value and drop the durable copy, so a later
    /// construction for this key starts fresh.
    pub fn clear(&mut self) {
        self.storage.remove(&self.key);
        self.value = self.initial.clone();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.value) {
            Ok(raw) => self.storage.put(&self.key, &raw),
            Err(e) => debug!(key = %self.key, error = %e, "Failed to serialize draft"),
        }
    }
}
