//! Injectable key-value storage interface.
//!
//! All persisted state lives in a handful of independently keyed JSON
//! documents (see [`keys`]). The trait deliberately mirrors the tolerant
//! semantics of browser local storage: reads of absent or malformed data
//! fall back to a default, and write failures are logged and swallowed.
//! The worst outcome is stale or default data, never a crash.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys. Each key holds one JSON document.
pub mod keys {
    /// Flat list of habits.
    pub const HABITS: &str = "habits";
    /// Flat list of habit completion logs.
    pub const HABIT_LOGS: &str = "habit_logs";
    /// Flat list of tasks.
    pub const TASKS: &str = "tasks";
    /// Flat list of notes.
    pub const NOTES: &str = "notes";
    /// Flat list of study resources.
    pub const RESOURCES: &str = "resources";
    /// Sessions that are planned but not started. Never feed analytics.
    pub const SCHEDULED_SESSIONS: &str = "scheduled_sessions";
    /// The at-most-one session currently running or paused.
    pub const ACTIVE_SESSION: &str = "active_session";
    /// Terminated sessions with final durations. The sole analytics input.
    pub const COMPLETED_SESSIONS: &str = "completed_sessions";
    /// Persistent timer state, stored separately from session metadata.
    pub const ACTIVE_TIMER: &str = "active_timer";
    /// Pre-migration session list. Read once, then deleted.
    pub const LEGACY_SESSIONS: &str = "sessions";
}

/// Key-value storage with tolerant JSON (de)serialization.
///
/// Implementors provide the three raw operations; the typed helpers are
/// shared. `&self` receivers keep the interface usable behind shared
/// references, so implementations use interior mutability where needed.
pub trait Store {
    /// Returns the raw JSON document for `key`, or `None` if absent.
    fn read_raw(&self, key: &str) -> Option<String>;

    /// Stores a raw JSON document under `key`. Failures must not panic.
    fn write_raw(&self, key: &str, json: &str);

    /// Deletes `key`. Idempotent: removing an absent key is a no-op.
    fn remove(&self, key: &str);

    /// Reads and deserializes the value at `key`.
    ///
    /// Returns `None` when the key is absent or the stored document does
    /// not parse. Corruption is logged, never propagated.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "discarding malformed stored document");
                None
            }
        }
    }

    /// Reads a list-valued key, falling back to an empty list.
    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read(key).unwrap_or_default()
    }

    /// Serializes and stores `value` under `key`.
    ///
    /// Serialization or write failures are logged and swallowed; callers
    /// proceed with in-memory state that may be stale relative to storage.
    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.write_raw(key, &json),
            Err(err) => tracing::warn!(key, %err, "failed to serialize document"),
        }
    }

    /// Returns whether `key` holds any document (parsed or not).
    fn contains(&self, key: &str) -> bool {
        self.read_raw(key).is_some()
    }
}

/// In-memory store backed by a `HashMap`.
///
/// Used as a test double and for ephemeral runs. Data is lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read_raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn write_raw(&self, key: &str, json: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), json.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_absent_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.read::<Vec<String>>("missing"), None);
        assert!(store.read_list::<String>("missing").is_empty());
    }

    #[test]
    fn write_then_read_roundtrips() {
        let store = MemoryStore::new();
        store.write(keys::HABITS, &vec!["reading".to_string()]);
        let habits: Vec<String> = store.read_list(keys::HABITS);
        assert_eq!(habits, ["reading"]);
    }

    #[test]
    fn malformed_document_falls_back_to_none() {
        let store = MemoryStore::new();
        store.write_raw(keys::TASKS, "{not json");
        assert_eq!(store.read::<Vec<String>>(keys::TASKS), None);
        assert!(store.read_list::<String>(keys::TASKS).is_empty());
        // The raw document is still present until overwritten
        assert!(store.contains(keys::TASKS));
    }

    #[test]
    fn remove_is_idempotent() {
        let store = MemoryStore::new();
        store.write_raw("k", "1");
        store.remove("k");
        store.remove("k");
        assert!(!store.contains("k"));
    }
}
