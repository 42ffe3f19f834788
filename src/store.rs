// The persistence collaborator's interface.
//
// Storage itself lives outside the engine (the application keeps records
// in a browser-style object store). The engine only fixes the contract:
// four named collections, opaque JSON records, and put/get/delete/clear
// keyed by the record's unique id — not its creation timestamp, so two
// records saved in the same millisecond can never collide.
//
// `MemoryStore` is the reference implementation, used by tests and the
// CLI.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The four named collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Compositions,
    Rhythms,
    Config,
    Preferences,
}

/// Keyed-record storage over the named collections.
pub trait RecordStore {
    fn put(&mut self, collection: Collection, key: &str, value: serde_json::Value);
    fn get(&self, collection: Collection, key: &str) -> Option<serde_json::Value>;
    /// Returns true if a record was removed.
    fn delete(&mut self, collection: Collection, key: &str) -> bool;
    fn clear(&mut self, collection: Collection);
    /// All records in a collection, in key order.
    fn all(&self, collection: Collection) -> Vec<serde_json::Value>;
}

/// In-memory [`RecordStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<Collection, BTreeMap<String, serde_json::Value>>,
}

impl RecordStore for MemoryStore {
    fn put(&mut self, collection: Collection, key: &str, value: serde_json::Value) {
        self.collections
            .entry(collection)
            .or_default()
            .insert(key.to_string(), value);
    }

    fn get(&self, collection: Collection, key: &str) -> Option<serde_json::Value> {
        self.collections.get(&collection)?.get(key).cloned()
    }

    fn delete(&mut self, collection: Collection, key: &str) -> bool {
        self.collections
            .get_mut(&collection)
            .is_some_and(|records| records.remove(key).is_some())
    }

    fn clear(&mut self, collection: Collection) {
        if let Some(records) = self.collections.get_mut(&collection) {
            records.clear();
        }
    }

    fn all(&self, collection: Collection) -> Vec<serde_json::Value> {
        self.collections
            .get(&collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }
}
