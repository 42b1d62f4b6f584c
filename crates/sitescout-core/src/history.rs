//! Bounded, most-recent-first cache of completed analyses.

use crate::analysis::AnalysisResult;
use crate::error::Result;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

/// Storage key under which the whole history collection is persisted.
pub const HISTORY_KEY: &str = "sitescout_history";

/// Maximum number of entries kept by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 15;

/// A completed analysis as stored in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "url")]
    pub domain: String,
    pub timestamp: DateTime<Utc>,
    pub data: AnalysisResult,
}

impl HistoryEntry {
    /// Wraps a result with a fresh identifier and the current time, keyed by
    /// the domain reported in the result.
    pub fn new(data: AnalysisResult) -> Self {
        let domain = data.domain().to_string();
        Self::for_domain(domain, data)
    }

    /// Same as [`HistoryEntry::new`] but keyed by the domain that was requested,
    /// which may differ in form from the one the model echoes back.
    pub fn for_domain(domain: impl Into<String>, data: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            domain: domain.into(),
            timestamp: Utc::now(),
            data,
        }
    }
}

/// In-memory ordered view of the history with its replacement policy.
///
/// Holds at most one entry per domain and at most `limit` entries overall,
/// newest first. Persistence goes through a [`KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCache {
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Loads the persisted collection.
    ///
    /// Missing data yields an empty cache. Corrupt data is logged and also
    /// yields an empty cache; it never aborts start-up.
    pub fn restore(store: &dyn KeyValueStore, limit: usize) -> Self {
        let mut cache = Self::with_limit(limit);

        let raw = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return cache,
            Err(err) => {
                error!(error = %err, "Failed to read history");
                return cache;
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(cache.limit);
                debug!(count = entries.len(), "History restored");
                cache.entries = entries;
            }
            Err(err) => error!(error = %err, "Failed to load history"),
        }
        cache
    }

    /// Writes the whole collection under [`HISTORY_KEY`].
    pub fn persist(&self, store: &dyn KeyValueStore) -> Result<()> {
        let serialized = serde_json::to_string(&self.entries)?;
        store.set(HISTORY_KEY, &serialized)
    }

    /// Inserts `entry` at the front, replacing any entry for the same domain,
    /// then trims the collection to the limit.
    pub fn put(&mut self, entry: HistoryEntry) {
        self.entries.retain(|existing| existing.domain != entry.domain);
        self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
    }

    /// Removes the entry with the given id; returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Current entries, most recent first.
    pub fn load_all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn find_by_domain(&self, domain: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.domain == domain)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisDraft;
    use crate::storage::InMemoryKeyValueStore;

    fn result_for(domain: &str) -> AnalysisResult {
        let json = serde_json::json!({
            "url": domain,
            "summary": format!("summary of {domain}"),
            "purpose": "p",
            "howItWorks": "h",
            "requirements": {"functional": [], "technical": [], "userExperience": []},
            "structure": []
        });
        serde_json::from_value::<AnalysisDraft>(json)
            .unwrap()
            .with_sources(vec![])
    }

    #[test]
    fn test_put_replaces_same_domain() {
        let mut cache = SessionCache::new();
        let first = HistoryEntry::new(result_for("https://a.com"));
        let first_id = first.id.clone();
        cache.put(first);
        cache.put(HistoryEntry::new(result_for("https://b.com")));
        cache.put(HistoryEntry::new(result_for("https://a.com")));

        let domains: Vec<&str> = cache.load_all().iter().map(|e| e.domain.as_str()).collect();
        assert_eq!(domains, vec!["https://a.com", "https://b.com"]);
        assert_ne!(cache.load_all()[0].id, first_id);
        assert!(cache.get(&first_id).is_none());
    }

    #[test]
    fn test_sixteenth_entry_evicts_oldest() {
        let mut cache = SessionCache::new();
        for i in 0..15 {
            cache.put(HistoryEntry::new(result_for(&format!("https://site{i}.com"))));
        }
        assert_eq!(cache.len(), 15);
        assert_eq!(cache.load_all()[14].domain, "https://site0.com");

        cache.put(HistoryEntry::new(result_for("https://new.com")));

        assert_eq!(cache.len(), 15);
        assert_eq!(cache.load_all()[0].domain, "https://new.com");
        assert_eq!(cache.load_all()[14].domain, "https://site1.com");
        assert!(cache.find_by_domain("https://site0.com").is_none());
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut cache = SessionCache::new();
        let entry = HistoryEntry::new(result_for("https://a.com"));
        let id = entry.id.clone();
        cache.put(entry);

        assert!(!cache.remove("missing"));
        assert_eq!(cache.len(), 1);
        assert!(cache.remove(&id));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_and_restore() {
        let store = InMemoryKeyValueStore::new();
        let mut cache = SessionCache::new();
        cache.put(HistoryEntry::new(result_for("https://a.com")));
        cache.put(HistoryEntry::new(result_for("https://b.com")));
        cache.persist(&store).unwrap();

        let restored = SessionCache::restore(&store, DEFAULT_HISTORY_LIMIT);
        assert_eq!(restored, cache);
    }

    #[test]
    fn test_restore_corrupt_data_is_empty() {
        let store = InMemoryKeyValueStore::with_entry(HISTORY_KEY, "{not json");
        let cache = SessionCache::restore(&store, DEFAULT_HISTORY_LIMIT);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_restore_respects_limit() {
        let store = InMemoryKeyValueStore::new();
        let mut cache = SessionCache::new();
        for i in 0..5 {
            cache.put(HistoryEntry::new(result_for(&format!("https://s{i}.com"))));
        }
        cache.persist(&store).unwrap();

        let restored = SessionCache::restore(&store, 3);
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.load_all()[0].domain, "https://s4.com");
    }
}
