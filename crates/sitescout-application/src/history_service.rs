//! Persisted analysis history.
//!
//! Owns the [`SessionCache`] and writes it back through the [`KeyValueStore`]
//! after every change. Needs no credentials, so history commands work without
//! a configured API key.

use sitescout_core::analysis::AnalysisResult;
use sitescout_core::domain::normalize_domain;
use sitescout_core::error::{Result, SiteScoutError};
use sitescout_core::history::{HistoryEntry, SessionCache};
use sitescout_core::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct HistoryService {
    store: Arc<dyn KeyValueStore>,
    cache: Mutex<SessionCache>,
}

impl HistoryService {
    /// Restores the persisted history, keeping at most `limit` entries.
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        let cache = SessionCache::restore(store.as_ref(), limit);
        Self {
            store,
            cache: Mutex::new(cache),
        }
    }

    /// Entries, most recent first.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.cache.lock().await.load_all().to_vec()
    }

    pub async fn entry(&self, id: &str) -> Result<HistoryEntry> {
        self.cache
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SiteScoutError::not_found("History entry", id))
    }

    /// Cached analysis for user input such as `a.com`.
    pub async fn find(&self, input: &str) -> Option<HistoryEntry> {
        let domain = normalize_domain(input)?;
        self.cache.lock().await.find_by_domain(&domain).cloned()
    }

    /// Stores a completed analysis under the requested domain.
    ///
    /// A failed write is logged; the in-memory history is still updated.
    pub async fn record(&self, domain: &str, result: AnalysisResult) -> HistoryEntry {
        let entry = HistoryEntry::for_domain(domain, result);
        let mut cache = self.cache.lock().await;
        cache.put(entry.clone());
        if let Err(err) = cache.persist(self.store.as_ref()) {
            warn!(error = %err, "Failed to persist history");
        }
        debug!(%domain, entry_id = %entry.id, "History entry recorded");
        entry
    }

    /// Removes an entry; returns whether it existed.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut cache = self.cache.lock().await;
        let removed = cache.remove(id);
        if removed {
            cache.persist(self.store.as_ref())?;
        }
        Ok(removed)
    }

    /// Removes every entry; returns how many there were.
    pub async fn clear(&self) -> Result<usize> {
        let mut cache = self.cache.lock().await;
        let removed = cache.len();
        cache.clear();
        cache.persist(self.store.as_ref())?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitescout_core::analysis::AnalysisDraft;
    use sitescout_core::history::HISTORY_KEY;
    use sitescout_core::storage::InMemoryKeyValueStore;

    fn result_for(domain: &str) -> AnalysisResult {
        let draft: AnalysisDraft = serde_json::from_value(serde_json::json!({
            "url": domain,
            "summary": "s",
            "purpose": "p",
            "howItWorks": "h",
            "requirements": {"functional": [], "technical": [], "userExperience": []},
            "structure": []
        }))
        .unwrap();
        draft.with_sources(vec![])
    }

    #[tokio::test]
    async fn test_record_find_and_reload() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let history = HistoryService::new(store.clone(), 15);

        let entry = history.record("https://a.com", result_for("https://www.a.com")).await;
        assert_eq!(entry.domain, "https://a.com");
        assert_eq!(history.find("a.com").await.map(|e| e.id), Some(entry.id.clone()));
        assert!(history.find("www.a.com").await.is_none());

        let reloaded = HistoryService::new(store, 15);
        assert_eq!(reloaded.entry(&entry.id).await.unwrap(), entry);
    }

    #[tokio::test]
    async fn test_remove_and_clear_persist() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let history = HistoryService::new(store.clone(), 15);
        let a = history.record("https://a.com", result_for("https://a.com")).await;
        history.record("https://b.com", result_for("https://b.com")).await;

        assert!(history.remove(&a.id).await.unwrap());
        assert!(!history.remove(&a.id).await.unwrap());
        assert!(history.entry(&a.id).await.unwrap_err().is_not_found());
        assert_eq!(HistoryService::new(store.clone(), 15).entries().await.len(), 1);

        assert_eq!(history.clear().await.unwrap(), 1);
        assert!(history.entries().await.is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_corrupt_store_starts_empty() {
        let store = Arc::new(InMemoryKeyValueStore::with_entry(HISTORY_KEY, "garbage"));
        assert!(HistoryService::new(store, 15).entries().await.is_empty());
    }
}
