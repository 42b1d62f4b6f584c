use sitescout_core::analysis::{AnalysisDraft, AnalysisResult};
use sitescout_core::history::{DEFAULT_HISTORY_LIMIT, HISTORY_KEY, HistoryEntry, SessionCache};
use sitescout_core::storage::KeyValueStore;
use sitescout_infrastructure::{FileKeyValueStore, SiteScoutPaths};
use tempfile::TempDir;

fn result_for(domain: &str) -> AnalysisResult {
    let json = serde_json::json!({
        "url": domain,
        "summary": "s",
        "purpose": "p",
        "howItWorks": "h",
        "requirements": {"functional": ["f"], "technical": [], "userExperience": []},
        "structure": [{"page": "/", "description": "home"}]
    });
    serde_json::from_value::<AnalysisDraft>(json)
        .unwrap()
        .with_sources(vec![])
}

#[test]
fn test_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let paths = SiteScoutPaths::rooted_at(temp_dir.path());

    {
        let store = FileKeyValueStore::new(paths.store_dir());
        let mut cache = SessionCache::restore(&store, DEFAULT_HISTORY_LIMIT);
        assert!(cache.is_empty());

        cache.put(HistoryEntry::new(result_for("https://a.com")));
        cache.put(HistoryEntry::new(result_for("https://b.com")));
        cache.persist(&store).unwrap();
    }

    let store = FileKeyValueStore::new(paths.store_dir());
    let cache = SessionCache::restore(&store, DEFAULT_HISTORY_LIMIT);
    let domains: Vec<&str> = cache.load_all().iter().map(|e| e.domain.as_str()).collect();
    assert_eq!(domains, vec!["https://b.com", "https://a.com"]);
    assert_eq!(cache.load_all()[1].data.requirements().functional, vec!["f".to_string()]);
}

#[test]
fn test_corrupt_history_file_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let paths = SiteScoutPaths::rooted_at(temp_dir.path());
    let store = FileKeyValueStore::new(paths.store_dir());
    store.set(HISTORY_KEY, "[{\"id\": 1,").unwrap();

    let mut cache = SessionCache::restore(&store, DEFAULT_HISTORY_LIMIT);
    assert!(cache.is_empty());

    cache.put(HistoryEntry::new(result_for("https://a.com")));
    cache.persist(&store).unwrap();
    assert_eq!(SessionCache::restore(&store, DEFAULT_HISTORY_LIMIT).len(), 1);
}
