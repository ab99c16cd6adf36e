#![allow(dead_code)]

use drawer_search::cache::CacheStore;
use drawer_search::client::SearchBackend;
use drawer_search::clock::ManualClock;
use drawer_search::config::{CacheConfig, SessionConfig};
use drawer_search::error::SearchError;
use drawer_search::session::SearchSession;
use drawer_search::storage::MemoryStorage;
use drawer_search::types::{SearchPayload, SessionEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Debug, Default)]
struct Script {
    calls: Vec<String>,
    responses: HashMap<String, Result<SearchPayload, SearchError>>,
    delay: Duration,
}

/// Backend that answers from a script and records every query it sees.
///
/// Unscripted queries containing "zz" find nothing; everything else finds one product.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn with_delay(delay: Duration) -> Self {
        let backend = Self::default();
        backend.script.lock().unwrap().delay = delay;
        backend
    }

    pub fn respond(&self, query: &str, response: Result<SearchPayload, SearchError>) {
        self.script
            .lock()
            .unwrap()
            .responses
            .insert(query.to_string(), response);
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }
}

pub fn products(query: &str, count: usize) -> SearchPayload {
    SearchPayload {
        query: query.to_string(),
        html: "<div class=\"product-card\"></div>".repeat(count),
        has_results: count > 0,
        result_count: count,
    }
}

impl SearchBackend for ScriptedBackend {
    async fn fetch(&self, query: &str) -> Result<SearchPayload, SearchError> {
        let (delay, scripted) = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(query.to_string());
            (script.delay, script.responses.get(query).cloned())
        };
        tokio::time::sleep(delay).await;
        scripted.unwrap_or_else(|| {
            if query.contains("zz") {
                Ok(products(query, 0))
            } else {
                Ok(products(query, 1))
            }
        })
    }
}

pub fn session_config() -> SessionConfig {
    SessionConfig {
        debounce_ms: 500,
        min_query_length: 2,
        min_loading_ms: 300,
        drawer_id: "search-drawer".to_string(),
    }
}

pub fn memory_cache() -> Arc<CacheStore<SearchPayload>> {
    Arc::new(CacheStore::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(ManualClock::new(1_000)),
        CacheConfig {
            storage_key: "drawer_search_cache".to_string(),
            ttl_ms: 300_000,
            max_entries: 50,
        },
    ))
}

pub fn session_with(
    config: SessionConfig,
    backend: ScriptedBackend,
) -> (SearchSession<ScriptedBackend>, broadcast::Receiver<SessionEvent>) {
    let session = SearchSession::new(config, backend, memory_cache());
    let events = session.subscribe();
    (session, events)
}

pub fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

pub async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
