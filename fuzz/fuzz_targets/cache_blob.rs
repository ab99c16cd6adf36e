#![no_main]

use drawer_search::cache::{CacheStore, is_valid_blob};
use drawer_search::clock::ManualClock;
use drawer_search::config::CacheConfig;
use drawer_search::storage::{KeyValueStorage, MemoryStorage};
use drawer_search::types::SearchPayload;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let _ = is_valid_blob::<SearchPayload>(raw);

    let storage = Arc::new(MemoryStorage::new());
    if storage.set_item("fuzz_cache", raw).is_err() {
        return;
    }
    let store: CacheStore<SearchPayload> = CacheStore::new(
        storage,
        Arc::new(ManualClock::new(0)),
        CacheConfig {
            storage_key: "fuzz_cache".to_string(),
            ttl_ms: 1_000,
            max_entries: 4,
        },
    );
    let _ = store.get("shoe");
    let _ = store.stats();
    store.set(
        "boot",
        SearchPayload {
            query: "boot".to_string(),
            html: String::new(),
            has_results: false,
            result_count: 0,
        },
    );
});
