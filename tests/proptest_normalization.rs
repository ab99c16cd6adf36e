use drawer_search::cache::CacheStore;
use drawer_search::clock::ManualClock;
use drawer_search::config::CacheConfig;
use drawer_search::normalization::{is_searchable, normalize_query, sanitize_for_log};
use drawer_search::storage::MemoryStorage;
use proptest::prelude::*;
use std::sync::Arc;

fn cache(max_entries: usize) -> (CacheStore<u32>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let store = CacheStore::new(
        Arc::new(MemoryStorage::new()),
        clock.clone(),
        CacheConfig {
            storage_key: "prop_cache".to_string(),
            ttl_ms: 1_000_000,
            max_entries,
        },
    );
    (store, clock)
}

proptest! {
    #[test]
    fn sanitize_for_log_is_capped_and_control_free(input in ".{0,500}") {
        let output = sanitize_for_log(&input);
        prop_assert!(output.chars().count() <= 100);
        let has_control = output.chars().any(|ch| {
            let code = ch as u32;
            (0x00..=0x08).contains(&code)
                || code == 0x0B
                || code == 0x0C
                || (0x0E..=0x1F).contains(&code)
                || (0x7F..=0x9F).contains(&code)
        });
        prop_assert!(!has_control);
    }

    #[test]
    fn normalized_query_has_no_outer_whitespace(input in "\\s{0,3}[a-z ]{0,20}\\s{0,3}") {
        let normalized = normalize_query(&input);
        prop_assert_eq!(normalized, normalized.trim());
        prop_assert_eq!(is_searchable(&input, 2), normalized.chars().count() >= 2);
    }

    #[test]
    fn cache_never_exceeds_capacity(
        max_entries in 1usize..8,
        keys in proptest::collection::vec("[a-f]{1,2}", 1..40),
    ) {
        let (store, clock) = cache(max_entries);
        for (index, key) in keys.iter().enumerate() {
            clock.advance(1);
            store.set(key, index as u32);
            prop_assert!(store.stats().entries <= max_entries);
        }
    }

    #[test]
    fn latest_write_is_always_readable(
        keys in proptest::collection::vec("[a-z]{1,4}", 1..20),
    ) {
        let (store, clock) = cache(4);
        for (index, key) in keys.iter().enumerate() {
            clock.advance(1);
            prop_assert!(store.set(key, index as u32));
            prop_assert_eq!(store.get(key), Some(index as u32));
        }
    }
}
