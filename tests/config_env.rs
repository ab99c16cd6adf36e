use drawer_search::config::RuntimeConfig;
use serial_test::serial;

const VARS: [&str; 6] = [
    "DRAWER_SEARCH_DEBOUNCE_MS",
    "DRAWER_SEARCH_MIN_QUERY_LENGTH",
    "DRAWER_SEARCH_CACHE_MAX_ENTRIES",
    "DRAWER_SEARCH_SECTION_ID",
    "DRAWER_SEARCH_NETWORK_TIMEOUT_MS",
    "DRAWER_SEARCH_CACHE_PATH",
];

#[test]
#[serial]
fn defaults_apply_without_environment() {
    temp_env::with_vars_unset(VARS, || {
        let config = RuntimeConfig::from_env();
        assert_eq!(config.session.debounce_ms, 500);
        assert_eq!(config.session.min_query_length, 2);
        assert_eq!(config.session.min_loading_ms, 300);
        assert_eq!(config.cache.ttl_ms, 300_000);
        assert_eq!(config.cache.max_entries, 50);
        assert_eq!(config.cache.storage_key, "drawer_search_cache");
        assert_eq!(
            config.storefront.section_id.as_deref(),
            Some("drawer-search-results")
        );
        assert_eq!(config.result_limits.mobile, 4);
        assert_eq!(config.result_limits.desktop, 6);
        assert!(config.cache_path.is_none());
    });
}

#[test]
#[serial]
fn out_of_range_values_are_clamped() {
    temp_env::with_vars(
        [
            ("DRAWER_SEARCH_DEBOUNCE_MS", Some("999999")),
            ("DRAWER_SEARCH_MIN_QUERY_LENGTH", Some("0")),
            ("DRAWER_SEARCH_CACHE_MAX_ENTRIES", Some("0")),
            ("DRAWER_SEARCH_NETWORK_TIMEOUT_MS", Some("5")),
        ],
        || {
            let config = RuntimeConfig::from_env();
            assert_eq!(config.session.debounce_ms, 5_000);
            assert_eq!(config.session.min_query_length, 1);
            assert_eq!(config.cache.max_entries, 1);
            assert_eq!(config.storefront.network_timeout_ms, 100);
        },
    );
}

#[test]
#[serial]
fn unparseable_values_fall_back_to_defaults() {
    temp_env::with_vars(
        [
            ("DRAWER_SEARCH_DEBOUNCE_MS", Some("soon")),
            ("DRAWER_SEARCH_CACHE_MAX_ENTRIES", Some("-3")),
        ],
        || {
            let config = RuntimeConfig::from_env();
            assert_eq!(config.session.debounce_ms, 500);
            assert_eq!(config.cache.max_entries, 50);
        },
    );
}

#[test]
#[serial]
fn empty_section_id_selects_fragment_mode() {
    temp_env::with_var("DRAWER_SEARCH_SECTION_ID", Some("  "), || {
        assert_eq!(RuntimeConfig::from_env().storefront.section_id, None);
    });
}
