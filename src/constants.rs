pub const CACHE_SCHEMA_VERSION: &str = "1.0";
pub const DEFAULT_CACHE_STORAGE_KEY: &str = "drawer_search_cache";
pub const STORAGE_PROBE_KEY: &str = "__drawer_search_probe__";

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const MAX_DEBOUNCE_MS: u64 = 5_000;
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;
pub const MAX_MIN_QUERY_LENGTH: usize = 32;
pub const DEFAULT_MIN_LOADING_MS: u64 = 300;
pub const MAX_MIN_LOADING_MS: u64 = 5_000;
pub const DEFAULT_NETWORK_TIMEOUT_MS: u64 = 10_000;
pub const MIN_NETWORK_TIMEOUT_MS: u64 = 100;

pub const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1_000;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 50;
pub const MAX_CACHE_MAX_ENTRIES: usize = 1_000;

pub const DEFAULT_MOBILE_RESULTS: usize = 4;
pub const DEFAULT_DESKTOP_RESULTS: usize = 6;
pub const MAX_VIEWPORT_RESULTS: usize = 50;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9292/search";
pub const DEFAULT_RESULT_TYPE: &str = "product";
pub const DEFAULT_SECTION_ID: &str = "drawer-search-results";
pub const DEFAULT_DRAWER_ID: &str = "search-drawer";
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 2_097_152;
pub const DEFAULT_LOG_FILTER: &str = "warn,drawer_search=info";

pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Markup that identifies a rendered product inside a results fragment.
pub const PRODUCT_MARKERS: &[&str] = &["product-card", "data-product-id"];

pub const ERROR_NETWORK: &str = "NETWORK_ERROR";
pub const ERROR_TIMEOUT: &str = "TIMEOUT";
pub const ERROR_HTTP: &str = "HTTP_ERROR";
pub const ERROR_EMPTY_BODY: &str = "EMPTY_BODY";
pub const ERROR_PARSE: &str = "PARSE_ERROR";
pub const ERROR_CANCELLED: &str = "CANCELLED";
pub const ERROR_INTERNAL: &str = "INTERNAL_ERROR";

pub const ENV_DEBOUNCE_MS: &str = "DRAWER_SEARCH_DEBOUNCE_MS";
pub const ENV_MIN_QUERY_LENGTH: &str = "DRAWER_SEARCH_MIN_QUERY_LENGTH";
pub const ENV_MIN_LOADING_MS: &str = "DRAWER_SEARCH_MIN_LOADING_MS";
pub const ENV_NETWORK_TIMEOUT_MS: &str = "DRAWER_SEARCH_NETWORK_TIMEOUT_MS";
pub const ENV_CACHE_TTL_MS: &str = "DRAWER_SEARCH_CACHE_TTL_MS";
pub const ENV_CACHE_MAX_ENTRIES: &str = "DRAWER_SEARCH_CACHE_MAX_ENTRIES";
pub const ENV_CACHE_KEY: &str = "DRAWER_SEARCH_CACHE_KEY";
pub const ENV_CACHE_PATH: &str = "DRAWER_SEARCH_CACHE_PATH";
pub const ENV_MOBILE_RESULTS: &str = "DRAWER_SEARCH_MOBILE_RESULTS";
pub const ENV_DESKTOP_RESULTS: &str = "DRAWER_SEARCH_DESKTOP_RESULTS";
pub const ENV_ENDPOINT: &str = "DRAWER_SEARCH_ENDPOINT";
pub const ENV_RESULT_TYPE: &str = "DRAWER_SEARCH_RESULT_TYPE";
pub const ENV_SECTION_ID: &str = "DRAWER_SEARCH_SECTION_ID";
pub const ENV_MAX_RESPONSE_BYTES: &str = "DRAWER_SEARCH_MAX_RESPONSE_BYTES";
pub const ENV_DRAWER_ID: &str = "DRAWER_SEARCH_DRAWER_ID";
pub const ENV_LOG: &str = "DRAWER_SEARCH_LOG";

pub const FRAGMENT_VIEW: &str = "drawer-search";
pub const PARAM_QUERY: &str = "q";
pub const PARAM_RESULT_TYPE: &str = "type";
pub const PARAM_SECTIONS: &str = "sections";
pub const PARAM_VIEW: &str = "view";
pub const PARAM_CACHE_BUST: &str = "_";
