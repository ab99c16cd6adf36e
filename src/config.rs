use crate::constants::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_STORAGE_KEY, DEFAULT_CACHE_TTL_MS,
    DEFAULT_DEBOUNCE_MS, DEFAULT_DESKTOP_RESULTS, DEFAULT_DRAWER_ID, DEFAULT_ENDPOINT,
    DEFAULT_LOG_FILTER, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_MIN_LOADING_MS,
    DEFAULT_MIN_QUERY_LENGTH, DEFAULT_MOBILE_RESULTS, DEFAULT_NETWORK_TIMEOUT_MS,
    DEFAULT_RESULT_TYPE, DEFAULT_SECTION_ID, ENV_CACHE_KEY, ENV_CACHE_MAX_ENTRIES,
    ENV_CACHE_PATH, ENV_CACHE_TTL_MS, ENV_DEBOUNCE_MS, ENV_DESKTOP_RESULTS, ENV_DRAWER_ID,
    ENV_ENDPOINT, ENV_LOG, ENV_MAX_RESPONSE_BYTES, ENV_MIN_LOADING_MS, ENV_MIN_QUERY_LENGTH,
    ENV_MOBILE_RESULTS, ENV_NETWORK_TIMEOUT_MS, ENV_RESULT_TYPE, ENV_SECTION_ID,
    MAX_CACHE_MAX_ENTRIES, MAX_DEBOUNCE_MS, MAX_MIN_LOADING_MS, MAX_MIN_QUERY_LENGTH,
    MAX_VIEWPORT_RESULTS, MIN_NETWORK_TIMEOUT_MS,
};
use crate::types::Viewport;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimits {
    pub mobile: usize,
    pub desktop: usize,
}

impl ResultLimits {
    #[must_use]
    pub const fn for_viewport(&self, viewport: Viewport) -> usize {
        match viewport {
            Viewport::Mobile => self.mobile,
            Viewport::Desktop => self.desktop,
        }
    }
}

impl Default for ResultLimits {
    fn default() -> Self {
        Self {
            mobile: DEFAULT_MOBILE_RESULTS,
            desktop: DEFAULT_DESKTOP_RESULTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub storage_key: String,
    pub ttl_ms: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CACHE_STORAGE_KEY.to_string(),
            ttl_ms: DEFAULT_CACHE_TTL_MS,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub debounce_ms: u64,
    pub min_query_length: usize,
    pub min_loading_ms: u64,
    pub drawer_id: String,
}

impl SessionConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn min_loading(&self) -> Duration {
        Duration::from_millis(self.min_loading_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            min_loading_ms: DEFAULT_MIN_LOADING_MS,
            drawer_id: DEFAULT_DRAWER_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub endpoint: String,
    pub result_type: String,
    pub section_id: Option<String>,
    pub network_timeout_ms: u64,
    pub max_response_bytes: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            result_type: DEFAULT_RESULT_TYPE.to_string(),
            section_id: Some(DEFAULT_SECTION_ID.to_string()),
            network_timeout_ms: DEFAULT_NETWORK_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub session: SessionConfig,
    pub cache: CacheConfig,
    pub storefront: StorefrontConfig,
    pub result_limits: ResultLimits,
    pub cache_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            cache: CacheConfig::default(),
            storefront: StorefrontConfig::default(),
            result_limits: ResultLimits::default(),
            cache_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let session = SessionConfig {
            debounce_ms: get_env_u64(ENV_DEBOUNCE_MS)
                .unwrap_or(DEFAULT_DEBOUNCE_MS)
                .min(MAX_DEBOUNCE_MS),
            min_query_length: get_env_usize(ENV_MIN_QUERY_LENGTH)
                .unwrap_or(DEFAULT_MIN_QUERY_LENGTH)
                .clamp(1, MAX_MIN_QUERY_LENGTH),
            min_loading_ms: get_env_u64(ENV_MIN_LOADING_MS)
                .unwrap_or(DEFAULT_MIN_LOADING_MS)
                .min(MAX_MIN_LOADING_MS),
            drawer_id: get_env_non_empty(ENV_DRAWER_ID)
                .unwrap_or_else(|| DEFAULT_DRAWER_ID.to_string()),
        };

        let cache = CacheConfig {
            storage_key: get_env_non_empty(ENV_CACHE_KEY)
                .unwrap_or_else(|| DEFAULT_CACHE_STORAGE_KEY.to_string()),
            ttl_ms: get_env_u64(ENV_CACHE_TTL_MS)
                .unwrap_or(DEFAULT_CACHE_TTL_MS)
                .max(1),
            max_entries: get_env_usize(ENV_CACHE_MAX_ENTRIES)
                .unwrap_or(DEFAULT_CACHE_MAX_ENTRIES)
                .clamp(1, MAX_CACHE_MAX_ENTRIES),
        };

        // An explicitly empty section id switches the client to raw fragment mode.
        let section_id = match std::env::var(ENV_SECTION_ID) {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value.trim().to_string()),
            Err(_) => Some(DEFAULT_SECTION_ID.to_string()),
        };

        let storefront = StorefrontConfig {
            endpoint: get_env_non_empty(ENV_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            result_type: get_env_non_empty(ENV_RESULT_TYPE)
                .unwrap_or_else(|| DEFAULT_RESULT_TYPE.to_string()),
            section_id,
            network_timeout_ms: get_env_u64(ENV_NETWORK_TIMEOUT_MS)
                .unwrap_or(DEFAULT_NETWORK_TIMEOUT_MS)
                .max(MIN_NETWORK_TIMEOUT_MS),
            max_response_bytes: get_env_usize(ENV_MAX_RESPONSE_BYTES)
                .unwrap_or(DEFAULT_MAX_RESPONSE_BYTES)
                .max(1_024),
        };

        let result_limits = ResultLimits {
            mobile: get_env_usize(ENV_MOBILE_RESULTS)
                .unwrap_or(DEFAULT_MOBILE_RESULTS)
                .clamp(1, MAX_VIEWPORT_RESULTS),
            desktop: get_env_usize(ENV_DESKTOP_RESULTS)
                .unwrap_or(DEFAULT_DESKTOP_RESULTS)
                .clamp(1, MAX_VIEWPORT_RESULTS),
        };

        let cache_path = get_env_non_empty(ENV_CACHE_PATH).map(PathBuf::from);

        let log_filter =
            std::env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Self {
            session,
            cache,
            storefront,
            result_limits,
            cache_path,
            log_filter,
        }
    }
}

fn get_env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn get_env_usize(name: &str) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
}

fn get_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
}
