use crate::cache::CacheStore;
use crate::client::{SearchBackend, StorefrontClient};
use crate::clock::{Clock, SystemClock};
use crate::config::RuntimeConfig;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::error::SearchError;
use crate::session::SearchSession;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::types::{CacheStats, DrawerSignal, SearchPayload};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Composition point: one cache, one drawer, one search session.
#[derive(Debug)]
pub struct DrawerSearchService<B = StorefrontClient> {
    config: RuntimeConfig,
    cache: Arc<CacheStore<SearchPayload>>,
    session: SearchSession<B>,
    drawer_signals: broadcast::Sender<DrawerSignal>,
}

impl DrawerSearchService<StorefrontClient> {
    /// Builds the storefront client and storage described by `config`.
    pub fn new(config: RuntimeConfig) -> Result<Self, SearchError> {
        let storage = open_storage(&config);
        let client = StorefrontClient::new(config.storefront.clone())?;
        Ok(Self::from_parts(
            config,
            client,
            storage,
            Arc::new(SystemClock),
        ))
    }
}

impl<B: SearchBackend> DrawerSearchService<B> {
    pub fn from_parts(
        config: RuntimeConfig,
        backend: B,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Arc::new(CacheStore::new(storage, clock, config.cache.clone()));
        let session = SearchSession::new(config.session.clone(), backend, Arc::clone(&cache));
        let (drawer_signals, receiver) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        session.attach_lifecycle(receiver);

        info!(
            session = %session.id(),
            cache_enabled = cache.is_enabled(),
            drawer = %config.session.drawer_id,
            "drawer search ready"
        );

        Self {
            config,
            cache,
            session,
            drawer_signals,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[must_use]
    pub const fn session(&self) -> &SearchSession<B> {
        &self.session
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<CacheStore<SearchPayload>> {
        &self.cache
    }

    #[must_use]
    pub fn drawer_signals(&self) -> broadcast::Sender<DrawerSignal> {
        self.drawer_signals.clone()
    }

    pub fn open_drawer(&self) {
        self.signal(DrawerSignal::Opened {
            drawer_id: self.config.session.drawer_id.clone(),
        });
    }

    pub fn close_drawer(&self) {
        self.signal(DrawerSignal::Closed {
            drawer_id: self.config.session.drawer_id.clone(),
        });
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn signal(&self, signal: DrawerSignal) {
        let _ = self.drawer_signals.send(signal);
    }
}

fn open_storage(config: &RuntimeConfig) -> Arc<dyn KeyValueStorage> {
    let Some(path) = &config.cache_path else {
        return Arc::new(MemoryStorage::new());
    };
    match FileStorage::open(path) {
        Ok(storage) => Arc::new(storage),
        Err(error) => {
            warn!(%error, path = %path.display(), "cache directory unusable");
            Arc::new(MemoryStorage::unavailable())
        }
    }
}
