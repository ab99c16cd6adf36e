use crate::cache::CacheStore;
use crate::client::SearchBackend;
use crate::config::SessionConfig;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::error::SearchError;
use crate::normalization::{is_searchable, normalize_query, query_length, sanitize_for_log};
use crate::types::{
    DrawerSignal, EventData, ResetReason, SearchPayload, SessionEvent, SessionState,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug)]
struct ActiveRequest {
    generation: u64,
    token: CancellationToken,
    user_initiated: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct SessionCore {
    current: SessionState,
    query: String,
    generation: u64,
    searching_since: Option<Instant>,
    debounce: Option<JoinHandle<()>>,
    active: Option<ActiveRequest>,
}

impl SessionCore {
    fn abort_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
    }
}

/// Point-in-time view of a session, for renderers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub query: String,
    pub generation: u64,
    pub debounce_pending: bool,
    pub request_in_flight: bool,
}

#[derive(Debug)]
struct Inner<B> {
    id: Uuid,
    config: SessionConfig,
    backend: B,
    cache: Arc<CacheStore<SearchPayload>>,
    events: broadcast::Sender<SessionEvent>,
    core: Mutex<SessionCore>,
}

/// Drawer search session: keystrokes in, ordered state transitions out.
///
/// A session owns at most one pending debounce task and at most one in-flight
/// request. Every keystroke or reset bumps a generation counter; deferred work
/// carries the generation it was started under and is dropped on mismatch, so
/// a late response can never overwrite state set by newer input.
///
/// All methods must be called from within a tokio runtime.
#[derive(Debug)]
pub struct SearchSession<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for SearchSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: SearchBackend> SearchSession<B> {
    pub fn new(
        config: SessionConfig,
        backend: B,
        cache: Arc<CacheStore<SearchPayload>>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                config,
                backend,
                cache,
                events,
                core: Mutex::new(SessionCore::default()),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<CacheStore<SearchPayload>> {
        &self.inner.cache
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.lock_core().current
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let core = self.lock_core();
        SessionSnapshot {
            state: core.current,
            query: core.query.clone(),
            generation: core.generation,
            debounce_pending: core.debounce.is_some(),
            request_in_flight: core.active.is_some(),
        }
    }

    /// Handles the input text changing to `text`.
    pub fn input(&self, text: &str) {
        let mut core = self.lock_core();
        core.query = text.to_string();
        core.generation += 1;
        core.abort_debounce();
        self.cancel_active(&mut core, false);

        let query = normalize_query(text).to_string();
        let length = query_length(text);

        if length == 0 {
            core.searching_since = None;
            self.transition(&mut core, SessionState::Idle, None);
            return;
        }

        if length < self.inner.config.min_query_length {
            core.searching_since = None;
            self.transition(
                &mut core,
                SessionState::Hint,
                Some(EventData::Query { query }),
            );
            return;
        }

        // Only the keystroke that crosses the threshold enters `searching`,
        // so the loading indicator is not restarted on every character.
        if core.current != SessionState::Searching {
            core.searching_since = Some(Instant::now());
            self.transition(
                &mut core,
                SessionState::Searching,
                Some(EventData::Query {
                    query: query.clone(),
                }),
            );
            self.emit(SessionEvent::Started { query });
        }

        self.schedule_debounce(&mut core);
    }

    /// Enter: runs the pending search now instead of waiting out the debounce.
    pub fn submit(&self) -> bool {
        let mut core = self.lock_core();
        if core.current != SessionState::Searching
            || !is_searchable(&core.query, self.inner.config.min_query_length)
        {
            return false;
        }
        let Some(handle) = core.debounce.take() else {
            return false;
        };
        handle.abort();
        debug!(session = %self.inner.id, "debounce bypassed by submit");
        let generation = core.generation;
        let query = normalize_query(&core.query).to_string();
        drop(core);
        self.begin_lookup(generation, query);
        true
    }

    /// Aborts the in-flight request on the user's behalf; the session lands in `error`.
    pub fn cancel(&self) -> bool {
        let core = self.lock_core();
        let Some(active) = core.active.as_ref() else {
            return false;
        };
        active.user_initiated.store(true, Ordering::SeqCst);
        active.token.cancel();
        info!(session = %self.inner.id, "search cancelled by user");
        true
    }

    pub fn escape(&self) {
        self.reset(ResetReason::Escape);
    }

    pub fn clear(&self) {
        self.reset(ResetReason::Cleared);
    }

    /// Resets the session if `drawer_id` names the drawer that owns it.
    pub fn drawer_closed(&self, drawer_id: &str) -> bool {
        if drawer_id != self.inner.config.drawer_id {
            return false;
        }
        self.reset(ResetReason::DrawerClosed);
        true
    }

    /// Listens for drawer lifecycle signals until the sender side goes away.
    pub fn attach_lifecycle(
        &self,
        mut signals: broadcast::Receiver<DrawerSignal>,
    ) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            loop {
                match signals.recv().await {
                    Ok(DrawerSignal::Closed { drawer_id }) => {
                        session.drawer_closed(&drawer_id);
                    }
                    Ok(DrawerSignal::Opened { .. }) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(session = %session.inner.id, skipped, "missed drawer signals");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn reset(&self, reason: ResetReason) {
        let mut core = self.lock_core();
        core.generation += 1;
        core.abort_debounce();
        self.cancel_active(&mut core, true);
        core.query.clear();
        core.searching_since = None;
        debug!(session = %self.inner.id, reason = reason.as_str(), "session reset");
        self.emit(SessionEvent::Reset { reason });
        self.transition(&mut core, SessionState::Idle, None);
    }

    fn schedule_debounce(&self, core: &mut SessionCore) {
        let generation = core.generation;
        let delay = self.inner.config.debounce();
        let session = self.clone();
        core.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.debounce_elapsed(generation);
        }));
    }

    fn debounce_elapsed(&self, generation: u64) {
        let mut core = self.lock_core();
        if core.generation != generation || core.current != SessionState::Searching {
            return;
        }
        // Detach rather than abort: this is the task currently running.
        core.debounce = None;
        let query = normalize_query(&core.query).to_string();
        drop(core);
        self.begin_lookup(generation, query);
    }

    /// Runs without the session lock held: cache reads may touch storage.
    fn begin_lookup(&self, generation: u64, query: String) {
        let cached = self.inner.cache.get(&query);

        let mut core = self.lock_core();
        if core.generation != generation {
            return;
        }

        if let Some(payload) = cached {
            let deadline = self.loading_deadline(&core);
            drop(core);
            debug!(
                session = %self.inner.id,
                query = %sanitize_for_log(&query),
                "serving search from cache"
            );
            let session = self.clone();
            tokio::spawn(async move {
                if let Some(deadline) = deadline {
                    tokio::time::sleep_until(deadline).await;
                }
                session.complete(generation, &query, payload, true);
            });
            return;
        }

        let token = CancellationToken::new();
        let user_initiated = Arc::new(AtomicBool::new(false));
        core.active = Some(ActiveRequest {
            generation,
            token: token.clone(),
            user_initiated: Arc::clone(&user_initiated),
        });
        drop(core);
        info!(
            session = %self.inner.id,
            generation,
            query = %sanitize_for_log(&query),
            "search request started"
        );

        let session = self.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => Err(SearchError::Cancelled {
                    user_initiated: user_initiated.load(Ordering::SeqCst),
                }),
                result = session.inner.backend.fetch(&query) => result,
            };
            session.settle(generation, query, outcome).await;
        });
    }

    async fn settle(
        &self,
        generation: u64,
        query: String,
        outcome: Result<SearchPayload, SearchError>,
    ) {
        let deadline = {
            let mut core = self.lock_core();
            if core
                .active
                .as_ref()
                .is_some_and(|active| active.generation == generation)
            {
                core.active = None;
            }
            if core.generation != generation {
                debug!(session = %self.inner.id, generation, "discarding stale search response");
                return;
            }
            self.loading_deadline(&core)
        };

        match outcome {
            Ok(payload) => {
                if !self.inner.cache.set(&query, payload.clone()) {
                    debug!(session = %self.inner.id, "search result not cached");
                }
                if let Some(deadline) = deadline {
                    tokio::time::sleep_until(deadline).await;
                }
                self.complete(generation, &query, payload, false);
            }
            Err(error) if error.is_silent() => {
                debug!(session = %self.inner.id, generation, "superseded request resolved");
            }
            Err(error) => self.fail(generation, &query, error),
        }
    }

    fn complete(&self, generation: u64, query: &str, payload: SearchPayload, from_cache: bool) {
        let mut core = self.lock_core();
        if core.generation != generation {
            return;
        }
        core.searching_since = None;

        let data = EventData::Results {
            results: payload.clone(),
            query: query.to_string(),
        };
        if payload.has_results {
            self.transition(&mut core, SessionState::Results, Some(data));
            self.emit(SessionEvent::Completed {
                results: payload,
                query: query.to_string(),
                from_cache,
            });
        } else {
            self.transition(&mut core, SessionState::Empty, Some(data));
            self.emit(SessionEvent::Empty {
                query: query.to_string(),
                from_cache,
            });
        }
    }

    fn fail(&self, generation: u64, query: &str, error: SearchError) {
        let mut core = self.lock_core();
        if core.generation != generation {
            return;
        }
        core.searching_since = None;
        warn!(
            session = %self.inner.id,
            kind = error.kind().as_str(),
            %error,
            "search request failed"
        );
        self.transition(
            &mut core,
            SessionState::Error,
            Some(EventData::Failure {
                error: error.clone(),
                query: query.to_string(),
            }),
        );
        self.emit(SessionEvent::Error {
            error,
            query: query.to_string(),
        });
    }

    fn cancel_active(&self, core: &mut SessionCore, user_initiated: bool) {
        if let Some(active) = core.active.take() {
            active.user_initiated.store(user_initiated, Ordering::SeqCst);
            active.token.cancel();
            debug!(
                session = %self.inner.id,
                generation = active.generation,
                user_initiated,
                "in-flight search cancelled"
            );
        }
    }

    fn loading_deadline(&self, core: &SessionCore) -> Option<Instant> {
        core.searching_since
            .map(|started| started + self.inner.config.min_loading())
    }

    fn transition(&self, core: &mut SessionCore, next: SessionState, data: Option<EventData>) {
        let previous = core.current;
        if previous == next && !next.carries_outcome() {
            return;
        }
        core.current = next;
        debug!(
            session = %self.inner.id,
            from = previous.as_str(),
            to = next.as_str(),
            "search state changed"
        );
        self.emit(SessionEvent::StateChanged {
            previous,
            current: next,
            data,
        });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; events are fire-and-forget.
        let _ = self.inner.events.send(event);
    }

    fn lock_core(&self) -> MutexGuard<'_, SessionCore> {
        self.inner.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
