use crate::config::ResultLimits;
use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// States of a drawer search session.
///
/// Single-character input lands in `Hint`; there is no separate typing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Hint,
    Searching,
    Results,
    Empty,
    Error,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Hint => "hint",
            Self::Searching => "searching",
            Self::Results => "results",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }

    /// Whether re-entering this state carries fresh data worth announcing.
    #[must_use]
    pub const fn carries_outcome(self) -> bool {
        matches!(self, Self::Results | Self::Empty | Self::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewport {
    Mobile,
    Desktop,
}

/// Cached and rendered outcome of one storefront search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    pub query: String,
    pub html: String,
    pub has_results: bool,
    pub result_count: usize,
}

impl SearchPayload {
    #[must_use]
    pub fn visible_count(&self, viewport: Viewport, limits: &ResultLimits) -> usize {
        self.result_count.min(limits.for_viewport(viewport))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventData {
    Query { query: String },
    Results { results: SearchPayload, query: String },
    Failure { error: SearchError, query: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetReason {
    Escape,
    DrawerClosed,
    Cleared,
}

impl ResetReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::DrawerClosed => "drawer_closed",
            Self::Cleared => "cleared",
        }
    }
}

/// Notifications a session publishes to its rendering collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged {
        previous: SessionState,
        current: SessionState,
        data: Option<EventData>,
    },
    Started {
        query: String,
    },
    Completed {
        results: SearchPayload,
        query: String,
        from_cache: bool,
    },
    Empty {
        query: String,
        from_cache: bool,
    },
    Error {
        error: SearchError,
        query: String,
    },
    /// The renderer should clear the input text and any rendered results.
    Reset {
        reason: ResetReason,
    },
}

/// Lifecycle signals produced by the drawer that owns a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerSignal {
    Opened { drawer_id: String },
    Closed { drawer_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub entries: usize,
    pub max_entries: usize,
    pub storage_bytes_used: usize,
}

impl CacheStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}
