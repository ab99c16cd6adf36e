use crate::config::ResultLimits;
use crate::types::{CacheStats, EventData, SearchPayload, SessionEvent, Viewport};

#[must_use]
pub fn build_summary(payload: &SearchPayload, viewport: Viewport, limits: &ResultLimits) -> String {
    let total = payload.result_count;
    let visible = payload.visible_count(viewport, limits);
    let mut summary = format!(
        "Found {total} product{} for \"{}\".",
        if total == 1 { "" } else { "s" },
        payload.query,
    );
    if visible < total {
        summary.push_str(&format!(" Showing {visible}."));
    }
    summary
}

/// One line per event, for terminal output.
#[must_use]
pub fn format_event(event: &SessionEvent, viewport: Viewport, limits: &ResultLimits) -> String {
    match event {
        SessionEvent::StateChanged {
            previous,
            current,
            data,
        } => {
            let detail = match data {
                Some(EventData::Query { query }) => format!(" (\"{query}\")"),
                Some(EventData::Results { query, .. }) => format!(" (\"{query}\")"),
                Some(EventData::Failure { error, .. }) => format!(" ({})", error.code()),
                None => String::new(),
            };
            format!("state: {} -> {}{detail}", previous.as_str(), current.as_str())
        }
        SessionEvent::Started { query } => format!("searching for \"{query}\"..."),
        SessionEvent::Completed {
            results,
            from_cache,
            ..
        } => {
            let summary = build_summary(results, viewport, limits);
            if *from_cache {
                format!("{summary} (cached)")
            } else {
                summary
            }
        }
        SessionEvent::Empty { query, from_cache } => {
            let suffix = if *from_cache { " (cached)" } else { "" };
            format!("No products found for \"{query}\".{suffix}")
        }
        SessionEvent::Error { error, query } => {
            format!(
                "[{}] {} (query \"{query}\": {error})",
                error.kind().as_str(),
                error.user_message()
            )
        }
        SessionEvent::Reset { reason } => format!("reset ({})", reason.as_str()),
    }
}

#[must_use]
pub fn format_stats(stats: &CacheStats) -> String {
    format!(
        "cache: {entries}/{max} entries, {bytes} bytes, {hits} hits, {misses} misses ({rate:.0}% hit rate), {sets} sets, {evictions} evictions",
        entries = stats.entries,
        max = stats.max_entries,
        bytes = stats.storage_bytes_used,
        hits = stats.hits,
        misses = stats.misses,
        rate = stats.hit_rate() * 100.0,
        sets = stats.sets,
        evictions = stats.evictions,
    )
}
