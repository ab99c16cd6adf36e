use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_CSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\\x1b\\[[0-9;]*[A-Za-z]").expect("valid ansi csi regex"));
static ANSI_OTHER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\\x1b[^\\[]").expect("valid ansi other regex"));
static CONTROL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\x9F]").expect("valid control regex")
});

const MAX_LOGGED_QUERY_CHARS: usize = 100;

/// Cache key and request text for raw input: the input with outer whitespace removed.
#[must_use]
pub fn normalize_query(raw: &str) -> &str {
    raw.trim()
}

#[must_use]
pub fn query_length(raw: &str) -> usize {
    normalize_query(raw).chars().count()
}

#[must_use]
pub fn is_searchable(raw: &str, min_query_length: usize) -> bool {
    query_length(raw) >= min_query_length.max(1)
}

/// Strips terminal escapes and control characters and caps the length, for log fields.
#[must_use]
pub fn sanitize_for_log(value: &str) -> String {
    let no_csi = ANSI_CSI_RE.replace_all(value, "");
    let no_other = ANSI_OTHER_RE.replace_all(&no_csi, "");
    CONTROL_RE
        .replace_all(&no_other, "")
        .chars()
        .take(MAX_LOGGED_QUERY_CHARS)
        .collect()
}
