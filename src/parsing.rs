use crate::constants::PRODUCT_MARKERS;
use crate::error::SearchError;
use crate::types::SearchPayload;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_DETAIL_LENGTH: usize = 200;

static PRODUCT_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    let markers = PRODUCT_MARKERS
        .iter()
        .map(|marker| regex::escape(marker))
        .collect::<Vec<String>>()
        .join("|");
    Regex::new(&format!(r"<[^>]*\b(?:{markers})\b[^>]*>")).expect("valid product marker regex")
});

fn truncate_error_detail(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_DETAIL_LENGTH {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_ERROR_DETAIL_LENGTH).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Number of tags in `html` that carry a product marker.
#[must_use]
pub fn count_products(html: &str) -> usize {
    PRODUCT_TAG_RE.find_iter(html).count()
}

/// Pulls one section's markup out of a section-rendering response.
pub fn extract_section_html(body: &str, section_id: &str) -> Result<String, SearchError> {
    let payload = serde_json::from_str::<Value>(body).map_err(|error| {
        SearchError::Parse(truncate_error_detail(&format!(
            "invalid section response: {error}"
        )))
    })?;

    let Some(sections) = payload.as_object() else {
        return Err(SearchError::Parse(
            "section response is not a JSON object".to_string(),
        ));
    };

    match sections.get(section_id) {
        Some(Value::String(html)) => Ok(html.clone()),
        Some(Value::Null) | None => Err(SearchError::Parse(truncate_error_detail(&format!(
            "section '{section_id}' missing from response"
        )))),
        Some(_) => Err(SearchError::Parse(truncate_error_detail(&format!(
            "section '{section_id}' is not a string"
        )))),
    }
}

/// Builds the payload for a completed search.
///
/// With a `section_id` the body is a section-rendering JSON object, otherwise
/// it is the results fragment itself.
pub fn parse_search_body(
    query: &str,
    body: &str,
    section_id: Option<&str>,
) -> Result<SearchPayload, SearchError> {
    if body.trim().is_empty() {
        return Err(SearchError::EmptyBody);
    }

    let html = match section_id {
        Some(section_id) => extract_section_html(body, section_id)?,
        None => body.to_string(),
    };

    let result_count = count_products(&html);
    Ok(SearchPayload {
        query: query.to_string(),
        html,
        has_results: result_count > 0,
        result_count,
    })
}
