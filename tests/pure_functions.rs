use drawer_search::client::StorefrontClient;
use drawer_search::config::{ResultLimits, StorefrontConfig};
use drawer_search::error::{ErrorKind, SearchError};
use drawer_search::formatting::{build_summary, format_event, format_stats};
use drawer_search::parsing::{count_products, extract_section_html, parse_search_body};
use drawer_search::types::{
    CacheStats, EventData, ResetReason, SearchPayload, SessionEvent, SessionState, Viewport,
};

#[test]
fn counts_each_tagged_product_once() {
    let html = r#"
        <ul>
          <li class="grid__item product-card" data-product-id="1"><a>One</a></li>
          <li class="product-card"><span class="product-card__title">Two</span></li>
          <li data-product-id="3">Three</li>
          <li class="collection-card">Not a product</li>
        </ul>
    "#;
    assert_eq!(count_products(html), 3);
    assert_eq!(count_products("<p>No results found</p>"), 0);
}

#[test]
fn extracts_named_section_from_rendering_response() {
    let body = r#"{"drawer-search-results":"<div class=\"product-card\"></div>","other":null}"#;
    assert_eq!(
        extract_section_html(body, "drawer-search-results"),
        Ok("<div class=\"product-card\"></div>".to_string())
    );
    assert!(matches!(
        extract_section_html(body, "other"),
        Err(SearchError::Parse(_))
    ));
    assert!(matches!(
        extract_section_html("<html>", "drawer-search-results"),
        Err(SearchError::Parse(_))
    ));
    assert!(matches!(
        extract_section_html("[1, 2]", "drawer-search-results"),
        Err(SearchError::Parse(_))
    ));
}

#[test]
fn parse_search_body_flags_results_and_empty_bodies() {
    let payload = parse_search_body("shoe", "<div class=\"product-card\">Runner</div>", None)
        .expect("fragment parses");
    assert!(payload.has_results);
    assert_eq!(payload.result_count, 1);
    assert_eq!(payload.query, "shoe");

    let empty = parse_search_body("zzzzz", "<p>Nothing here</p>", None).expect("fragment parses");
    assert!(!empty.has_results);

    assert_eq!(
        parse_search_body("shoe", "   \n", None),
        Err(SearchError::EmptyBody)
    );
    assert_eq!(
        parse_search_body("shoe", "", Some("drawer-search-results")),
        Err(SearchError::EmptyBody)
    );
}

#[test]
fn errors_classify_by_variant() {
    assert_eq!(SearchError::Network("refused".into()).kind(), ErrorKind::Network);
    assert_eq!(SearchError::Timeout.kind(), ErrorKind::Timeout);
    assert_eq!(SearchError::Http { status: 503 }.kind(), ErrorKind::Http);
    assert_eq!(SearchError::EmptyBody.kind(), ErrorKind::Unknown);
    assert_eq!(SearchError::Parse("bad".into()).kind(), ErrorKind::Unknown);
    assert_eq!(
        SearchError::Cancelled {
            user_initiated: true
        }
        .kind(),
        ErrorKind::Cancelled
    );

    assert!(
        SearchError::Cancelled {
            user_initiated: false
        }
        .is_silent()
    );
    assert!(
        !SearchError::Cancelled {
            user_initiated: true
        }
        .is_silent()
    );
    assert!(!SearchError::Timeout.is_silent());

    assert_eq!(SearchError::Http { status: 404 }.code(), "HTTP_ERROR");
    assert!(
        SearchError::Http { status: 502 }
            .user_message()
            .contains("trouble")
    );
}

#[test]
fn visible_count_respects_viewport_caps() {
    let limits = ResultLimits {
        mobile: 4,
        desktop: 6,
    };
    let payload = SearchPayload {
        query: "shirt".to_string(),
        html: String::new(),
        has_results: true,
        result_count: 5,
    };
    assert_eq!(payload.visible_count(Viewport::Mobile, &limits), 4);
    assert_eq!(payload.visible_count(Viewport::Desktop, &limits), 5);

    assert_eq!(
        build_summary(&payload, Viewport::Mobile, &limits),
        "Found 5 products for \"shirt\". Showing 4."
    );
    assert_eq!(
        build_summary(&payload, Viewport::Desktop, &limits),
        "Found 5 products for \"shirt\"."
    );
}

#[test]
fn events_format_to_single_lines() {
    let limits = ResultLimits::default();
    let changed = SessionEvent::StateChanged {
        previous: SessionState::Searching,
        current: SessionState::Error,
        data: Some(EventData::Failure {
            error: SearchError::Timeout,
            query: "shoe".to_string(),
        }),
    };
    assert_eq!(
        format_event(&changed, Viewport::Desktop, &limits),
        "state: searching -> error (TIMEOUT)"
    );

    let empty = SessionEvent::Empty {
        query: "zzzzz".to_string(),
        from_cache: true,
    };
    assert_eq!(
        format_event(&empty, Viewport::Desktop, &limits),
        "No products found for \"zzzzz\". (cached)"
    );

    let reset = SessionEvent::Reset {
        reason: ResetReason::Escape,
    };
    assert_eq!(format_event(&reset, Viewport::Desktop, &limits), "reset (escape)");
}

#[test]
fn stats_line_includes_hit_rate() {
    let stats = CacheStats {
        hits: 3,
        misses: 1,
        sets: 2,
        evictions: 0,
        entries: 2,
        max_entries: 50,
        storage_bytes_used: 512,
    };
    let line = format_stats(&stats);
    assert!(line.contains("2/50 entries"));
    assert!(line.contains("75% hit rate"));
}

#[test]
fn request_url_carries_query_type_mode_and_cache_bust() {
    let client = StorefrontClient::new(StorefrontConfig {
        endpoint: "https://shop.example/search".to_string(),
        ..StorefrontConfig::default()
    })
    .expect("client builds");

    let url = client
        .build_request_url("red shoe", 1_234)
        .expect("valid endpoint");
    assert_eq!(
        url,
        "https://shop.example/search?q=red+shoe&type=product&sections=drawer-search-results&_=1234"
    );

    let fragment_client = StorefrontClient::new(StorefrontConfig {
        endpoint: "https://shop.example/search".to_string(),
        section_id: None,
        ..StorefrontConfig::default()
    })
    .expect("client builds");
    let url = fragment_client
        .build_request_url("hat", 1)
        .expect("valid endpoint");
    assert_eq!(
        url,
        "https://shop.example/search?q=hat&type=product&view=drawer-search&_=1"
    );
}
