#![no_main]

use drawer_search::parsing::parse_search_body;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(payload) = parse_search_body("fuzz", body, None) {
        assert_eq!(payload.has_results, payload.result_count > 0);
    }
    let _ = parse_search_body("fuzz", body, Some("drawer-search-results"));
});
