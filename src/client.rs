use crate::clock::{Clock, SystemClock};
use crate::config::StorefrontConfig;
use crate::constants::{
    FRAGMENT_VIEW, PARAM_CACHE_BUST, PARAM_QUERY, PARAM_RESULT_TYPE, PARAM_SECTIONS, PARAM_VIEW,
};
use crate::error::SearchError;
use crate::parsing::parse_search_body;
use crate::types::SearchPayload;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, HeaderValue};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Performs the network half of a search.
///
/// Implementations must not cache; the session owns caching.
pub trait SearchBackend: Send + Sync + 'static {
    fn fetch(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<SearchPayload, SearchError>> + Send;
}

#[derive(Debug)]
pub struct StorefrontClient {
    http: reqwest::Client,
    config: StorefrontConfig,
}

impl StorefrontClient {
    pub fn new(config: StorefrontConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("drawer-search/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                SearchError::Internal(format!("Failed to create HTTP client: {error}"))
            })?;

        Ok(Self { http, config })
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn build_request_url(&self, query: &str, cache_bust: u64) -> Result<String, SearchError> {
        let endpoint = &self.config.endpoint;
        let mut url = url::Url::parse(endpoint).map_err(|error| {
            SearchError::Internal(format!("Invalid endpoint URL '{endpoint}': {error}"))
        })?;

        {
            let mut params = url.query_pairs_mut();
            params.append_pair(PARAM_QUERY, query);
            params.append_pair(PARAM_RESULT_TYPE, &self.config.result_type);
            match &self.config.section_id {
                Some(section_id) => params.append_pair(PARAM_SECTIONS, section_id),
                None => params.append_pair(PARAM_VIEW, FRAGMENT_VIEW),
            };
            params.append_pair(PARAM_CACHE_BUST, &cache_bust.to_string());
        }

        Ok(url.to_string())
    }

    async fn request(&self, query: &str) -> Result<SearchPayload, SearchError> {
        let request_url = self.build_request_url(query, SystemClock.now_millis())?;
        debug!(url = %request_url, "storefront search request");

        let accept = if self.config.section_id.is_some() {
            "application/json"
        } else {
            "text/html"
        };

        let response = self
            .http
            .get(request_url)
            .header(ACCEPT, HeaderValue::from_static(accept))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(SearchError::Http { status });
        }

        let body = self.read_response_body(response).await?;
        parse_search_body(query, &body, self.config.section_id.as_deref())
    }

    async fn read_response_body(&self, response: reqwest::Response) -> Result<String, SearchError> {
        let mut stream = response.bytes_stream();
        let mut bytes = Vec::<u8>::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(classify_transport_error)?;

            if bytes.len() + chunk.len() > self.config.max_response_bytes {
                return Err(SearchError::Parse(format!(
                    "Response body exceeded {} byte limit",
                    self.config.max_response_bytes
                )));
            }

            bytes.extend_from_slice(&chunk);
        }

        String::from_utf8(bytes).map_err(|error| {
            SearchError::Parse(format!("Response body was not valid UTF-8: {error}"))
        })
    }
}

impl SearchBackend for StorefrontClient {
    async fn fetch(&self, query: &str) -> Result<SearchPayload, SearchError> {
        let timeout = Duration::from_millis(self.config.network_timeout_ms);
        tokio::time::timeout(timeout, self.request(query))
            .await
            .map_err(|_| SearchError::Timeout)?
    }
}

fn classify_transport_error(error: reqwest::Error) -> SearchError {
    if error.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Network(error.to_string())
    }
}
