//! HTTP client with built-in retry logic and Link-header pagination.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use reqwest::header::LINK;
use serde::de::DeserializeOwned;

use super::link::parse_next_link;
use super::retry::{MAX_RETRIES, RETRY_DELAY_MS, classify_status};
use crate::error::ListError;

/// One page of a JSON array listing plus the URL of the following page.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// HTTP client with built-in retry logic for API requests.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry_delay: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }

    /// Overrides the delay between attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Fetches one page of a JSON array listing.
    /// Server errors and transport failures are retried; other failures are returned as is.
    #[tracing::instrument(skip(self))]
    pub async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, ListError> {
        debug!("GET page from {}...", url);
        self.with_retry("GET page", || self.get_page_once(url)).await
    }

    async fn get_page_once<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, ListError> {
        let transport = |source: reqwest::Error| ListError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_link);

        let body = response.bytes().await.map_err(transport)?;
        let items =
            serde_json::from_slice::<Vec<T>>(&body).map_err(|e| ListError::MalformedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Page { items, next })
    }

    /// Executes an async operation with retry logic.
    async fn with_retry<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, ListError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, ListError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES => {
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                        operation_name,
                        attempt,
                        MAX_RETRIES,
                        e,
                        self.retry_delay.as_millis()
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!("{}: giving up after attempt {}: {}", operation_name, attempt, e);
                    return Err(e);
                }
            }
        }
    }
}
