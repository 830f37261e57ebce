use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::warn;

/// Upper bound for any single HTTP request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("unveil/", env!("CARGO_PKG_VERSION"));

/// Failure of one HTTP lookup service.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contains no valid IP address")]
    MissingIp,
    #[error("service refused the lookup: {0}")]
    Rejected(String),
}

/// Shared client for every outbound HTTP call.
pub fn client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            warn!("Could not build HTTP client ({err}), using defaults");
            Client::new()
        })
}

/// GETs `url` and returns the body, treating non-2xx statuses as errors.
pub async fn get_text(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.text().await
}
