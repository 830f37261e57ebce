use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::{self, FetchError};

pub const TOR_CHECK_URL: &str = "https://check.torproject.org/api/ip";

/// Answer of the Tor Project's exit check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TorStatus {
    #[serde(rename = "IsTor")]
    pub is_tor: bool,
    /// Address the check service saw the request coming from.
    #[serde(rename = "IP")]
    pub ip: Option<String>,
}

pub async fn check(client: &Client) -> Result<TorStatus, FetchError> {
    let body = http::get_text(client, TOR_CHECK_URL).await?;
    debug!("Tor check answered: {}", body.trim());
    parse_status(&body)
}

pub fn parse_status(body: &str) -> Result<TorStatus, FetchError> {
    Ok(serde_json::from_str(body)?)
}
