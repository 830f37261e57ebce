//! Provider lists scraped from public DNSBL directories.

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};
use unveil_common::dnsbl::{Provider, dedup_providers};

use super::{ProviderError, ProviderSource};
use crate::http;

/// A web page listing DNSBL zones.
pub trait Scraper: Send + Sync {
    fn name(&self) -> &'static str;
    fn url(&self) -> &'static str;
    /// Extracts raw hostnames from the page body.
    fn parse(&self, html: &str) -> Vec<String>;
}

/// `dnsbl.info`: every link inside the listing table.
pub struct DnsblInfo;

impl Scraper for DnsblInfo {
    fn name(&self) -> &'static str {
        "dnsbl.info"
    }

    fn url(&self) -> &'static str {
        "https://www.dnsbl.info/dnsbl-list.php"
    }

    fn parse(&self, html: &str) -> Vec<String> {
        select_text(html, "table a")
            .into_iter()
            .map(|text| {
                text.replace("http://", "")
                    .replace("https://", "")
                    .trim()
                    .to_string()
            })
            .filter(|text| !text.is_empty())
            .collect()
    }
}

/// `whatismyipaddress.com`: one paragraph per blacklist.
pub struct WhatIsMyIpAddress;

impl Scraper for WhatIsMyIpAddress {
    fn name(&self) -> &'static str {
        "whatismyipaddress.com"
    }

    fn url(&self) -> &'static str {
        "https://whatismyipaddress.com/blacklist-check"
    }

    fn parse(&self, html: &str) -> Vec<String> {
        select_text(html, "div.blacklist-results p")
            .into_iter()
            .filter(|text| !text.contains("IP Blacklist Offline:"))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}

/// Text content of every element matching `selector`.
fn select_text(html: &str, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    Html::parse_document(html)
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect()
}

/// Runs every scraper concurrently and merges their lists.
pub struct ScrapedProviders {
    client: Client,
    scrapers: Vec<Box<dyn Scraper>>,
}

impl ScrapedProviders {
    pub fn new(client: Client) -> Self {
        Self::with_scrapers(client, vec![Box::new(DnsblInfo), Box::new(WhatIsMyIpAddress)])
    }

    pub fn with_scrapers(client: Client, scrapers: Vec<Box<dyn Scraper>>) -> Self {
        Self { client, scrapers }
    }

    async fn scrape(&self, scraper: &dyn Scraper) -> Result<Vec<String>, String> {
        let body = http::get_text(&self.client, scraper.url())
            .await
            .map_err(|err| format!("{}: {err}", scraper.name()))?;
        let found = scraper.parse(&body);
        info!(source = scraper.name(), count = found.len(), "Scraped provider list");
        Ok(found)
    }
}

#[async_trait]
impl ProviderSource for ScrapedProviders {
    async fn providers(&self) -> Result<Vec<Provider>, ProviderError> {
        let results = join_all(self.scrapers.iter().map(|s| self.scrape(s.as_ref()))).await;
        merge(results)
    }
}

/// Combines per-scraper results.
///
/// A failed scraper contributes nothing. Only when every scraper failed is
/// the failure reported as such.
pub fn merge(results: Vec<Result<Vec<String>, String>>) -> Result<Vec<Provider>, ProviderError> {
    let mut failures = Vec::new();
    let mut raw = Vec::new();
    let attempted = results.len();

    for result in results {
        match result {
            Ok(found) => raw.extend(found),
            Err(reason) => {
                warn!("Provider scraper failed: {reason}");
                failures.push(reason);
            }
        }
    }

    if attempted > 0 && failures.len() == attempted {
        return Err(ProviderError::Http(failures.join("; ")));
    }

    let providers = dedup_providers(raw.iter().filter_map(|name| Provider::new(name)));
    if providers.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(providers)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
