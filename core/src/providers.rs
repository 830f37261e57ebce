//! # Provider Sources
//!
//! Where the list of blacklist zones comes from:
//! * [`file::FileProviders`]: a newline-delimited file chosen by the user.
//! * [`scrape::ScrapedProviders`]: public pages that enumerate DNSBL zones.
//!
//! Both hand the engine a normalized, deduplicated, non-empty list.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use unveil_common::dnsbl::Provider;

pub mod file;
pub mod scrape;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("could not read provider list '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not fetch any provider list: {0}")]
    Http(String),
    #[error("provider list is empty")]
    Empty,
}

#[async_trait]
pub trait ProviderSource: Send + Sync {
    async fn providers(&self) -> Result<Vec<Provider>, ProviderError>;
}
