use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};
use unveil_common::dnsbl::{Provider, dedup_providers};

use super::{ProviderError, ProviderSource};

/// Providers read from a UTF-8 file, one hostname per line.
pub struct FileProviders {
    path: PathBuf,
}

impl FileProviders {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProviderSource for FileProviders {
    async fn providers(&self) -> Result<Vec<Provider>, ProviderError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ProviderError::Io {
                    path: self.path.clone(),
                    source,
                })?;

        let providers = parse_provider_list(&content);
        debug!(path = %self.path.display(), count = providers.len(), "Loaded provider list");

        if providers.is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(providers)
    }
}

/// One hostname per line. Blank lines are skipped, there is no comment syntax.
pub fn parse_provider_list(content: &str) -> Vec<Provider> {
    let parsed = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let provider = Provider::new(line);
            if provider.is_none() {
                warn!("Skipping invalid provider '{line}'");
            }
            provider
        });

    dedup_providers(parsed)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
