//! DNS resolution for blacklist queries.
//!
//! Resolver failures are turned into a [`Resolution`] value at this boundary,
//! so the engine classifies outcomes with a plain `match`.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use tracing::{debug, warn};

/// Result of a single DNS lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Records(Vec<T>),
    /// The name does not exist.
    NxDomain,
    Timeout,
    NoNameservers,
    /// The name exists but has no record of the requested type.
    NoAnswer,
    Other(String),
}

impl<T> Resolution<T> {
    /// First record, if the lookup produced any.
    pub fn first(self) -> Option<T> {
        match self {
            Resolution::Records(records) => records.into_iter().next(),
            _ => None,
        }
    }
}

/// The DNS capability the blacklist engine needs.
#[async_trait]
pub trait DnsblResolver: Send + Sync {
    async fn lookup_a(&self, name: &str) -> Resolution<Ipv4Addr>;
    async fn lookup_txt(&self, name: &str) -> Resolution<String>;
}

/// [`DnsblResolver`] backed by the system resolver configuration.
pub struct HickoryResolver {
    inner: TokioAsyncResolver,
}

impl HickoryResolver {
    /// Builds a resolver whose every attempt is bounded by `timeout`.
    ///
    /// Falls back to the built-in upstreams if the system configuration
    /// cannot be read.
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = hickory_resolver::system_conf::read_system_conf()
            .unwrap_or_else(|err| {
                warn!("Could not read system DNS configuration ({err}), using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            });

        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl DnsblResolver for HickoryResolver {
    async fn lookup_a(&self, name: &str) -> Resolution<Ipv4Addr> {
        match self.inner.ipv4_lookup(fqdn(name)).await {
            Ok(lookup) => Resolution::Records(lookup.iter().map(|a| a.0).collect()),
            Err(err) => {
                debug!(query = name, "A lookup failed: {err}");
                classify_error(&err)
            }
        }
    }

    async fn lookup_txt(&self, name: &str) -> Resolution<String> {
        match self.inner.txt_lookup(fqdn(name)).await {
            Ok(lookup) => Resolution::Records(
                lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|chunk| String::from_utf8_lossy(chunk))
                            .collect::<String>()
                    })
                    .collect(),
            ),
            Err(err) => {
                debug!(query = name, "TXT lookup failed: {err}");
                classify_error(&err)
            }
        }
    }
}

/// Absolute name, so search domains are never appended.
fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Maps a resolver error onto the lookup taxonomy.
pub fn classify_error<T>(err: &ResolveError) -> Resolution<T> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain => Resolution::NxDomain,
            ResponseCode::ServFail | ResponseCode::Refused => Resolution::NoNameservers,
            _ => Resolution::NoAnswer,
        },
        ResolveErrorKind::Timeout => Resolution::Timeout,
        ResolveErrorKind::NoConnections => Resolution::NoNameservers,
        ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
            Resolution::Timeout
        }
        _ => Resolution::Other(err.to_string()),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
