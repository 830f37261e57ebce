//! # DNSBL Models
//!
//! Data produced and consumed by a blacklist scan:
//! * [`Provider`]: one blacklist zone, e.g. `zen.spamhaus.org`.
//! * [`Outcome`]: what a single provider said about the target.
//! * [`ProviderOutcome`]: an outcome tagged with its provider and input position.
//! * [`Report`]: the aggregate over every provider of one scan.

use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

/// A blacklist zone queried as `<reversed-ip>.<zone>`.
///
/// Stored normalized: trimmed, lowercase, no trailing dot. Two providers that
/// only differ by case or a trailing dot are the same provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Provider(String);

impl Provider {
    /// Normalizes `raw` into a provider hostname.
    ///
    /// Returns `None` for empty input or anything that cannot be a DNS name.
    pub fn new(raw: &str) -> Option<Self> {
        let name = raw.trim().trim_end_matches('.').to_ascii_lowercase();

        let valid = !name.is_empty()
            && name.len() <= 253
            && name
                .split('.')
                .all(|label| !label.is_empty() && label.len() <= 63)
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));

        valid.then_some(Provider(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Removes repeated providers, keeping the first occurrence of each.
pub fn dedup_providers<I>(providers: I) -> Vec<Provider>
where
    I: IntoIterator<Item = Provider>,
{
    let mut seen: HashSet<Provider> = HashSet::new();
    providers
        .into_iter()
        .filter(|provider| seen.insert(provider.clone()))
        .collect()
}

/// Why a provider gave no definitive answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InconclusiveReason {
    Timeout,
    NoNameservers,
    /// The name exists but carries no A record.
    NoAnswer,
}

impl fmt::Display for InconclusiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InconclusiveReason::Timeout => "timeout",
            InconclusiveReason::NoNameservers => "no nameservers",
            InconclusiveReason::NoAnswer => "no answer",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "message")]
pub enum ErrorReason {
    /// The scan was cancelled before this provider finished.
    Cancelled,
    /// Any resolver failure outside the known taxonomy.
    Resolver(String),
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorReason::Cancelled => f.write_str("cancelled"),
            ErrorReason::Resolver(message) => f.write_str(message),
        }
    }
}

/// The verdict of one provider for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// The A lookup resolved: the provider lists the target.
    Listed {
        a_record: Ipv4Addr,
        /// Human-readable listing reason. `None` when the TXT lookup failed.
        txt_record: Option<String>,
    },
    /// NXDOMAIN: the provider does not list the target.
    NotListed,
    Inconclusive { reason: InconclusiveReason },
    Errored { reason: ErrorReason },
}

impl Outcome {
    pub fn is_listed(&self) -> bool {
        matches!(self, Outcome::Listed { .. })
    }
}

/// An [`Outcome`] tagged with its provider and its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderOutcome {
    pub index: usize,
    pub provider: Provider,
    pub outcome: Outcome,
}

/// Aggregate over all outcomes of one scan.
///
/// `listed + not_listed + inconclusive + errored == outcomes.len()` always holds.
/// `bad` counts listings; `good` counts clean answers, plus inconclusive ones
/// when the scan was configured to count them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub listed: usize,
    pub not_listed: usize,
    pub inconclusive: usize,
    pub errored: usize,
    pub good: usize,
    pub bad: usize,
    /// Per-provider outcomes, in the original provider order.
    pub outcomes: Vec<ProviderOutcome>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.listed + self.not_listed + self.inconclusive + self.errored
    }

    /// Providers that took part in the tally.
    pub fn tallied(&self) -> usize {
        self.good + self.bad
    }

    pub fn listed_in(&self) -> impl Iterator<Item = &Provider> {
        self.outcomes
            .iter()
            .filter(|entry| entry.outcome.is_listed())
            .map(|entry| &entry.provider)
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
