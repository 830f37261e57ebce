use std::path::PathBuf;
use std::time::Duration;

/// Default per-attempt DNS timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default total time budget for one provider.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(5);

/// Default number of providers queried at the same time.
pub const DEFAULT_CONCURRENCY: usize = 32;

/// Presentation settings shared by every command.
///
/// Built once from the global flags. The query engine never sees this.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Show inconclusive outcomes and record details.
    pub verbose: bool,
    /// 0 prints everything, 1 drops decorations, 2 prints results only.
    pub quiet: u8,
    pub no_banner: bool,
    /// Disables the keyboard listener used to cancel a running scan.
    pub disable_input: bool,
    /// Append plain-text results to this file.
    pub output: Option<PathBuf>,
}

/// Explicit configuration of one DNSBL scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Time allowed for a single DNS attempt.
    pub timeout: Duration,
    /// Time allowed for one provider, A and TXT lookups together.
    pub lifetime: Duration,
    /// Count `Inconclusive` outcomes as clean in the tally.
    pub count_inconclusive_as_good: bool,
    /// Upper bound of in-flight providers. Zero is treated as one.
    pub concurrency: usize,
}

impl ScanConfig {
    pub fn workers(&self) -> usize {
        self.concurrency.max(1)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            lifetime: DEFAULT_LIFETIME,
            count_inconclusive_as_good: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
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
