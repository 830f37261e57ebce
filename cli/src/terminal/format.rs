use colored::*;
use unveil_common::dnsbl::{InconclusiveReason, Outcome, ProviderOutcome, Report};
use unveil_common::network::target::Target;

use crate::terminal::colors;

/// Plain-text line for one provider, or `None` when it is not shown.
///
/// Inconclusive providers are only shown in verbose mode.
pub fn outcome_line(ip: &Target, entry: &ProviderOutcome, verbose: bool) -> Option<String> {
    let provider = &entry.provider;
    let line = match &entry.outcome {
        Outcome::Listed {
            a_record,
            txt_record: Some(txt),
        } => format!("[+] {ip} listed in {provider} ({a_record}) ({txt})"),
        Outcome::Listed { a_record, .. } => format!("[+] {ip} listed in {provider} ({a_record})"),
        Outcome::NotListed => format!("[-] {ip} not listed in {provider}"),
        Outcome::Inconclusive { reason } if verbose => match reason {
            InconclusiveReason::Timeout => format!("[.] Timeout querying {provider}"),
            InconclusiveReason::NoNameservers => format!("[.] No nameservers for {provider}"),
            InconclusiveReason::NoAnswer => format!("[.] No answer from {provider}"),
        },
        Outcome::Errored { reason } => format!("[!] Error querying {provider}: {reason}"),
        _ => return None,
    };
    Some(line)
}

pub fn outcome_color(outcome: &Outcome) -> Color {
    match outcome {
        Outcome::Listed { .. } => colors::LISTED,
        Outcome::NotListed => colors::NOT_LISTED,
        Outcome::Inconclusive { .. } => colors::INCONCLUSIVE,
        Outcome::Errored { .. } => colors::ERRORED,
    }
}

/// `{ip}: {bad}/{good + bad}`
pub fn summary_line(ip: &Target, report: &Report) -> String {
    format!("{ip}: {}/{}", report.bad, report.tallied())
}

pub fn yes_no(value: bool) -> ColoredString {
    if value {
        "yes".green().bold()
    } else {
        "no".color(colors::SEPARATOR)
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
