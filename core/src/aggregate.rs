//! Folds per-provider outcomes into a [`Report`].

use unveil_common::dnsbl::{Outcome, ProviderOutcome, Report};

/// Builds the report for one scan.
///
/// Counts do not depend on the order `outcomes` arrive in. The retained
/// sequence is put back into provider order using each entry's `index`.
pub fn aggregate<I>(outcomes: I, count_inconclusive_as_good: bool) -> Report
where
    I: IntoIterator<Item = ProviderOutcome>,
{
    let mut report = Report::default();

    for entry in outcomes {
        tally(&mut report, &entry.outcome, count_inconclusive_as_good);
        report.outcomes.push(entry);
    }

    report.outcomes.sort_by_key(|entry| entry.index);
    report
}

fn tally(report: &mut Report, outcome: &Outcome, count_inconclusive_as_good: bool) {
    match outcome {
        Outcome::Listed { .. } => {
            report.listed += 1;
            report.bad += 1;
        }
        Outcome::NotListed => {
            report.not_listed += 1;
            report.good += 1;
        }
        Outcome::Inconclusive { .. } => {
            report.inconclusive += 1;
            if count_inconclusive_as_good {
                report.good += 1;
            }
        }
        Outcome::Errored { .. } => report.errored += 1,
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
