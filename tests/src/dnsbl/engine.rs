#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use unveil_common::config::ScanConfig;
use unveil_common::dnsbl::{
    ErrorReason, InconclusiveReason, Outcome, Provider, ProviderOutcome, Report,
};
use unveil_common::network::target::Target;
use unveil_core::aggregate::aggregate;
use unveil_core::engine::DnsblEngine;
use unveil_protocols::dnsbl::reverse_octets;
use unveil_protocols::resolver::Resolution;

use crate::utils::StubResolver;

fn providers(names: &[&str]) -> Vec<Provider> {
    names.iter().map(|name| Provider::new(name).unwrap()).collect()
}

fn verbose(count_inconclusive_as_good: bool) -> ScanConfig {
    ScanConfig {
        count_inconclusive_as_good,
        ..ScanConfig::default()
    }
}

async fn scan(
    resolver: Arc<StubResolver>,
    target: &str,
    names: &[&str],
    cfg: ScanConfig,
) -> Report {
    let target: Target = target.parse().unwrap();
    DnsblEngine::new(resolver)
        .query_all(&target, providers(names), &cfg, &CancellationToken::new(), None)
        .await
}

#[tokio::test]
async fn nxdomain_is_not_listed() {
    let resolver = Arc::new(StubResolver::new());
    let report = scan(resolver, "1.2.3.4", &["bl.example"], ScanConfig::default()).await;

    assert_eq!(report.outcomes[0].outcome, Outcome::NotListed);
    assert_eq!(report.good, 1);
    assert_eq!(report.bad, 0);
}

#[tokio::test]
async fn a_and_txt_answer_is_listed() {
    let name = "4.3.2.1.bl.example";
    let resolver = Arc::new(
        StubResolver::new()
            .with_a(name, Resolution::Records(vec![Ipv4Addr::new(1, 2, 3, 4)]))
            .with_txt(name, Resolution::Records(vec!["spam".to_string()])),
    );
    let report = scan(resolver, "1.2.3.4", &["bl.example"], ScanConfig::default()).await;

    assert_eq!(
        report.outcomes[0].outcome,
        Outcome::Listed {
            a_record: Ipv4Addr::new(1, 2, 3, 4),
            txt_record: Some("spam".to_string()),
        }
    );
    assert_eq!(report.bad, 1);
    assert_eq!(report.good, 0);
}

#[tokio::test]
async fn timeout_counts_only_when_requested() {
    let name = "4.3.2.1.slow.example";
    let timeout = Outcome::Inconclusive {
        reason: InconclusiveReason::Timeout,
    };

    let resolver = Arc::new(StubResolver::new().with_a(name, Resolution::Timeout));
    let strict = scan(resolver.clone(), "1.2.3.4", &["slow.example"], verbose(false)).await;
    assert_eq!(strict.outcomes[0].outcome, timeout);
    assert_eq!(strict.inconclusive, 1);
    assert_eq!((strict.good, strict.bad), (0, 0));

    let lenient = scan(resolver, "1.2.3.4", &["slow.example"], verbose(true)).await;
    assert_eq!(lenient.outcomes[0].outcome, timeout);
    assert_eq!((lenient.good, lenient.bad), (1, 0));
}

#[tokio::test]
async fn single_provider_clean_report() {
    let resolver = Arc::new(StubResolver::new());
    let report = scan(
        resolver.clone(),
        "8.8.8.8",
        &["zen.spamhaus.org"],
        ScanConfig::default(),
    )
    .await;

    assert_eq!(report.not_listed, 1);
    assert_eq!(report.listed, 0);
    assert_eq!(report.inconclusive, 0);
    assert_eq!(report.errored, 0);
    assert_eq!(resolver.queried(), vec!["8.8.8.8.zen.spamhaus.org"]);
}

#[tokio::test]
async fn empty_provider_list_is_a_no_op() {
    let resolver = Arc::new(StubResolver::new());
    let report = scan(resolver.clone(), "8.8.8.8", &[], ScanConfig::default()).await;

    assert_eq!(report, Report::default());
    assert!(resolver.queried().is_empty());
}

#[tokio::test]
async fn one_failing_provider_does_not_abort_the_batch() {
    let names: Vec<String> = (0..10).map(|i| format!("bl{i}.example")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let resolver = Arc::new(
        StubResolver::new()
            .with_a(
                "4.3.2.1.bl3.example",
                Resolution::Other("malformed response".to_string()),
            )
            .with_a(
                "4.3.2.1.bl7.example",
                Resolution::Records(vec![Ipv4Addr::new(127, 0, 0, 2)]),
            ),
    );
    let report = scan(resolver, "1.2.3.4", &refs, ScanConfig::default()).await;

    assert_eq!(report.total(), 10);
    assert_eq!(report.errored, 1);
    assert_eq!(report.listed + report.not_listed + report.inconclusive, 9);
    assert_eq!(report.listed, 1);
    assert_eq!(
        report.outcomes[3].outcome,
        Outcome::Errored {
            reason: ErrorReason::Resolver("malformed response".to_string())
        }
    );
}

#[tokio::test]
async fn every_reason_is_classified() {
    let resolver = Arc::new(
        StubResolver::new()
            .with_a("4.3.2.1.t.example", Resolution::Timeout)
            .with_a("4.3.2.1.n.example", Resolution::NoNameservers)
            .with_a("4.3.2.1.a.example", Resolution::NoAnswer)
            .with_a("4.3.2.1.e.example", Resolution::Records(vec![])),
    );
    let report = scan(
        resolver,
        "1.2.3.4",
        &["t.example", "n.example", "a.example", "e.example"],
        ScanConfig::default(),
    )
    .await;

    let reasons: Vec<Outcome> = report.outcomes.iter().map(|e| e.outcome.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            Outcome::Inconclusive {
                reason: InconclusiveReason::Timeout
            },
            Outcome::Inconclusive {
                reason: InconclusiveReason::NoNameservers
            },
            Outcome::Inconclusive {
                reason: InconclusiveReason::NoAnswer
            },
            Outcome::Inconclusive {
                reason: InconclusiveReason::NoAnswer
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn stream_follows_completion_report_follows_input() {
    let resolver = Arc::new(
        StubResolver::new()
            .with_delay("4.3.2.1.a.example", Duration::from_millis(500))
            .with_delay("4.3.2.1.b.example", Duration::from_millis(50))
            .with_delay("4.3.2.1.c.example", Duration::from_millis(250)),
    );
    let target: Target = "1.2.3.4".parse().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ProviderOutcome>();

    let report = DnsblEngine::new(resolver)
        .query_all(
            &target,
            providers(&["a.example", "b.example", "c.example"]),
            &ScanConfig::default(),
            &CancellationToken::new(),
            Some(tx),
        )
        .await;

    let mut streamed = Vec::new();
    while let Some(entry) = rx.recv().await {
        streamed.push(entry.index);
    }
    assert_eq!(streamed, vec![1, 2, 0]);

    let indices: Vec<usize> = report.outcomes.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_scan_keeps_the_invariant() {
    let resolver = Arc::new(
        StubResolver::new()
            .with_delay("4.3.2.1.a.example", Duration::from_secs(60))
            .with_delay("4.3.2.1.b.example", Duration::from_secs(60)),
    );
    let cfg = ScanConfig {
        lifetime: Duration::from_secs(600),
        ..ScanConfig::default()
    };
    let target: Target = "1.2.3.4".parse().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = DnsblEngine::new(resolver)
        .query_all(
            &target,
            providers(&["a.example", "b.example"]),
            &cfg,
            &cancel,
            None,
        )
        .await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.errored, 2);
    assert!(report.outcomes.iter().all(|e| e.outcome
        == Outcome::Errored {
            reason: ErrorReason::Cancelled
        }));
}

#[test]
fn aggregate_counts_match_provider_count() {
    let outcomes = [
        Outcome::NotListed,
        Outcome::Listed {
            a_record: Ipv4Addr::new(127, 0, 0, 2),
            txt_record: None,
        },
        Outcome::Inconclusive {
            reason: InconclusiveReason::NoNameservers,
        },
        Outcome::Errored {
            reason: ErrorReason::Resolver("x".to_string()),
        },
    ];

    for len in 0..=12 {
        let entries: Vec<ProviderOutcome> = (0..len)
            .map(|index| ProviderOutcome {
                index,
                provider: Provider::new(&format!("p{index}.example")).unwrap(),
                outcome: outcomes[(index * 7) % outcomes.len()].clone(),
            })
            .collect();

        let forward = aggregate(entries.clone(), false);
        let backward = aggregate(entries.into_iter().rev(), false);

        assert_eq!(forward.total(), len);
        assert_eq!(forward, backward);
    }
}

#[test]
fn reversing_twice_restores_the_address() {
    for raw in ["8.8.8.8", "1.2.3.4", "255.0.128.7", "0.0.0.0"] {
        let target: Target = raw.parse().unwrap();
        let once = reverse_octets(&target.to_string());
        assert_eq!(reverse_octets(&once), raw);
    }
}
