//! # DNSBL Query Engine
//!
//! Asks every provider about one target and folds the answers into a
//! [`Report`].
//!
//! For each provider the engine resolves `<reversed-ip>.<provider>`:
//! 1. An A record means the target is listed. A TXT lookup on the same
//!    name then fetches the listing reason, best-effort.
//! 2. NXDOMAIN means the target is clean.
//! 3. Timeouts, unreachable nameservers and empty answers are inconclusive.
//! 4. Anything else is recorded as an error.
//!
//! Providers run concurrently, bounded by [`ScanConfig::workers`]. Each
//! finished provider is sent on the optional event channel as soon as it
//! completes. The final report is always in provider order.

use std::net::Ipv4Addr;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use unveil_common::config::ScanConfig;
use unveil_common::dnsbl::{
    ErrorReason, InconclusiveReason, Outcome, Provider, ProviderOutcome, Report, dedup_providers,
};
use unveil_common::network::target::Target;
use unveil_protocols::dnsbl::query_name;
use unveil_protocols::resolver::{DnsblResolver, Resolution};

use crate::aggregate::aggregate;

pub struct DnsblEngine {
    resolver: Arc<dyn DnsblResolver>,
}

impl DnsblEngine {
    pub fn new(resolver: Arc<dyn DnsblResolver>) -> Self {
        Self { resolver }
    }

    /// Queries `providers` about `target`.
    ///
    /// Duplicate providers are queried once. An empty provider list yields an
    /// all-zero report. Once `cancel` fires, every provider still pending is
    /// recorded as [`ErrorReason::Cancelled`].
    pub async fn query_all(
        &self,
        target: &Target,
        providers: Vec<Provider>,
        cfg: &ScanConfig,
        cancel: &CancellationToken,
        events: Option<UnboundedSender<ProviderOutcome>>,
    ) -> Report {
        let providers = dedup_providers(providers);
        if providers.is_empty() {
            info!("No providers to query");
            return Report::default();
        }

        info!(
            %target,
            providers = providers.len(),
            workers = cfg.workers(),
            "Querying blacklists"
        );

        let mut slots: Vec<Option<ProviderOutcome>> = vec![None; providers.len()];

        let mut results = stream::iter(providers.into_iter().enumerate())
            .map(|(index, provider)| async move {
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Outcome::Errored {
                        reason: ErrorReason::Cancelled,
                    },
                    outcome = self.query_provider(target, &provider, cfg) => outcome,
                };
                ProviderOutcome {
                    index,
                    provider,
                    outcome,
                }
            })
            .buffer_unordered(cfg.workers());

        while let Some(result) = results.next().await {
            if let Some(tx) = &events {
                // receiver gone only means nobody renders progress
                let _ = tx.send(result.clone());
            }
            let index = result.index;
            slots[index] = Some(result);
        }

        let report = aggregate(slots.into_iter().flatten(), cfg.count_inconclusive_as_good);
        info!(
            listed = report.listed,
            not_listed = report.not_listed,
            inconclusive = report.inconclusive,
            errored = report.errored,
            "Blacklist scan finished"
        );
        report
    }

    /// Runs the A and TXT lookups of one provider within `cfg.lifetime`.
    async fn query_provider(
        &self,
        target: &Target,
        provider: &Provider,
        cfg: &ScanConfig,
    ) -> Outcome {
        let query = query_name(target, provider);
        let deadline = Instant::now() + cfg.lifetime;

        let a = tokio::time::timeout_at(deadline, self.resolver.lookup_a(&query))
            .await
            .unwrap_or(Resolution::Timeout);

        let outcome = match classify(a) {
            Ok(a_record) => {
                let txt_record = tokio::time::timeout_at(deadline, self.resolver.lookup_txt(&query))
                    .await
                    .unwrap_or(Resolution::Timeout)
                    .first();
                Outcome::Listed {
                    a_record,
                    txt_record,
                }
            }
            Err(outcome) => outcome,
        };

        debug!(%provider, %query, ?outcome, "Provider answered");
        outcome
    }
}

/// Decides the outcome of an A lookup.
///
/// `Ok` carries the first A record: the target is listed and the TXT reason
/// should be looked up.
pub fn classify(a: Resolution<Ipv4Addr>) -> Result<Ipv4Addr, Outcome> {
    let inconclusive = |reason| Outcome::Inconclusive { reason };

    match a {
        Resolution::NxDomain => Err(Outcome::NotListed),
        Resolution::Timeout => Err(inconclusive(InconclusiveReason::Timeout)),
        Resolution::NoNameservers => Err(inconclusive(InconclusiveReason::NoNameservers)),
        Resolution::NoAnswer => Err(inconclusive(InconclusiveReason::NoAnswer)),
        Resolution::Records(records) => records
            .first()
            .copied()
            .ok_or(inconclusive(InconclusiveReason::NoAnswer)),
        Resolution::Other(message) => Err(Outcome::Errored {
            reason: ErrorReason::Resolver(message),
        }),
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Answers per query name; unknown names are NXDOMAIN.
    #[derive(Default)]
    struct StubResolver {
        a: HashMap<String, Resolution<Ipv4Addr>>,
        txt: HashMap<String, Resolution<String>>,
        delay: HashMap<String, Duration>,
    }

    impl StubResolver {
        fn listed(mut self, name: &str, a: Ipv4Addr, txt: Resolution<String>) -> Self {
            self.a.insert(name.into(), Resolution::Records(vec![a]));
            self.txt.insert(name.into(), txt);
            self
        }

        fn answer(mut self, name: &str, a: Resolution<Ipv4Addr>) -> Self {
            self.a.insert(name.into(), a);
            self
        }

        fn slow(mut self, name: &str, delay: Duration) -> Self {
            self.delay.insert(name.into(), delay);
            self
        }
    }

    #[async_trait]
    impl DnsblResolver for StubResolver {
        async fn lookup_a(&self, name: &str) -> Resolution<Ipv4Addr> {
            if let Some(delay) = self.delay.get(name) {
                tokio::time::sleep(*delay).await;
            }
            self.a.get(name).cloned().unwrap_or(Resolution::NxDomain)
        }

        async fn lookup_txt(&self, name: &str) -> Resolution<String> {
            self.txt.get(name).cloned().unwrap_or(Resolution::NxDomain)
        }
    }

    fn providers(names: &[&str]) -> Vec<Provider> {
        names.iter().map(|n| Provider::new(n).unwrap()).collect()
    }

    fn target() -> Target {
        "1.2.3.4".parse().unwrap()
    }

    async fn run(resolver: StubResolver, names: &[&str], cfg: ScanConfig) -> Report {
        let engine = DnsblEngine::new(Arc::new(resolver));
        engine
            .query_all(&target(), providers(names), &cfg, &CancellationToken::new(), None)
            .await
    }

    #[test]
    fn test_classify_order() {
        assert_eq!(classify(Resolution::NxDomain), Err(Outcome::NotListed));
        assert_eq!(
            classify(Resolution::Timeout),
            Err(Outcome::Inconclusive {
                reason: InconclusiveReason::Timeout
            })
        );
        assert_eq!(
            classify(Resolution::NoNameservers),
            Err(Outcome::Inconclusive {
                reason: InconclusiveReason::NoNameservers
            })
        );
        assert_eq!(
            classify(Resolution::Records(vec![])),
            Err(Outcome::Inconclusive {
                reason: InconclusiveReason::NoAnswer
            })
        );
        assert_eq!(
            classify(Resolution::Records(vec![
                Ipv4Addr::new(127, 0, 0, 2),
                Ipv4Addr::new(127, 0, 0, 10)
            ])),
            Ok(Ipv4Addr::new(127, 0, 0, 2))
        );
        assert!(matches!(
            classify(Resolution::Other("bad packet".into())),
            Err(Outcome::Errored {
                reason: ErrorReason::Resolver(_)
            })
        ));
    }

    #[tokio::test]
    async fn test_listed_with_reason() {
        let resolver = StubResolver::default().listed(
            "4.3.2.1.bl.example",
            Ipv4Addr::new(127, 0, 0, 2),
            Resolution::Records(vec!["spam".into()]),
        );
        let report = run(resolver, &["bl.example"], ScanConfig::default()).await;

        assert_eq!(report.bad, 1);
        assert_eq!(report.good, 0);
        assert_eq!(
            report.outcomes[0].outcome,
            Outcome::Listed {
                a_record: Ipv4Addr::new(127, 0, 0, 2),
                txt_record: Some("spam".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_txt_failure_keeps_listing() {
        let resolver = StubResolver::default().listed(
            "4.3.2.1.bl.example",
            Ipv4Addr::new(127, 0, 0, 4),
            Resolution::Other("refused".into()),
        );
        let report = run(resolver, &["bl.example"], ScanConfig::default()).await;

        assert_eq!(report.listed, 1);
        assert_eq!(report.errored, 0);
        assert_eq!(
            report.outcomes[0].outcome,
            Outcome::Listed {
                a_record: Ipv4Addr::new(127, 0, 0, 4),
                txt_record: None,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_providers() {
        let report = run(StubResolver::default(), &[], ScanConfig::default()).await;
        assert_eq!(report, Report::default());
    }

    #[tokio::test]
    async fn test_duplicates_queried_once() {
        let report = run(
            StubResolver::default(),
            &["a.example", "b.example", "A.example."],
            ScanConfig::default(),
        )
        .await;
        assert_eq!(report.total(), 2);
        assert_eq!(report.not_listed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifetime_bounds_lookup() {
        let resolver = StubResolver::default()
            .listed(
                "4.3.2.1.slow.example",
                Ipv4Addr::new(127, 0, 0, 2),
                Resolution::NxDomain,
            )
            .slow("4.3.2.1.slow.example", Duration::from_secs(30));
        let cfg = ScanConfig {
            lifetime: Duration::from_secs(2),
            ..ScanConfig::default()
        };

        let report = run(resolver, &["slow.example", "fast.example"], cfg).await;

        assert_eq!(
            report.outcomes[0].outcome,
            Outcome::Inconclusive {
                reason: InconclusiveReason::Timeout
            }
        );
        assert_eq!(report.outcomes[1].outcome, Outcome::NotListed);
        assert_eq!(report.good, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_keeps_provider_order() {
        let resolver = StubResolver::default()
            .slow("4.3.2.1.first.example", Duration::from_millis(300))
            .slow("4.3.2.1.second.example", Duration::from_millis(200))
            .slow("4.3.2.1.third.example", Duration::from_millis(100))
            .answer("4.3.2.1.second.example", Resolution::NoNameservers);

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let engine = DnsblEngine::new(Arc::new(resolver));
        let report = engine
            .query_all(
                &target(),
                providers(&["first.example", "second.example", "third.example"]),
                &ScanConfig::default(),
                &CancellationToken::new(),
                Some(tx),
            )
            .await;

        let mut streamed = Vec::new();
        while let Ok(event) = rx.try_recv() {
            streamed.push(event.provider.to_string());
        }
        assert_eq!(streamed, vec!["third.example", "second.example", "first.example"]);

        let order: Vec<String> = report.outcomes.iter().map(|e| e.provider.to_string()).collect();
        assert_eq!(order, vec!["first.example", "second.example", "third.example"]);
        assert_eq!(report.inconclusive, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_worker_runs_sequentially() {
        let resolver = StubResolver::default()
            .slow("4.3.2.1.a.example", Duration::from_secs(1))
            .slow("4.3.2.1.b.example", Duration::from_secs(1));
        let cfg = ScanConfig {
            concurrency: 0,
            ..ScanConfig::default()
        };

        let started = Instant::now();
        let report = run(resolver, &["a.example", "b.example"], cfg).await;

        assert_eq!(report.not_listed, 2);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_marks_pending_providers() {
        let resolver = StubResolver::default()
            .slow("4.3.2.1.hung.example", Duration::from_secs(3600))
            .answer("4.3.2.1.hung.example", Resolution::NxDomain);
        let cfg = ScanConfig {
            lifetime: Duration::from_secs(7200),
            ..ScanConfig::default()
        };
        let engine = DnsblEngine::new(Arc::new(resolver));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let report = engine
            .query_all(
                &target(),
                providers(&["quick.example", "hung.example"]),
                &cfg,
                &cancel,
                None,
            )
            .await;

        assert_eq!(report.total(), 2);
        assert_eq!(report.not_listed, 1);
        assert_eq!(report.errored, 1);
        assert_eq!(
            report.outcomes[1].outcome,
            Outcome::Errored {
                reason: ErrorReason::Cancelled
            }
        );
    }
}
