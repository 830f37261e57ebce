#![cfg(test)]
use std::io::Write;
use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use unveil_common::config::ScanConfig;
use unveil_common::dnsbl::Outcome;
use unveil_common::network::target::Target;
use unveil_core::engine::DnsblEngine;
use unveil_core::providers::file::FileProviders;
use unveil_core::providers::{ProviderError, ProviderSource};
use unveil_protocols::resolver::Resolution;

use crate::utils::StubResolver;

#[tokio::test]
async fn file_providers_feed_the_engine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "  zen.spamhaus.org").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "bl.spamcop.net  ").unwrap();
    writeln!(file, "ZEN.SPAMHAUS.ORG").unwrap();

    let providers = FileProviders::new(file.path()).providers().await.unwrap();
    assert_eq!(providers.len(), 2);

    let resolver = Arc::new(StubResolver::new().with_a(
        "2.0.0.127.bl.spamcop.net",
        Resolution::Records(vec![Ipv4Addr::new(127, 0, 0, 2)]),
    ));
    let target: Target = "127.0.0.2".parse().unwrap();
    let report = DnsblEngine::new(resolver)
        .query_all(
            &target,
            providers,
            &ScanConfig::default(),
            &CancellationToken::new(),
            None,
        )
        .await;

    assert_eq!(report.not_listed, 1);
    assert_eq!(report.listed, 1);
    assert_eq!(report.outcomes[0].provider.as_str(), "zen.spamhaus.org");
    assert!(matches!(report.outcomes[1].outcome, Outcome::Listed { txt_record: None, .. }));
}

#[tokio::test]
async fn unreadable_file_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileProviders::new(dir.path().join("nope.txt"))
        .providers()
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Io { .. }));
    assert!(err.to_string().contains("nope.txt"));
}
