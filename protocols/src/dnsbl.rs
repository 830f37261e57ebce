//! DNSBL query names.
//!
//! A provider is asked about `a.b.c.d` through the name `d.c.b.a.<zone>`.

use unveil_common::dnsbl::Provider;
use unveil_common::network::target::Target;

/// Reverses the dot-separated labels of `ip`.
///
/// The input must already be a validated dotted-quad; anything else is
/// reversed label by label without checks.
pub fn reverse_octets(ip: &str) -> String {
    let mut labels: Vec<&str> = ip.split('.').collect();
    labels.reverse();
    labels.join(".")
}

pub fn build_query(reversed_ip: &str, provider: &str) -> String {
    format!("{reversed_ip}.{provider}")
}

/// Query name for `target` against `provider`.
pub fn query_name(target: &Target, provider: &Provider) -> String {
    build_query(&reverse_octets(&target.to_string()), provider.as_str())
}
