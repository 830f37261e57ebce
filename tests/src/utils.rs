use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use unveil_protocols::resolver::{DnsblResolver, Resolution};

/// In-memory resolver keyed by full query name. Unknown names are NXDOMAIN.
#[derive(Default)]
pub struct StubResolver {
    a: HashMap<String, Resolution<Ipv4Addr>>,
    txt: HashMap<String, Resolution<String>>,
    delays: HashMap<String, Duration>,
    queried: Mutex<Vec<String>>,
}

impl StubResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_a(mut self, name: &str, answer: Resolution<Ipv4Addr>) -> Self {
        self.a.insert(name.to_string(), answer);
        self
    }

    pub fn with_txt(mut self, name: &str, answer: Resolution<String>) -> Self {
        self.txt.insert(name.to_string(), answer);
        self
    }

    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// Names asked for an A record, in call order.
    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().map(|names| names.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DnsblResolver for StubResolver {
    async fn lookup_a(&self, name: &str) -> Resolution<Ipv4Addr> {
        if let Ok(mut names) = self.queried.lock() {
            names.push(name.to_string());
        }
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        self.a.get(name).cloned().unwrap_or(Resolution::NxDomain)
    }

    async fn lookup_txt(&self, name: &str) -> Resolution<String> {
        self.txt.get(name).cloned().unwrap_or(Resolution::NxDomain)
    }
}
