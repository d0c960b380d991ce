use async_trait::async_trait;
use riskwatch::prelude::*;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock IpReputationProvider for testing
///
/// Returns canned reputations per address and `UNKNOWN` for everything else.
pub struct MockIpReputationProvider {
    pub reputations: HashMap<IpAddr, IpReputation>,
    pub should_fail: bool,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockIpReputationProvider {
    pub fn new() -> Self {
        Self {
            reputations: HashMap::new(),
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_reputation(mut self, ip: &str, reputation: IpReputation) -> Self {
        self.reputations.insert(ip.parse().unwrap(), reputation);
        self
    }

    pub fn with_vpn(self, ip: &str, risk_score: i64) -> Self {
        let reputation = IpReputation {
            is_vpn: true,
            risk_score: Score::parse("risk_score", risk_score).unwrap(),
            country_code: "NL".to_string(),
            ..IpReputation::unknown()
        };
        self.with_reputation(ip, reputation)
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockIpReputationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpReputationProvider for MockIpReputationProvider {
    async fn check_ip(&self, ip: IpAddr) -> Result<IpReputation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("Mock reputation provider failure");
        }
        Ok(self
            .reputations
            .get(&ip)
            .cloned()
            .unwrap_or_else(IpReputation::unknown))
    }
}
