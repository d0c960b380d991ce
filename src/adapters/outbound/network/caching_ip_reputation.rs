use crate::ports::outbound::IpReputationProvider;
use crate::risk_assessment::domain::IpReputation;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// CachingIpReputationProvider wraps an IpReputationProvider and adds in-memory caching.
///
/// This adapter implements the decorator pattern so any provider can be
/// cached. Failed lookups are not cached, so the next request retries.
pub struct CachingIpReputationProvider<P: IpReputationProvider> {
    inner: P,
    cache: Arc<DashMap<IpAddr, IpReputation>>,
}

impl<P: IpReputationProvider> CachingIpReputationProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<P: IpReputationProvider> IpReputationProvider for CachingIpReputationProvider<P> {
    async fn check_ip(&self, ip: IpAddr) -> Result<IpReputation> {
        if let Some(cached) = self.cache.get(&ip) {
            return Ok(cached.clone());
        }

        let reputation = self.inner.check_ip(ip).await?;
        self.cache.insert(ip, reputation.clone());

        Ok(reputation)
    }
}
