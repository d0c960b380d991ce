use crate::ports::outbound::IpReputationProvider;
use crate::risk_assessment::domain::{is_local_address, IpReputation};
use crate::shared::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// Reputation provider used when no lookup service is configured.
///
/// Local addresses are reported as `LOCAL`, everything else as `UNKNOWN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineIpReputationProvider;

#[async_trait]
impl IpReputationProvider for OfflineIpReputationProvider {
    async fn check_ip(&self, ip: IpAddr) -> Result<IpReputation> {
        if is_local_address(&ip) {
            Ok(IpReputation::local())
        } else {
            Ok(IpReputation::unknown())
        }
    }
}
