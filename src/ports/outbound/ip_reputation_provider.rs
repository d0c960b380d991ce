use crate::risk_assessment::domain::IpReputation;
use crate::shared::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// IpReputationProvider port for looking up how trustworthy an address is
///
/// This port abstracts the external reputation service (e.g. IPQualityScore).
///
/// # Async Support
/// Lookups are async so device refreshes can run concurrently.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait IpReputationProvider: Send + Sync {
    /// Looks up the reputation of a single address
    ///
    /// # Errors
    /// Returns an error if:
    /// - The network request fails
    /// - The service returns an error status or reports failure
    /// - The response cannot be parsed
    async fn check_ip(&self, ip: IpAddr) -> Result<IpReputation>;
}
