/// Network adapters for external API calls
mod caching_ip_reputation;
mod ipqs_client;
mod offline;

pub use caching_ip_reputation::CachingIpReputationProvider;
pub use ipqs_client::IpQualityScoreClient;
pub use offline::OfflineIpReputationProvider;
