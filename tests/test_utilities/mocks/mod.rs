/// Mock implementations for testing
mod mock_ip_reputation_provider;

pub use mock_ip_reputation_provider::MockIpReputationProvider;
