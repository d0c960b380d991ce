/// Inbound adapters - the transports that drive the application
pub mod http;
