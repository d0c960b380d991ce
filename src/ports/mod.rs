/// Ports module defining interfaces for hexagonal architecture
///
/// The HTTP adapter drives the application use cases directly, so only
/// outbound (driven) ports are declared here.
pub mod outbound;
