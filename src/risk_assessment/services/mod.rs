mod device_correlator;
mod risk_scorer;

pub use device_correlator::{DeviceCorrelator, SharedDevice};
pub use risk_scorer::RiskScorer;
