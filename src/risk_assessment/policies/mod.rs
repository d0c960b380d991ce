mod device_risk;
mod risk_weights;
mod severity_policy;

pub use device_risk::DeviceRiskPolicy;
pub use risk_weights::UserRiskWeights;
pub use severity_policy::{BadgeColor, SeverityPolicy};
