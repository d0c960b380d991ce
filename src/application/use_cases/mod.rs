/// Use cases module containing application business logic orchestration
mod breach_events;
mod company_catalog;
mod device_tracker;
mod input;
mod risk_assessment;
mod user_registry;

pub use breach_events::BreachEventService;
pub use company_catalog::CompanyCatalog;
pub use device_tracker::DeviceTracker;
pub use risk_assessment::RiskAssessment;
pub use user_registry::UserRegistry;
