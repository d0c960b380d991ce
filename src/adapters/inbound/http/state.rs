use crate::application::use_cases::{
    BreachEventService, CompanyCatalog, DeviceTracker, RiskAssessment, UserRegistry,
};
use crate::ports::outbound::{
    BreachEventRepository, CompanyRepository, DeviceRepository, IpReputationProvider,
    UserRepository,
};
use crate::risk_assessment::policies::{DeviceRiskPolicy, UserRiskWeights};
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: UserRegistry,
    pub breach_events: BreachEventService,
    pub companies: CompanyCatalog,
    pub devices: DeviceTracker,
    /// Human-readable storage description for the health endpoints
    pub storage: Arc<str>,
}

impl AppState {
    /// Wires every use case onto one store that implements all repositories.
    pub fn new<S>(
        store: Arc<S>,
        reputation: Arc<dyn IpReputationProvider>,
        weights: UserRiskWeights,
        device_policy: DeviceRiskPolicy,
        storage: impl Into<String>,
    ) -> Self
    where
        S: UserRepository + CompanyRepository + BreachEventRepository + DeviceRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let companies: Arc<dyn CompanyRepository> = store.clone();
        let events: Arc<dyn BreachEventRepository> = store.clone();
        let devices: Arc<dyn DeviceRepository> = store;

        let risk = RiskAssessment::new(
            users.clone(),
            events.clone(),
            devices.clone(),
            weights,
            device_policy,
        );
        let device_tracker = DeviceTracker::new(devices, reputation, risk.clone());

        Self {
            users: UserRegistry::new(users.clone(), device_tracker.clone(), risk.clone()),
            breach_events: BreachEventService::new(users, events, risk),
            companies: CompanyCatalog::new(companies),
            devices: device_tracker,
            storage: Arc::from(storage.into()),
        }
    }
}
