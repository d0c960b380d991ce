use crate::risk_assessment::domain::{BreachEvent, BreachPolicy, Company, Device, User};
use serde::{Deserialize, Serialize};

/// Current on-disk snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything the in-memory store holds, as one serializable document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub version: u32,
    pub users: Vec<User>,
    pub companies: Vec<Company>,
    pub breach_policies: Vec<BreachPolicy>,
    pub breach_events: Vec<BreachEvent>,
    pub devices: Vec<Device>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.companies.is_empty()
            && self.breach_policies.is_empty()
            && self.breach_events.is_empty()
            && self.devices.is_empty()
    }
}
