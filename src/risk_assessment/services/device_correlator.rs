use crate::risk_assessment::domain::{Device, PassportString};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

/// An IP address that more than one user has been seen on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedDevice {
    pub ip_address: IpAddr,
    pub user_ids: Vec<PassportString>,
}

/// DeviceCorrelator service for linking users through the addresses they share
pub struct DeviceCorrelator;

impl DeviceCorrelator {
    /// Groups devices by IP address and keeps addresses used by two or more
    /// distinct users.
    ///
    /// Output is sorted by IP, and each user list is sorted and deduplicated.
    pub fn shared_devices(devices: &[Device]) -> Vec<SharedDevice> {
        let mut by_ip: BTreeMap<IpAddr, BTreeSet<&PassportString>> = BTreeMap::new();
        for device in devices {
            by_ip
                .entry(device.ip_address)
                .or_default()
                .insert(&device.user_id);
        }

        by_ip
            .into_iter()
            .filter(|(_, users)| users.len() > 1)
            .map(|(ip_address, users)| SharedDevice {
                ip_address,
                user_ids: users.into_iter().cloned().collect(),
            })
            .collect()
    }
}
