use super::input;
use super::RiskAssessment;
use crate::application::dto::{AddDeviceRequest, DeviceRiskResponse};
use crate::ports::outbound::{DeviceRepository, IpReputationProvider};
use crate::risk_assessment::domain::{Device, IpReputation, PassportString};
use crate::risk_assessment::services::{DeviceCorrelator, SharedDevice};
use crate::shared::{Result, RiskError};
use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::net::IpAddr;
use std::sync::Arc;

/// Upper bound on reputation lookups in flight for one refresh
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// DeviceTracker - records the addresses users are seen on
///
/// Every recorded device carries the reputation of its address at the time it
/// was last seen. Lookup failures never fail the request: the device is stored
/// with an `UNKNOWN` reputation instead.
#[derive(Clone)]
pub struct DeviceTracker {
    devices: Arc<dyn DeviceRepository>,
    reputation: Arc<dyn IpReputationProvider>,
    risk: RiskAssessment,
}

impl DeviceTracker {
    pub fn new(
        devices: Arc<dyn DeviceRepository>,
        reputation: Arc<dyn IpReputationProvider>,
        risk: RiskAssessment,
    ) -> Self {
        Self {
            devices,
            reputation,
            risk,
        }
    }

    pub async fn add_device(&self, request: AddDeviceRequest) -> Result<Device> {
        let user_id = input::passport("user_id", &request.user_id)?;
        let ip = input::ip_address(&request.ip_address)?;
        self.record(&user_id, ip).await
    }

    /// Inserts the device or refreshes the existing one for this user and
    /// address, then updates the user's reference score.
    pub async fn record(&self, user_id: &PassportString, ip: IpAddr) -> Result<Device> {
        let reputation = self.lookup(ip).await;
        let now = Utc::now();

        let existing = match self.devices.find_by_user_and_ip(user_id, ip).await? {
            Some(existing) => {
                self.devices
                    .refresh(existing.id, reputation.clone(), now)
                    .await?
            }
            None => None,
        };
        let device = match existing {
            Some(device) => device,
            None => {
                tracing::info!(user_id = %user_id, %ip, "New device recorded");
                let device = Device::new(user_id.clone(), ip, reputation, now);
                self.devices.save(device.clone()).await?;
                device
            }
        };

        self.risk.recompute(user_id).await?;
        Ok(device)
    }

    /// Re-checks the reputation of every device of the user.
    pub async fn refresh_devices_of(&self, user_id: &str) -> Result<Vec<Device>> {
        let user_id = input::passport("user_id", user_id)?;
        let devices = self.devices.list_by_user(&user_id).await?;

        // Devices removed while their lookup was in flight stay removed.
        let refreshed: Vec<Option<Device>> = stream::iter(devices)
            .map(|device| async move {
                let reputation = self.lookup(device.ip_address).await;
                self.devices.refresh(device.id, reputation, Utc::now()).await
            })
            .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
            .try_collect()
            .await?;

        let count = refreshed.iter().flatten().count();
        tracing::debug!(user_id = %user_id, count, "Device reputations refreshed");
        self.devices.list_by_user(&user_id).await
    }

    pub async fn devices_of(&self, user_id: &str) -> Result<Vec<Device>> {
        let user_id = input::passport("user_id", user_id)?;
        self.devices.list_by_user(&user_id).await
    }

    pub async fn device(&self, device_id: &str) -> Result<Device> {
        let id = input::uuid("device_id", device_id)?;
        self.devices
            .find(id)
            .await?
            .ok_or_else(|| RiskError::not_found("Device", device_id).into())
    }

    /// Removes every device of the user and returns how many were removed.
    pub async fn delete_devices_of(&self, user_id: &str) -> Result<usize> {
        let user_id = input::passport("user_id", user_id)?;
        let removed = self.devices.delete_by_user(&user_id).await?;
        if removed > 0 {
            tracing::info!(user_id = %user_id, removed, "Devices deleted");
            self.risk.recompute(&user_id).await?;
        }
        Ok(removed)
    }

    pub async fn suspicious(&self) -> Result<Vec<Device>> {
        let policy = self.risk.device_policy();
        let devices = self.devices.list().await?;
        Ok(devices
            .into_iter()
            .filter(|d| policy.is_suspicious(d))
            .collect())
    }

    pub async fn shared(&self) -> Result<Vec<SharedDevice>> {
        let devices = self.devices.list().await?;
        Ok(DeviceCorrelator::shared_devices(&devices))
    }

    pub async fn risk_score(&self, user_id: &str) -> Result<DeviceRiskResponse> {
        let user_id = input::passport("user_id", user_id)?;
        let risk_score = self.risk.device_score(&user_id).await?;
        Ok(DeviceRiskResponse {
            user_id,
            risk_score,
        })
    }

    async fn lookup(&self, ip: IpAddr) -> IpReputation {
        match self.reputation.check_ip(ip).await {
            Ok(reputation) => reputation,
            Err(e) => {
                tracing::warn!(%ip, error = %e, "IP reputation lookup failed, recording as unknown");
                IpReputation::unknown()
            }
        }
    }
}
