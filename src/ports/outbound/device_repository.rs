use crate::risk_assessment::domain::{Device, IpReputation, PassportString};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use uuid::Uuid;

/// DeviceRepository port for the addresses users have been seen on
///
/// A device is unique per (user, ip address) pair.
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    async fn find_by_user_and_ip(
        &self,
        user_id: &PassportString,
        ip_address: IpAddr,
    ) -> Result<Option<Device>>;

    /// Inserts or replaces the device with the same id.
    async fn save(&self, device: Device) -> Result<()>;

    async fn find(&self, id: Uuid) -> Result<Option<Device>>;

    /// Stores a fresh reputation on a device that is still present.
    /// Returns `None` without inserting anything if it was removed.
    async fn refresh(
        &self,
        id: Uuid,
        reputation: IpReputation,
        now: DateTime<Utc>,
    ) -> Result<Option<Device>>;

    /// Devices of one user, most recently seen first.
    async fn list_by_user(&self, user_id: &PassportString) -> Result<Vec<Device>>;

    /// Every device, most recently seen first.
    async fn list(&self) -> Result<Vec<Device>>;

    /// Returns how many devices were removed.
    async fn delete_by_user(&self, user_id: &PassportString) -> Result<usize>;
}
