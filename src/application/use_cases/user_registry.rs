use super::input;
use super::{DeviceTracker, RiskAssessment};
use crate::application::dto::{
    CreateUserRequest, UpdateUserRequest, UserRiskResponse, UserScoreResponse,
};
use crate::ports::outbound::UserRepository;
use crate::risk_assessment::domain::{PassportString, User, UserName};
use crate::shared::{Result, RiskError};
use chrono::Utc;
use std::net::IpAddr;
use std::sync::Arc;

/// UserRegistry - registration and lookup of users by passport string
///
/// Whenever the caller's address is known, the call also records the address
/// as one of the user's devices.
#[derive(Clone)]
pub struct UserRegistry {
    users: Arc<dyn UserRepository>,
    devices: DeviceTracker,
    risk: RiskAssessment,
}

impl UserRegistry {
    pub fn new(users: Arc<dyn UserRepository>, devices: DeviceTracker, risk: RiskAssessment) -> Self {
        Self {
            users,
            devices,
            risk,
        }
    }

    /// Registers a user, or returns the existing user with that passport
    ///
    /// # Arguments
    /// * `request` - Name and passport; its `ip_address` is used when the
    ///   transport did not provide one
    /// * `client_ip` - Address taken from forwarding headers, if any
    ///
    /// # Returns
    /// The user and `true` if it was created by this call
    pub async fn register(
        &self,
        request: CreateUserRequest,
        client_ip: Option<IpAddr>,
    ) -> Result<(User, bool)> {
        let passport = input::passport("passport_string", &request.passport_string)?;
        let name = UserName::new(request.name)?;
        let client_ip = match client_ip {
            Some(ip) => Some(ip),
            None => match request.ip_address.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => Some(input::ip_address(text)?),
                _ => None,
            },
        };

        let (user, created) = self
            .users
            .insert_if_absent(User::register(passport, name, Utc::now()))
            .await?;
        if created {
            tracing::info!(passport = %user.passport_string, user_id = %user.id, "User registered");
        } else {
            tracing::debug!(passport = %user.passport_string, "User already registered");
        }

        // Breach events outlive a deleted user, so a new registration may
        // already have open events to score.
        match client_ip {
            Some(ip) => {
                self.devices.record(&user.passport_string, ip).await?;
            }
            None if created => {
                self.risk.recompute(&user.passport_string).await?;
            }
            None => return Ok((user, created)),
        }
        Ok((self.find(&user.passport_string).await?, created))
    }

    pub async fn get(&self, passport: &str, client_ip: Option<IpAddr>) -> Result<User> {
        let passport = input::passport("passport_string", passport)?;
        self.find(&passport).await?;
        self.track(&passport, client_ip).await?;
        self.find(&passport).await
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn rename(
        &self,
        passport: &str,
        request: UpdateUserRequest,
        client_ip: Option<IpAddr>,
    ) -> Result<User> {
        let passport = input::passport("passport_string", passport)?;
        let name = UserName::new(request.name)?;

        self.users
            .rename(&passport, name, Utc::now())
            .await?
            .ok_or_else(|| RiskError::not_found("User", passport.as_str()))?;

        self.track(&passport, client_ip).await?;
        self.find(&passport).await
    }

    /// Deletes the user and every device recorded for them.
    ///
    /// Breach events are kept: they belong to the reporting company's history.
    pub async fn delete(&self, passport: &str) -> Result<()> {
        let passport = input::passport("passport_string", passport)?;
        if !self.users.delete(&passport).await? {
            return Err(RiskError::not_found("User", passport.as_str()).into());
        }
        let removed = self.devices.delete_devices_of(passport.as_str()).await?;
        tracing::info!(passport = %passport, devices_removed = removed, "User deleted");
        Ok(())
    }

    pub async fn score(&self, passport: &str) -> Result<UserScoreResponse> {
        let passport = input::passport("passport_string", passport)?;
        self.risk.score(&passport).await
    }

    pub async fn risk(&self, passport: &str, client_ip: Option<IpAddr>) -> Result<UserRiskResponse> {
        let passport = input::passport("passport_string", passport)?;
        self.find(&passport).await?;
        self.track(&passport, client_ip).await?;
        self.risk.risk_detail(&passport).await
    }

    async fn find(&self, passport: &PassportString) -> Result<User> {
        self.users
            .find_by_passport(passport)
            .await?
            .ok_or_else(|| RiskError::not_found("User", passport.as_str()).into())
    }

    async fn track(&self, passport: &PassportString, client_ip: Option<IpAddr>) -> Result<()> {
        if let Some(ip) = client_ip {
            self.devices.record(passport, ip).await?;
        }
        Ok(())
    }
}
