use crate::application::dto::{UserRiskResponse, UserScoreResponse};
use crate::ports::outbound::{BreachEventRepository, DeviceRepository, UserRepository};
use crate::risk_assessment::domain::{PassportString, Score};
use crate::risk_assessment::policies::{DeviceRiskPolicy, UserRiskWeights};
use crate::risk_assessment::services::RiskScorer;
use crate::shared::{Result, RiskError};
use chrono::Utc;
use std::sync::Arc;

/// RiskAssessment - reads and maintains the scores attached to a user
///
/// `ref_score` is derived from open breach events and device count and is
/// stored on the user. The device risk score is derived on every read.
#[derive(Clone)]
pub struct RiskAssessment {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn BreachEventRepository>,
    devices: Arc<dyn DeviceRepository>,
    weights: UserRiskWeights,
    device_policy: DeviceRiskPolicy,
}

impl RiskAssessment {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn BreachEventRepository>,
        devices: Arc<dyn DeviceRepository>,
        weights: UserRiskWeights,
        device_policy: DeviceRiskPolicy,
    ) -> Self {
        Self {
            users,
            events,
            devices,
            weights,
            device_policy,
        }
    }

    /// Stored reference score of a registered user.
    pub async fn score(&self, passport: &PassportString) -> Result<UserScoreResponse> {
        let user = self
            .users
            .find_by_passport(passport)
            .await?
            .ok_or_else(|| RiskError::not_found("User", passport.as_str()))?;
        Ok(UserScoreResponse {
            passport_string: user.passport_string,
            ref_score: user.ref_score,
        })
    }

    /// The user, their devices and the device-derived risk score.
    pub async fn risk_detail(&self, passport: &PassportString) -> Result<UserRiskResponse> {
        let user = self
            .users
            .find_by_passport(passport)
            .await?
            .ok_or_else(|| RiskError::not_found("User", passport.as_str()))?;
        let devices = self.devices.list_by_user(passport).await?;
        let risk_score = self.device_policy.user_device_score(&devices);
        Ok(UserRiskResponse {
            user,
            risk_score,
            devices,
        })
    }

    /// Device-derived risk score. Users without devices score zero, whether
    /// or not they are registered.
    pub async fn device_score(&self, user_id: &PassportString) -> Result<Score> {
        let devices = self.devices.list_by_user(user_id).await?;
        Ok(self.device_policy.user_device_score(&devices))
    }

    /// Recomputes and stores the user's `ref_score`.
    ///
    /// # Returns
    /// The new score, or `None` if no user has this passport.
    pub async fn recompute(&self, passport: &PassportString) -> Result<Option<Score>> {
        if self.users.find_by_passport(passport).await?.is_none() {
            return Ok(None);
        }

        let events = self.events.list_by_user(passport).await?;
        let device_count = self.devices.list_by_user(passport).await?.len();
        let score = RiskScorer::ref_score(&events, device_count, &self.weights);

        let Some(previous) = self.users.set_ref_score(passport, score, Utc::now()).await? else {
            return Ok(None);
        };
        if previous != score {
            tracing::info!(
                passport = %passport,
                previous = %previous,
                ref_score = %score,
                "User reference score changed"
            );
        }

        Ok(Some(score))
    }

    pub fn device_policy(&self) -> DeviceRiskPolicy {
        self.device_policy
    }
}
