use super::input;
use super::RiskAssessment;
use crate::application::dto::{ManualBreachRequest, ReportBreachRequest, ResolveBreachRequest};
use crate::ports::outbound::{BreachEventRepository, UserRepository};
use crate::risk_assessment::domain::{
    validate_company_id, validate_text, BreachDraft, BreachEvent, BreachStatus, BreachType,
    Score, Severity,
};
use crate::risk_assessment::policies::SeverityPolicy;
use crate::shared::{Result, RiskError};
use chrono::Utc;
use std::sync::Arc;

/// BreachEventService - the lifecycle of reported breaches
///
/// Every mutation recomputes the affected user's reference score before
/// returning, so a client that re-fetches sees the new score.
#[derive(Clone)]
pub struct BreachEventService {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn BreachEventRepository>,
    risk: RiskAssessment,
}

impl BreachEventService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn BreachEventRepository>,
        risk: RiskAssessment,
    ) -> Self {
        Self {
            users,
            events,
            risk,
        }
    }

    /// Records an open breach whose severity is derived from its effect score.
    pub async fn report(&self, request: ReportBreachRequest) -> Result<BreachEvent> {
        let draft = self.draft(request).await?;
        let severity = SeverityPolicy::from_effect_score(draft.effect_score);
        self.store(BreachEvent::reported(draft, severity, Utc::now()))
            .await
    }

    /// Records an administrator-entered breach.
    ///
    /// An explicit severity (including CRITICAL) wins over the derived one,
    /// and the entry may be recorded as already resolved.
    pub async fn report_manual(&self, request: ManualBreachRequest) -> Result<BreachEvent> {
        let explicit = parse_optional::<Severity>(request.severity.as_deref())?;
        let status =
            parse_optional::<BreachStatus>(request.status.as_deref())?.unwrap_or(BreachStatus::Open);

        let draft = self.draft(request.report).await?;
        let severity = SeverityPolicy::resolve_manual(explicit, draft.effect_score);
        self.store(BreachEvent::manual(draft, severity, status, Utc::now()))
            .await
    }

    pub async fn list(&self) -> Result<Vec<BreachEvent>> {
        self.events.list().await
    }

    pub async fn unresolved(&self) -> Result<Vec<BreachEvent>> {
        let events = self.events.list().await?;
        Ok(events.into_iter().filter(BreachEvent::is_open).collect())
    }

    pub async fn get(&self, id: &str) -> Result<BreachEvent> {
        let id = input::uuid("id", id)?;
        self.events
            .find(id)
            .await?
            .ok_or_else(|| RiskError::not_found("Breach event", id.to_string()).into())
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<BreachEvent>> {
        let user_id = input::passport("user_id", user_id)?;
        self.events.list_by_user(&user_id).await
    }

    pub async fn by_company(&self, company_id: &str) -> Result<Vec<BreachEvent>> {
        let company_id = validate_company_id(company_id)?;
        self.events.list_by_company(&company_id).await
    }

    /// OPEN -> RESOLVED.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Conflict` if the event is already
    /// resolved. The stored event is unchanged on error.
    pub async fn resolve(&self, id: &str, request: ResolveBreachRequest) -> Result<BreachEvent> {
        let uuid = input::uuid("id", id)?;
        let event = self
            .events
            .resolve(uuid, request.resolution_notes, Utc::now())
            .await?;

        tracing::info!(event_id = %event.id, user_id = %event.user_id, "Breach event resolved");
        self.risk.recompute(&event.user_id).await?;
        Ok(event)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let uuid = input::uuid("id", id)?;
        let event = self
            .events
            .delete(uuid)
            .await?
            .ok_or_else(|| RiskError::not_found("Breach event", uuid.to_string()))?;

        tracing::info!(event_id = %event.id, user_id = %event.user_id, "Breach event deleted");
        self.risk.recompute(&event.user_id).await?;
        Ok(())
    }

    async fn draft(&self, request: ReportBreachRequest) -> Result<BreachDraft> {
        let user_id = input::passport("user_id", &request.user_id)?;
        let breach_type: BreachType = request.breach_type.parse()?;
        let effect_score = Score::parse("effect_score", request.effect_score)?;
        let description = validate_text("description", &request.description, false)?;
        let company_id = match request.company_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(validate_company_id(id)?),
            _ => None,
        };

        if self.users.find_by_passport(&user_id).await?.is_none() {
            return Err(RiskError::not_found("User", user_id.as_str()).into());
        }

        Ok(BreachDraft {
            user_id,
            company_id,
            breach_type,
            effect_score,
            description,
        })
    }

    async fn store(&self, event: BreachEvent) -> Result<BreachEvent> {
        self.events.insert(event.clone()).await?;
        tracing::info!(
            event_id = %event.id,
            user_id = %event.user_id,
            breach_type = %event.breach_type,
            severity = %event.severity,
            manual = event.manual_entry,
            "Breach event recorded"
        );
        self.risk.recompute(&event.user_id).await?;
        Ok(event)
    }
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = RiskError>,
{
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(Some(text.parse()?)),
        _ => Ok(None),
    }
}
