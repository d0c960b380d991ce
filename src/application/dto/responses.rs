use crate::risk_assessment::domain::{
    BreachEvent, BreachPolicy, Company, Device, PassportString, Score, User,
};
use crate::risk_assessment::policies::BadgeColor;
use serde::Serialize;

/// Payload of `GET /users/score/:passport`
#[derive(Debug, Clone, Serialize)]
pub struct UserScoreResponse {
    pub passport_string: PassportString,
    pub ref_score: Score,
}

/// Payload of `GET /users/risk/:passport`
///
/// `risk_score` is the device-derived score, `user.ref_score` the
/// breach-derived one.
#[derive(Debug, Clone, Serialize)]
pub struct UserRiskResponse {
    pub user: User,
    pub risk_score: Score,
    pub devices: Vec<Device>,
}

/// Payload of `GET /user-info/risk-score/:user_id`
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRiskResponse {
    pub user_id: PassportString,
    pub risk_score: Score,
}

/// A breach event as served, with the dashboard badge colour attached
#[derive(Debug, Clone, Serialize)]
pub struct BreachEventView {
    #[serde(flatten)]
    pub event: BreachEvent,
    pub badge_color: BadgeColor,
}

impl From<BreachEvent> for BreachEventView {
    fn from(event: BreachEvent) -> Self {
        let badge_color = BadgeColor::for_effect_score(event.effect_score);
        Self { event, badge_color }
    }
}

/// A company with its current breach policy, if any
#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    #[serde(flatten)]
    pub company: Company,
    pub breach: Option<BreachPolicy>,
}

/// Payload of delete endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Deleted<T> {
    pub deleted: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk_assessment::domain::{BreachDraft, BreachType, Severity};
    use chrono::Utc;

    #[test]
    fn test_breach_event_view_is_flat() {
        let event = BreachEvent::reported(
            BreachDraft {
                user_id: PassportString::new("abc123".to_string()).unwrap(),
                company_id: None,
                breach_type: BreachType::DataLeak,
                effect_score: Score::parse("effect_score", 85).unwrap(),
                description: "dump".to_string(),
            },
            Severity::High,
            Utc::now(),
        );
        let value = serde_json::to_value(BreachEventView::from(event)).unwrap();
        assert_eq!(value["breach_type"], "DATA_LEAK");
        assert_eq!(value["severity"], "HIGH");
        assert_eq!(value["status"], "OPEN");
        assert_eq!(value["badge_color"], "red");
        assert!(value.get("company_id").is_none());
    }
}
