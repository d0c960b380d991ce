use super::{BreachType, Score};
use crate::shared::{Result, RiskError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length for company ids (security limit)
const MAX_COMPANY_ID_LENGTH: usize = 128;

/// Maximum length for company names and industries
const MAX_LABEL_LENGTH: usize = 200;

/// A platform that reports breaches against its users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Builds a company, generating an id when the client did not send one.
    pub fn new(
        id: Option<String>,
        name: &str,
        industry: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let id = match id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(id) => validate_company_id(&id)?,
            None => Uuid::new_v4().to_string(),
        };
        Ok(Self {
            id,
            name: validate_label("name", name)?,
            industry: validate_label("industry", industry)?,
            created_at: now,
        })
    }
}

/// Company ids appear as path segments (`/breaches/:companyId`).
pub fn validate_company_id(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RiskError::validation("company_id", "must not be empty").into());
    }
    if id.len() > MAX_COMPANY_ID_LENGTH {
        return Err(RiskError::validation(
            "company_id",
            format!("must be at most {} bytes", MAX_COMPANY_ID_LENGTH),
        )
        .into());
    }
    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(RiskError::validation(
            "company_id",
            "only alphanumeric characters, hyphens, underscores and dots are allowed",
        )
        .into());
    }
    Ok(id.to_string())
}

fn validate_label(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RiskError::validation(field, "must not be empty").into());
    }
    if value.chars().count() > MAX_LABEL_LENGTH {
        return Err(RiskError::validation(
            field,
            format!("must be at most {} characters", MAX_LABEL_LENGTH),
        )
        .into());
    }
    Ok(value.to_string())
}

/// The breach a company watches for and how heavily it weighs
///
/// One policy per company. Served at `/breaches/:companyId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachPolicy {
    pub company_id: String,
    pub breach_type: BreachType,
    pub effect_score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl BreachPolicy {
    pub fn new(
        company_id: String,
        breach_type: BreachType,
        effect_score: Score,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            company_id,
            breach_type,
            effect_score,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            timestamp: now,
        }
    }

    pub fn is_high_impact(&self, threshold: Score) -> bool {
        self.effect_score >= threshold
    }
}
