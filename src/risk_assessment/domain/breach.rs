use super::{PassportString, Score};
use crate::shared::{Result, RiskError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Maximum length for breach descriptions and resolution notes
const MAX_TEXT_LENGTH: usize = 4000;

/// Folds the spellings seen from clients ("violating terms",
/// "violating_terms", "Violating-Terms") into SCREAMING_SNAKE_CASE.
fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Kind of policy violation a user committed against a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum BreachType {
    ViolatingTerms,
    Fraud,
    Default,
    SuspiciousActivity,
    IllegalActivity,
    DataLeak,
}

impl BreachType {
    pub const ALL: [BreachType; 6] = [
        BreachType::ViolatingTerms,
        BreachType::Fraud,
        BreachType::Default,
        BreachType::SuspiciousActivity,
        BreachType::IllegalActivity,
        BreachType::DataLeak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BreachType::ViolatingTerms => "VIOLATING_TERMS",
            BreachType::Fraud => "FRAUD",
            BreachType::Default => "DEFAULT",
            BreachType::SuspiciousActivity => "SUSPICIOUS_ACTIVITY",
            BreachType::IllegalActivity => "ILLEGAL_ACTIVITY",
            BreachType::DataLeak => "DATA_LEAK",
        }
    }
}

impl FromStr for BreachType {
    type Err = RiskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        BreachType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                RiskError::validation(
                    "breach_type",
                    format!(
                        "unknown breach type '{}'. Expected one of: {}",
                        s,
                        BreachType::ALL.map(|t| t.as_str()).join(", ")
                    ),
                )
            })
    }
}

impl TryFrom<String> for BreachType {
    type Error = RiskError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for BreachType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a breach event, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl FromStr for Severity {
    type Err = RiskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == normalized)
            .ok_or_else(|| {
                RiskError::validation(
                    "severity",
                    format!("unknown severity '{}'. Expected LOW, MEDIUM, HIGH or CRITICAL", s),
                )
            })
    }
}

impl TryFrom<String> for Severity {
    type Error = RiskError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum BreachStatus {
    Open,
    Resolved,
}

impl FromStr for BreachStatus {
    type Err = RiskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "OPEN" => Ok(BreachStatus::Open),
            "RESOLVED" => Ok(BreachStatus::Resolved),
            _ => Err(RiskError::validation(
                "status",
                format!("unknown status '{}'. Expected OPEN or RESOLVED", s),
            )),
        }
    }
}

impl TryFrom<String> for BreachStatus {
    type Error = RiskError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validated free text (descriptions, resolution notes).
pub fn validate_text(field: &str, value: &str, required: bool) -> Result<String> {
    let trimmed = value.trim();
    if required && trimmed.is_empty() {
        return Err(RiskError::validation(field, "must not be empty").into());
    }
    if trimmed.len() > MAX_TEXT_LENGTH {
        return Err(RiskError::validation(
            field,
            format!("must be at most {} bytes", MAX_TEXT_LENGTH),
        )
        .into());
    }
    Ok(trimmed.to_string())
}

/// Fields shared by reported and manually entered breach events
#[derive(Debug, Clone, PartialEq)]
pub struct BreachDraft {
    pub user_id: PassportString,
    pub company_id: Option<String>,
    pub breach_type: BreachType,
    pub effect_score: Score,
    pub description: String,
}

/// A recorded incident of a user violating a company's policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachEvent {
    pub id: Uuid,
    /// Passport string of the offending user
    pub user_id: PassportString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    pub breach_type: BreachType,
    pub effect_score: Score,
    pub severity: Severity,
    pub status: BreachStatus,
    pub description: String,
    #[serde(default)]
    pub manual_entry: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl BreachEvent {
    /// Creates an open event whose severity is derived from the effect score.
    pub fn reported(draft: BreachDraft, severity: Severity, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            company_id: draft.company_id,
            breach_type: draft.breach_type,
            effect_score: draft.effect_score,
            severity,
            status: BreachStatus::Open,
            description: draft.description,
            manual_entry: false,
            timestamp: now,
            resolution_notes: None,
            resolved_at: None,
        }
    }

    /// Creates an admin-entered event. A manual entry may already be resolved.
    pub fn manual(
        draft: BreachDraft,
        severity: Severity,
        status: BreachStatus,
        now: DateTime<Utc>,
    ) -> Self {
        let mut event = Self::reported(draft, severity, now);
        event.manual_entry = true;
        if status == BreachStatus::Resolved {
            event.status = BreachStatus::Resolved;
            event.resolved_at = Some(now);
        }
        event
    }

    pub fn is_open(&self) -> bool {
        self.status == BreachStatus::Open
    }

    /// OPEN -> RESOLVED. There is no way back.
    ///
    /// # Errors
    /// Returns a `Conflict` if the event is already resolved; the event is
    /// left untouched in that case.
    pub fn resolve(&mut self, notes: Option<String>, now: DateTime<Utc>) -> Result<()> {
        if !self.is_open() {
            return Err(RiskError::conflict(format!(
                "breach event {} is already resolved",
                self.id
            ))
            .into());
        }
        let notes = match notes {
            Some(n) => Some(validate_text("resolution_notes", &n, false)?),
            None => None,
        };
        self.status = BreachStatus::Resolved;
        self.resolution_notes = notes.filter(|n| !n.is_empty());
        self.resolved_at = Some(now);
        Ok(())
    }
}
