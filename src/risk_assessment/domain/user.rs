use super::Score;
use crate::shared::{Result, RiskError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum length for passport strings
const MIN_PASSPORT_LENGTH: usize = 5;

/// Maximum length for passport strings (security limit)
const MAX_PASSPORT_LENGTH: usize = 256;

/// Minimum length for user names
const MIN_NAME_LENGTH: usize = 2;

/// Maximum length for user names (security limit)
const MAX_NAME_LENGTH: usize = 128;

/// NewType wrapper for the externally issued user identifier
///
/// The passport string is opaque: some onboarding flows send a SHA-256 hex
/// digest of an uploaded passport photo, others a document number. It is the
/// key used in URLs (`/users/score/:passport`) and as `user_id` on breach
/// events and devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassportString(String);

impl PassportString {
    pub fn new(value: String) -> Result<Self> {
        Self::checked(value).map_err(Into::into)
    }

    fn checked(value: String) -> std::result::Result<Self, RiskError> {
        let value = value.trim().to_string();

        if value.chars().count() < MIN_PASSPORT_LENGTH {
            return Err(RiskError::validation(
                "passport_string",
                format!("must be at least {} characters", MIN_PASSPORT_LENGTH),
            ));
        }

        // Security: Length limit to prevent DoS
        if value.len() > MAX_PASSPORT_LENGTH {
            return Err(RiskError::validation(
                "passport_string",
                format!(
                    "is too long ({} bytes). Maximum allowed: {} bytes",
                    value.len(),
                    MAX_PASSPORT_LENGTH
                ),
            ));
        }

        // Used as a path segment, so no separators or whitespace
        if value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#'))
        {
            return Err(RiskError::validation(
                "passport_string",
                "must not contain whitespace, path separators, '?' or '#'",
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PassportString {
    type Error = RiskError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::checked(value)
    }
}

impl From<PassportString> for String {
    fn from(passport: PassportString) -> Self {
        passport.0
    }
}

impl std::fmt::Display for PassportString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for a display name with validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(value: String) -> Result<Self> {
        Self::checked(value).map_err(Into::into)
    }

    fn checked(value: String) -> std::result::Result<Self, RiskError> {
        let value = value.trim().to_string();
        let length = value.chars().count();

        if length < MIN_NAME_LENGTH {
            return Err(RiskError::validation(
                "name",
                format!("must be at least {} characters", MIN_NAME_LENGTH),
            ));
        }
        if length > MAX_NAME_LENGTH {
            return Err(RiskError::validation(
                "name",
                format!("must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = RiskError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::checked(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

/// A person known to the service, keyed by passport string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub passport_string: PassportString,
    pub name: UserName,
    pub ref_score: Score,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A freshly registered user starts with a zero reference score.
    pub fn register(passport_string: PassportString, name: UserName, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            passport_string,
            name,
            ref_score: Score::MIN,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: UserName, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    /// Stores a recomputed score. Returns whether the value changed.
    pub fn set_ref_score(&mut self, score: Score, now: DateTime<Utc>) -> bool {
        if self.ref_score == score {
            return false;
        }
        self.ref_score = score;
        self.updated_at = now;
        true
    }
}
