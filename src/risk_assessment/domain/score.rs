use crate::shared::{Result, RiskError};
use serde::{Deserialize, Serialize};

/// Bounded 0-100 risk weight.
///
/// Shared by breach `effect_score`, user `ref_score` and device `risk_score`.
/// Higher is riskier. Deserialization rejects anything outside the range, so
/// a `Score` held anywhere in the domain is always valid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(0);
    pub const MAX: Score = Score(100);

    /// Validates `value` and reports failures against `field`.
    pub fn parse(field: &str, value: i64) -> Result<Self> {
        Self::checked(field, value).map_err(Into::into)
    }

    /// Converts a fractional score, rounding to nearest and clamping into
    /// range. Non-finite input maps to zero.
    pub fn saturating_from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Score::MIN;
        }
        Score(value.round().clamp(0.0, 100.0) as u8)
    }

    /// Adds `bonus` points, saturating at [`Score::MAX`].
    pub fn saturating_add(self, bonus: u8) -> Self {
        Score(self.0.saturating_add(bonus).min(Self::MAX.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    fn checked(field: &str, value: i64) -> std::result::Result<Self, RiskError> {
        if !(0..=100).contains(&value) {
            return Err(RiskError::validation(
                field,
                format!("must be between 0 and 100, got {}", value),
            ));
        }
        Ok(Score(value as u8))
    }
}

impl TryFrom<i64> for Score {
    type Error = RiskError;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        Self::checked("score", value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
