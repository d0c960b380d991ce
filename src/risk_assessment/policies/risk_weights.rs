use crate::risk_assessment::domain::Severity;
use crate::shared::{Result, RiskError};
use serde::{Deserialize, Serialize};

/// UserRiskWeights policy for turning a user's record into a reference score
///
/// Each factor contributes `weight * ln(1 + count)` to a single exponent that
/// the risk scorer squashes into 0-100. Counting is logarithmic so that the
/// tenth breach adds less than the first.
///
/// Defaults:
/// - LOW 0.1, MEDIUM 0.3, HIGH 0.6, CRITICAL 1.2 per open breach
/// - 0.05 per distinct company that reported the user
/// - 0.02 per device the user was seen on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserRiskWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
    pub platforms: f64,
    pub devices: f64,
}

impl Default for UserRiskWeights {
    fn default() -> Self {
        Self {
            low: 0.1,
            medium: 0.3,
            high: 0.6,
            critical: 1.2,
            platforms: 0.05,
            devices: 0.02,
        }
    }
}

impl UserRiskWeights {
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    /// Rejects negative or non-finite weights.
    ///
    /// A negative weight would let a breach lower a user's score.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("low", self.low),
            ("medium", self.medium),
            ("high", self.high),
            ("critical", self.critical),
            ("platforms", self.platforms),
            ("devices", self.devices),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RiskError::validation(
                    format!("scoring.weights.{}", name),
                    format!("must be a finite, non-negative number, got {}", weight),
                )
                .into());
            }
        }
        Ok(())
    }
}
