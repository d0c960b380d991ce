use crate::risk_assessment::domain::{BreachEvent, Score, Severity};
use crate::risk_assessment::policies::UserRiskWeights;
use std::collections::HashSet;

/// RiskScorer service for computing a user's reference score
///
/// Pure function of the user's breach events and device count. It has no I/O
/// dependencies and works only with domain objects.
pub struct RiskScorer;

impl RiskScorer {
    /// Computes `ref_score` from the user's events and device count
    ///
    /// Only OPEN events count. The weighted exponent
    ///
    /// `x = w_platform·ln(1+companies) + w_device·ln(1+devices) + Σ w_sev·ln(1+count_sev)`
    ///
    /// is squashed with the logistic function and rescaled so that `x = 0`
    /// maps to 0 and `x → ∞` approaches 100:
    ///
    /// `ref_score = round(100·(2·σ(x) − 1))`
    ///
    /// # Arguments
    /// * `events` - Breach events recorded against the user, any status
    /// * `device_count` - Number of devices the user was seen on
    /// * `weights` - Factor weights
    pub fn ref_score(events: &[BreachEvent], device_count: usize, weights: &UserRiskWeights) -> Score {
        let open: Vec<&BreachEvent> = events.iter().filter(|e| e.is_open()).collect();

        let companies: HashSet<&str> = open
            .iter()
            .filter_map(|e| e.company_id.as_deref())
            .collect();

        let mut x = weights.platforms * ln_1p_count(companies.len())
            + weights.devices * ln_1p_count(device_count);

        for severity in Severity::ALL {
            let count = open.iter().filter(|e| e.severity == severity).count();
            if count > 0 {
                x += weights.for_severity(severity) * ln_1p_count(count);
            }
        }

        Score::saturating_from_f64(100.0 * (2.0 * sigmoid(x) - 1.0))
    }
}

fn ln_1p_count(count: usize) -> f64 {
    (count as f64).ln_1p()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
