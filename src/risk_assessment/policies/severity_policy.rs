use crate::risk_assessment::domain::{Score, Severity};
use serde::Serialize;

/// Effect score at or above which a breach is HIGH
pub const HIGH_THRESHOLD: u8 = 70;

/// Effect score at or above which a breach is MEDIUM
pub const MEDIUM_THRESHOLD: u8 = 40;

/// SeverityPolicy maps a breach's effect score to a severity bucket
///
/// The bucketing is monotonic in the effect score:
/// - `>= 70` → HIGH
/// - `>= 40` → MEDIUM
/// - otherwise LOW
///
/// CRITICAL is never derived. Only an administrator entering a breach by hand
/// can mark it critical.
pub struct SeverityPolicy;

impl SeverityPolicy {
    pub fn from_effect_score(effect_score: Score) -> Severity {
        match effect_score.value() {
            s if s >= HIGH_THRESHOLD => Severity::High,
            s if s >= MEDIUM_THRESHOLD => Severity::Medium,
            _ => Severity::Low,
        }
    }

    /// Severity for a manual entry: the explicit value wins, otherwise the
    /// derived bucket.
    pub fn resolve_manual(explicit: Option<Severity>, effect_score: Score) -> Severity {
        explicit.unwrap_or_else(|| Self::from_effect_score(effect_score))
    }
}

/// Badge colour the admin dashboard renders next to an effect score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Orange,
    Red,
}

impl BadgeColor {
    pub fn for_effect_score(effect_score: Score) -> Self {
        match effect_score.value() {
            s if s >= 80 => BadgeColor::Red,
            s if s >= 50 => BadgeColor::Orange,
            _ => BadgeColor::Green,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: i64) -> Score {
        Score::parse("effect_score", v).unwrap()
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(SeverityPolicy::from_effect_score(score(0)), Severity::Low);
        assert_eq!(SeverityPolicy::from_effect_score(score(39)), Severity::Low);
        assert_eq!(SeverityPolicy::from_effect_score(score(40)), Severity::Medium);
        assert_eq!(SeverityPolicy::from_effect_score(score(69)), Severity::Medium);
        assert_eq!(SeverityPolicy::from_effect_score(score(70)), Severity::High);
        assert_eq!(SeverityPolicy::from_effect_score(score(100)), Severity::High);
    }

    #[test]
    fn test_bucketing_is_monotonic_over_full_range() {
        let mut previous = Severity::Low;
        for v in 0..=100 {
            let current = SeverityPolicy::from_effect_score(score(v));
            assert!(current >= previous, "severity dropped at {}", v);
            previous = current;
        }
    }

    #[test]
    fn test_badge_never_contradicts_severity() {
        // A red badge is always at least HIGH, a green one never HIGH.
        for v in 0..=100 {
            let s = score(v);
            let severity = SeverityPolicy::from_effect_score(s);
            match BadgeColor::for_effect_score(s) {
                BadgeColor::Red => assert_eq!(severity, Severity::High),
                BadgeColor::Green => assert!(severity < Severity::High),
                BadgeColor::Orange => assert!(severity >= Severity::Medium),
            }
        }
    }

    #[test]
    fn test_resolve_manual() {
        assert_eq!(
            SeverityPolicy::resolve_manual(Some(Severity::Critical), score(10)),
            Severity::Critical
        );
        assert_eq!(
            SeverityPolicy::resolve_manual(None, score(45)),
            Severity::Medium
        );
    }
}
