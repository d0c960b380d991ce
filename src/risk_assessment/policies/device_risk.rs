use crate::risk_assessment::domain::{Device, Score};

/// Points added when any of the user's devices is on a VPN
pub const VPN_BONUS: u8 = 10;
/// Points added when any of the user's devices goes through a proxy
pub const PROXY_BONUS: u8 = 15;
/// Points added when any of the user's devices is a Tor exit
pub const TOR_BONUS: u8 = 20;

/// DeviceRiskPolicy decides how risky a user's devices are
///
/// A user's device risk starts from the riskiest device reputation and gains a
/// fixed bonus for each kind of anonymiser seen across all devices. The bonuses
/// are applied once per kind, not once per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRiskPolicy {
    suspicious_threshold: Score,
}

impl Default for DeviceRiskPolicy {
    fn default() -> Self {
        Self {
            suspicious_threshold: Score::saturating_from_f64(75.0),
        }
    }
}

impl DeviceRiskPolicy {
    pub fn new(suspicious_threshold: Score) -> Self {
        Self {
            suspicious_threshold,
        }
    }

    pub fn suspicious_threshold(&self) -> Score {
        self.suspicious_threshold
    }

    /// Aggregate device risk for one user. No devices scores zero.
    pub fn user_device_score(&self, devices: &[Device]) -> Score {
        let base = devices
            .iter()
            .map(|d| d.reputation.risk_score)
            .max()
            .unwrap_or(Score::MIN);

        let mut bonus: u8 = 0;
        if devices.iter().any(|d| d.reputation.is_vpn) {
            bonus = bonus.saturating_add(VPN_BONUS);
        }
        if devices.iter().any(|d| d.reputation.is_proxy) {
            bonus = bonus.saturating_add(PROXY_BONUS);
        }
        if devices.iter().any(|d| d.reputation.is_tor) {
            bonus = bonus.saturating_add(TOR_BONUS);
        }
        base.saturating_add(bonus)
    }

    pub fn is_suspicious(&self, device: &Device) -> bool {
        device.reputation.is_anonymised() || device.reputation.risk_score >= self.suspicious_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk_assessment::domain::{IpReputation, PassportString};
    use chrono::Utc;

    fn device(reputation: IpReputation) -> Device {
        Device::new(
            PassportString::new("abc123".to_string()).unwrap(),
            "203.0.113.7".parse().unwrap(),
            reputation,
            Utc::now(),
        )
    }

    fn scored(score: i64) -> IpReputation {
        IpReputation {
            risk_score: Score::parse("risk_score", score).unwrap(),
            ..IpReputation::unknown()
        }
    }

    #[test]
    fn test_no_devices_scores_zero() {
        assert_eq!(DeviceRiskPolicy::default().user_device_score(&[]), Score::MIN);
    }

    #[test]
    fn test_takes_max_device_score() {
        let devices = vec![device(scored(20)), device(scored(55)), device(scored(30))];
        assert_eq!(
            DeviceRiskPolicy::default().user_device_score(&devices).value(),
            55
        );
    }

    #[test]
    fn test_bonuses_apply_once_per_kind() {
        let vpn = IpReputation {
            is_vpn: true,
            ..scored(10)
        };
        let devices = vec![device(vpn.clone()), device(vpn)];
        assert_eq!(
            DeviceRiskPolicy::default().user_device_score(&devices).value(),
            20
        );

        let all = IpReputation {
            is_vpn: true,
            is_proxy: true,
            is_tor: true,
            ..scored(30)
        };
        assert_eq!(
            DeviceRiskPolicy::default()
                .user_device_score(&[device(all)])
                .value(),
            75
        );
    }

    #[test]
    fn test_capped_at_max() {
        let tor = IpReputation {
            is_tor: true,
            is_proxy: true,
            ..scored(90)
        };
        assert_eq!(
            DeviceRiskPolicy::default().user_device_score(&[device(tor)]),
            Score::MAX
        );
    }

    #[test]
    fn test_is_suspicious() {
        let policy = DeviceRiskPolicy::default();
        assert!(!policy.is_suspicious(&device(scored(74))));
        assert!(policy.is_suspicious(&device(scored(75))));
        assert!(policy.is_suspicious(&device(IpReputation {
            is_datacenter: true,
            ..scored(0)
        })));

        let strict = DeviceRiskPolicy::new(Score::parse("threshold", 50).unwrap());
        assert!(strict.is_suspicious(&device(scored(60))));
    }
}
