use super::{PassportString, Score};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// Reputation of an IP address as reported by a lookup service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpReputation {
    #[serde(default)]
    pub is_vpn: bool,
    #[serde(default)]
    pub is_proxy: bool,
    #[serde(default)]
    pub is_datacenter: bool,
    #[serde(default)]
    pub is_tor: bool,
    #[serde(default)]
    pub risk_score: Score,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl IpReputation {
    /// Reputation for private, loopback and link-local addresses.
    pub fn local() -> Self {
        Self::placeholder("LOCAL", Some("LOCAL".to_string()))
    }

    /// Reputation recorded when the lookup failed or is not configured.
    pub fn unknown() -> Self {
        Self::placeholder("UNKNOWN", None)
    }

    fn placeholder(country_code: &str, city: Option<String>) -> Self {
        Self {
            is_vpn: false,
            is_proxy: false,
            is_datacenter: false,
            is_tor: false,
            risk_score: Score::MIN,
            country_code: country_code.to_string(),
            city,
        }
    }

    /// True if the address hides the user behind an anonymising service.
    pub fn is_anonymised(&self) -> bool {
        self.is_vpn || self.is_proxy || self.is_tor || self.is_datacenter
    }
}

/// True for addresses that never leave the local network.
pub fn is_local_address(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local
                || (first & 0xfe00) == 0xfc00
                // fe80::/10 link local
                || (first & 0xffc0) == 0xfe80
        }
    }
}

/// An IP address a user has been seen on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub user_id: PassportString,
    pub ip_address: IpAddr,
    #[serde(flatten)]
    pub reputation: IpReputation,
    pub last_seen: DateTime<Utc>,
}

impl Device {
    pub fn new(
        user_id: PassportString,
        ip_address: IpAddr,
        reputation: IpReputation,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            ip_address,
            reputation,
            last_seen: now,
        }
    }

    /// Refreshes reputation and `last_seen`, keeping the device id stable.
    pub fn touch(&mut self, reputation: IpReputation, now: DateTime<Utc>) {
        self.reputation = reputation;
        self.last_seen = now;
    }
}
