//! Parsing of path parameters and loosely typed body fields

use crate::risk_assessment::domain::{PassportString, Score};
use crate::shared::{Result, RiskError};
use std::net::IpAddr;
use uuid::Uuid;

pub(crate) fn passport(field: &str, value: &str) -> Result<PassportString> {
    PassportString::new(value.to_string()).map_err(|e| {
        match e.downcast_ref::<RiskError>() {
            Some(RiskError::Validation { message, .. }) => {
                RiskError::validation(field, message.clone()).into()
            }
            _ => e,
        }
    })
}

pub(crate) fn ip_address(value: &str) -> Result<IpAddr> {
    value.trim().parse().map_err(|_| {
        RiskError::validation("ip_address", format!("'{}' is not a valid IP address", value))
            .into()
    })
}

pub(crate) fn uuid(field: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        RiskError::validation(field, format!("'{}' is not a valid id", value)).into()
    })
}

/// Parses a score that arrived as a path segment.
pub(crate) fn score_text(field: &str, value: &str) -> Result<Score> {
    let number: i64 = value.trim().parse().map_err(|_| {
        RiskError::validation(field, format!("'{}' is not an integer", value))
    })?;
    Score::parse(field, number)
}
