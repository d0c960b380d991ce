use crate::ports::outbound::IpReputationProvider;
use crate::risk_assessment::domain::{is_local_address, IpReputation, Score};
use crate::shared::error::RiskError;
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

const SERVICE_NAME: &str = "IPQualityScore";

#[derive(Debug, Deserialize)]
struct IpqsResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    vpn: bool,
    #[serde(default)]
    proxy: bool,
    #[serde(default)]
    tor: bool,
    #[serde(default)]
    datacenter: bool,
    #[serde(default)]
    fraud_score: f64,
    #[serde(default)]
    country_code: String,
    #[serde(default)]
    city: Option<String>,
}

fn default_success() -> bool {
    true
}

impl From<IpqsResponse> for IpReputation {
    fn from(response: IpqsResponse) -> Self {
        IpReputation {
            is_vpn: response.vpn,
            is_proxy: response.proxy,
            is_datacenter: response.datacenter,
            is_tor: response.tor,
            risk_score: Score::saturating_from_f64(response.fraud_score),
            country_code: response.country_code,
            city: response.city.filter(|c| !c.is_empty()),
        }
    }
}

/// IpQualityScoreClient adapter for the IPQualityScore JSON API
///
/// Implements the IpReputationProvider port. Private, loopback and link-local
/// addresses are answered locally without a request.
pub struct IpQualityScoreClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl IpQualityScoreClient {
    const API_ENDPOINT: &'static str = "https://ipqualityscore.com/api/json/ip";

    pub fn new(api_key: String, timeout: Duration, max_retries: u32) -> Result<Self> {
        Self::with_base_url(api_key, Self::API_ENDPOINT.to_string(), timeout, max_retries)
    }

    /// Points the client at another endpoint (a proxy or a local stub).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        validate_url_component(&api_key, "API key")?;

        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("riskwatch/{}", version);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: max_retries.max(1),
        })
    }

    async fn fetch_with_retry(&self, ip: IpAddr) -> Result<IpqsResponse> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.fetch(ip).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::debug!(%ip, attempt, error = %e, "IP reputation lookup failed");
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| upstream_error("no attempt was made".to_string())))
    }

    async fn fetch(&self, ip: IpAddr) -> Result<IpqsResponse> {
        let ip_text = ip.to_string();
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&ip_text)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| upstream_error(format!("request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(upstream_error(format!(
                "returned status code {}",
                response.status()
            )));
        }

        let body: IpqsResponse = response
            .json()
            .await
            .map_err(|e| upstream_error(format!("invalid response body: {}", e.without_url())))?;

        if !body.success {
            return Err(upstream_error(
                body.message
                    .unwrap_or_else(|| "lookup was not successful".to_string()),
            ));
        }

        Ok(body)
    }
}

// The API key is part of the request path, so error messages never carry
// the URL.
fn upstream_error(details: String) -> anyhow::Error {
    RiskError::Upstream {
        service: SERVICE_NAME.to_string(),
        details,
    }
    .into()
}

#[async_trait]
impl IpReputationProvider for IpQualityScoreClient {
    async fn check_ip(&self, ip: IpAddr) -> Result<IpReputation> {
        if is_local_address(&ip) {
            return Ok(IpReputation::local());
        }
        let response = self.fetch_with_retry(ip).await?;
        Ok(response.into())
    }
}
