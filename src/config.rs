//! Configuration file support for riskwatch.
//!
//! Provides YAML-based configuration through `riskwatch.config.yml` files,
//! environment overrides, and the resolved [`Settings`] the server runs with.
//! Precedence, highest first: command-line flags, environment, config file,
//! built-in defaults.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::risk_assessment::domain::Score;
use crate::risk_assessment::policies::UserRiskWeights;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "riskwatch.config.yml";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BASE_PATH: &str = "/api/v1";
pub const DEFAULT_LOG_FILTER: &str = "riskwatch=info,tower_http=info";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_SUSPICIOUS_THRESHOLD: i64 = 75;

pub const ENV_HOST: &str = "RISKWATCH_HOST";
pub const ENV_PORT: &str = "RISKWATCH_PORT";
pub const ENV_SNAPSHOT: &str = "RISKWATCH_SNAPSHOT";
pub const ENV_IPQS_API_KEY: &str = "IPQUALITYSCORE_API_KEY";

type UnknownFields = HashMap<String, serde_yaml_ng::Value>;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub server: Option<ServerSection>,
    pub storage: Option<StorageSection>,
    pub ip_reputation: Option<IpReputationSection>,
    pub scoring: Option<ScoringSection>,
    pub logging: Option<LoggingSection>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_path: Option<String>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct StorageSection {
    /// JSON snapshot loaded at startup and written on shutdown
    pub snapshot_path: Option<PathBuf>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct IpReputationSection {
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct ScoringSection {
    pub weights: Option<UserRiskWeights>,
    pub suspicious_threshold: Option<i64>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingSection {
    /// `EnvFilter` directive, e.g. `riskwatch=debug,tower_http=info`
    pub filter: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: Option<bool>,
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(server) = &config.server {
        if let Some(host) = &server.host {
            if host.trim().is_empty() {
                bail!("Invalid config: server.host must not be empty.");
            }
        }
        if let Some(base_path) = &server.base_path {
            validate_base_path(base_path)?;
        }
    }

    if let Some(ip_reputation) = &config.ip_reputation {
        if let Some(timeout) = ip_reputation.timeout_secs {
            if !(1..=120).contains(&timeout) {
                bail!(
                    "Invalid config: ip_reputation.timeout_secs must be between 1 and 120, got {}.",
                    timeout
                );
            }
        }
        if let Some(retries) = ip_reputation.max_retries {
            if !(1..=10).contains(&retries) {
                bail!(
                    "Invalid config: ip_reputation.max_retries must be between 1 and 10, got {}.",
                    retries
                );
            }
        }
    }

    if let Some(scoring) = &config.scoring {
        if let Some(weights) = &scoring.weights {
            weights.validate().context("Invalid config")?;
        }
        if let Some(threshold) = scoring.suspicious_threshold {
            Score::parse("scoring.suspicious_threshold", threshold).context("Invalid config")?;
        }
    }

    if let Some(filter) = config.logging.as_ref().and_then(|l| l.filter.as_deref()) {
        tracing_subscriber::EnvFilter::try_new(filter).with_context(|| {
            format!("Invalid config: logging.filter '{}' is not a valid filter directive", filter)
        })?;
    }

    Ok(())
}

/// Base paths are mounted as a router prefix: empty, or `/segment[/segment...]`.
fn validate_base_path(base_path: &str) -> Result<()> {
    if base_path.is_empty() {
        return Ok(());
    }
    if !base_path.starts_with('/') || base_path.ends_with('/') {
        bail!(
            "Invalid config: server.base_path '{}' must start with '/' and must not end with '/'.\n\n\
             💡 Hint: Use e.g. \"/api/v1\", or \"\" to serve at the root.",
            base_path
        );
    }
    if base_path.contains([':', '*', '?', '#']) || base_path.contains("//") {
        bail!(
            "Invalid config: server.base_path '{}' contains characters that are not allowed.",
            base_path
        );
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut unknown: Vec<String> = config.unknown_fields.keys().cloned().collect();

    let mut section = |name: &str, fields: Option<&UnknownFields>| {
        if let Some(fields) = fields {
            unknown.extend(fields.keys().map(|k| format!("{}.{}", name, k)));
        }
    };
    section("server", config.server.as_ref().map(|s| &s.unknown_fields));
    section("storage", config.storage.as_ref().map(|s| &s.unknown_fields));
    section(
        "ip_reputation",
        config.ip_reputation.as_ref().map(|s| &s.unknown_fields),
    );
    section("scoring", config.scoring.as_ref().map(|s| &s.unknown_fields));
    section("logging", config.logging.as_ref().map(|s| &s.unknown_fields));

    unknown.sort();
    for key in unknown {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub snapshot: Option<PathBuf>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub base_path: String,
    pub snapshot_path: Option<PathBuf>,
    pub ipqs_api_key: Option<String>,
    pub ipqs_timeout: Duration,
    pub ipqs_max_retries: u32,
    pub weights: UserRiskWeights,
    pub suspicious_threshold: Score,
    pub log_filter: String,
    pub log_json: bool,
}

impl Settings {
    /// Resolves settings from the process environment.
    pub fn resolve(config: ConfigFile, overrides: Overrides) -> Result<Self> {
        Self::resolve_with_env(config, overrides, |key| std::env::var(key).ok())
    }

    /// Resolves settings with an explicit environment lookup.
    pub fn resolve_with_env(
        config: ConfigFile,
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let server = config.server.unwrap_or_default();
        let storage = config.storage.unwrap_or_default();
        let ip_reputation = config.ip_reputation.unwrap_or_default();
        let scoring = config.scoring.unwrap_or_default();
        let logging = config.logging.unwrap_or_default();

        let env_port = match env(ENV_PORT) {
            Some(value) => Some(value.trim().parse::<u16>().with_context(|| {
                format!("Invalid {}: '{}' is not a valid port number", ENV_PORT, value)
            })?),
            None => None,
        };

        let suspicious_threshold = Score::parse(
            "scoring.suspicious_threshold",
            scoring
                .suspicious_threshold
                .unwrap_or(DEFAULT_SUSPICIOUS_THRESHOLD),
        )?;

        Ok(Self {
            host: overrides
                .host
                .or_else(|| env(ENV_HOST))
                .or(server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides
                .port
                .or(env_port)
                .or(server.port)
                .unwrap_or(DEFAULT_PORT),
            base_path: server
                .base_path
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            snapshot_path: overrides
                .snapshot
                .or_else(|| env(ENV_SNAPSHOT).map(PathBuf::from))
                .or(storage.snapshot_path),
            ipqs_api_key: env(ENV_IPQS_API_KEY)
                .or(ip_reputation.api_key)
                .filter(|k| !k.trim().is_empty()),
            ipqs_timeout: Duration::from_secs(
                ip_reputation.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            ipqs_max_retries: ip_reputation.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            weights: scoring.weights.unwrap_or_default(),
            suspicious_threshold,
            log_filter: logging
                .filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_json: logging.json.unwrap_or(false),
        })
    }

    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
server:
  host: 127.0.0.1
  port: 9090
  base_path: /api/v2
storage:
  snapshot_path: /var/lib/riskwatch/snapshot.json
ip_reputation:
  api_key: secret
  timeout_secs: 5
  max_retries: 2
scoring:
  suspicious_threshold: 60
  weights:
    critical: 2.0
logging:
  filter: riskwatch=debug
  json: true
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(9090));

        let settings = Settings::resolve_with_env(config, Overrides::default(), no_env).unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:9090");
        assert_eq!(settings.base_path, "/api/v2");
        assert_eq!(
            settings.snapshot_path,
            Some(PathBuf::from("/var/lib/riskwatch/snapshot.json"))
        );
        assert_eq!(settings.ipqs_api_key.as_deref(), Some("secret"));
        assert_eq!(settings.ipqs_timeout, Duration::from_secs(5));
        assert_eq!(settings.ipqs_max_retries, 2);
        assert_eq!(settings.suspicious_threshold.value(), 60);
        assert_eq!(settings.weights.critical, 2.0);
        assert_eq!(settings.weights.high, 0.6);
        assert_eq!(settings.log_filter, "riskwatch=debug");
        assert!(settings.log_json);
    }

    #[test]
    fn test_defaults() {
        let settings =
            Settings::resolve_with_env(ConfigFile::default(), Overrides::default(), no_env)
                .unwrap();
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
        assert_eq!(settings.base_path, "/api/v1");
        assert!(settings.snapshot_path.is_none());
        assert!(settings.ipqs_api_key.is_none());
        assert_eq!(settings.ipqs_timeout, Duration::from_secs(10));
        assert_eq!(settings.ipqs_max_retries, 3);
        assert_eq!(settings.suspicious_threshold.value(), 75);
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
        assert!(!settings.log_json);
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let config: ConfigFile = serde_yaml_ng::from_str("server:\n  port: 7000\n").unwrap();
        let env = |key: &str| match key {
            ENV_PORT => Some("7100".to_string()),
            ENV_HOST => Some("10.1.1.1".to_string()),
            ENV_IPQS_API_KEY => Some("from-env".to_string()),
            _ => None,
        };

        let settings = Settings::resolve_with_env(
            config,
            Overrides {
                port: Some(7200),
                ..Overrides::default()
            },
            env,
        )
        .unwrap();
        assert_eq!(settings.port, 7200);
        assert_eq!(settings.host, "10.1.1.1");
        assert_eq!(settings.ipqs_api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_env_port_must_be_numeric() {
        let env = |key: &str| (key == ENV_PORT).then(|| "eighty".to_string());
        let err =
            Settings::resolve_with_env(ConfigFile::default(), Overrides::default(), env)
                .unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }

    #[test]
    fn test_ipv6_bind_address() {
        let settings = Settings::resolve_with_env(
            ConfigFile::default(),
            Overrides {
                host: Some("::1".to_string()),
                port: Some(8081),
                ..Overrides::default()
            },
            no_env,
        )
        .unwrap();
        assert_eq!(settings.bind_address(), "[::1]:8081");
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "server:\n  port: 8181\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.server.unwrap().port, Some(8181));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_invalid_base_path() {
        for bad in ["api/v1", "/api/v1/", "/api/:version"] {
            let dir = TempDir::new().unwrap();
            let config_path = dir.path().join("config.yml");
            fs::write(&config_path, format!("server:\n  base_path: \"{}\"\n", bad)).unwrap();
            let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
            assert!(err.contains("server.base_path"), "{} accepted", bad);
        }
    }

    #[test]
    fn test_invalid_threshold_and_weights() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");

        fs::write(&config_path, "scoring:\n  suspicious_threshold: 150\n").unwrap();
        let err = format!("{:#}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("scoring.suspicious_threshold"));

        fs::write(&config_path, "scoring:\n  weights:\n    low: -1.0\n").unwrap();
        let err = format!("{:#}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("scoring.weights.low"));
    }

    #[test]
    fn test_invalid_retry_bounds() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "ip_reputation:\n  max_retries: 0\n").unwrap();
        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("max_retries"));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
server:
  port: 8080
  workers: 4
unknown_field: true
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 1);
        assert!(config.unknown_fields.contains_key("unknown_field"));
        assert!(config
            .server
            .unwrap()
            .unknown_fields
            .contains_key("workers"));
    }
}
