//! Configuration system (layered: defaults < TOML file < env).

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AnswerError, Result};

const DEFAULT_FETCH_CONCURRENCY: usize = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Runtime configuration for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerConfig {
    pub agent_id: String,
    pub agent_alias_id: String,
    pub region: String,
    /// Base URL of the agent runtime service.
    ///
    /// Defaults to the regional agent-runtime host. Requests are not signed,
    /// so that host rejects them with 403; point `AGENT_RUNTIME_ENDPOINT` at a
    /// signing gateway or a compatible service.
    pub runtime_endpoint: String,
    /// Base URL of the object store (path-style addressing).
    ///
    /// Defaults to the regional S3 host, which also needs signed requests.
    /// Set `STORAGE_ENDPOINT` alongside the runtime endpoint.
    pub storage_endpoint: String,
    /// Maximum number of citation objects fetched at once.
    pub fetch_concurrency: usize,
    pub request_timeout: Duration,
}

/// Partially specified configuration, as read from a file or the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub agent_id: Option<String>,
    pub agent_alias_id: Option<String>,
    pub region_name: Option<String>,
    pub agent_runtime_endpoint: Option<String>,
    pub storage_endpoint: Option<String>,
    pub citation_fetch_concurrency: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| AnswerError::Configuration(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Read from a variable lookup (normally `std::env::var`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            agent_id: lookup("AGENT_ID"),
            agent_alias_id: lookup("AGENT_ALIAS_ID"),
            region_name: lookup("REGION_NAME"),
            agent_runtime_endpoint: lookup("AGENT_RUNTIME_ENDPOINT"),
            storage_endpoint: lookup("STORAGE_ENDPOINT"),
            citation_fetch_concurrency: parse_var(&lookup, "CITATION_FETCH_CONCURRENCY")?,
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS")?,
        })
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: ConfigLayer) -> Self {
        Self {
            agent_id: other.agent_id.or(self.agent_id),
            agent_alias_id: other.agent_alias_id.or(self.agent_alias_id),
            region_name: other.region_name.or(self.region_name),
            agent_runtime_endpoint: other.agent_runtime_endpoint.or(self.agent_runtime_endpoint),
            storage_endpoint: other.storage_endpoint.or(self.storage_endpoint),
            citation_fetch_concurrency: other
                .citation_fetch_concurrency
                .or(self.citation_fetch_concurrency),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AnswerError::Configuration(format!("{name} is not a valid number: {raw}"))),
        None => Ok(None),
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AnswerError::Configuration(format!("Missing {name}")))
}

impl AnswerConfig {
    /// Resolve a merged layer into a complete configuration.
    pub fn from_layer(layer: ConfigLayer) -> Result<Self> {
        let agent_id = required(layer.agent_id, "AGENT_ID")?;
        let agent_alias_id = required(layer.agent_alias_id, "AGENT_ALIAS_ID")?;
        let region = required(layer.region_name, "REGION_NAME")?;

        let runtime_endpoint = layer.agent_runtime_endpoint.unwrap_or_else(|| {
            let endpoint = format!("https://bedrock-agent-runtime.{region}.amazonaws.com");
            warn!(%endpoint, "AGENT_RUNTIME_ENDPOINT not set; unsigned requests to the default host are rejected");
            endpoint
        });
        let storage_endpoint = layer.storage_endpoint.unwrap_or_else(|| {
            let endpoint = format!("https://s3.{region}.amazonaws.com");
            warn!(%endpoint, "STORAGE_ENDPOINT not set; unsigned requests to the default host are rejected");
            endpoint
        });

        Ok(Self {
            agent_id,
            agent_alias_id,
            region,
            runtime_endpoint: runtime_endpoint.trim_end_matches('/').to_string(),
            storage_endpoint: storage_endpoint.trim_end_matches('/').to_string(),
            fetch_concurrency: layer
                .citation_fetch_concurrency
                .unwrap_or(DEFAULT_FETCH_CONCURRENCY)
                .max(1),
            request_timeout: Duration::from_secs(
                layer.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }

    /// Load from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        Self::load(None::<&Path>)
    }

    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let file_layer = match path {
            Some(p) => ConfigLayer::from_file(p)?,
            None => ConfigLayer::default(),
        };
        let env_layer = ConfigLayer::from_lookup(|name| std::env::var(name).ok())?;
        let config = Self::from_layer(file_layer.merge(env_layer))?;

        info!(agent_id = %config.agent_id, "Agent id");
        info!(agent_alias_id = %config.agent_alias_id, "Agent alias id");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn required_values_and_defaults() {
        let layer = ConfigLayer::from_lookup(lookup_from(&[
            ("AGENT_ID", "AGENT123"),
            ("AGENT_ALIAS_ID", "ALIAS1"),
            ("REGION_NAME", "us-east-1"),
        ]))
        .unwrap();
        let config = AnswerConfig::from_layer(layer).unwrap();

        assert_eq!(config.agent_id, "AGENT123");
        assert_eq!(
            config.runtime_endpoint,
            "https://bedrock-agent-runtime.us-east-1.amazonaws.com"
        );
        assert_eq!(config.storage_endpoint, "https://s3.us-east-1.amazonaws.com");
        assert_eq!(config.fetch_concurrency, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn missing_agent_id_is_a_configuration_error() {
        let layer = ConfigLayer::from_lookup(lookup_from(&[
            ("AGENT_ALIAS_ID", "ALIAS1"),
            ("REGION_NAME", "us-east-1"),
        ]))
        .unwrap();
        let err = AnswerConfig::from_layer(layer).unwrap_err();
        assert!(matches!(err, AnswerError::Configuration(msg) if msg.contains("AGENT_ID")));
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = ConfigLayer::from_lookup(lookup_from(&[("CITATION_FETCH_CONCURRENCY", "many")]))
            .unwrap_err();
        assert!(matches!(err, AnswerError::Configuration(_)));
    }

    #[test]
    fn env_layer_overrides_file_layer() {
        let file = ConfigLayer::from_toml_str(
            r#"
            agent_id = "FROM_FILE"
            agent_alias_id = "ALIAS_FILE"
            region_name = "eu-west-1"
            citation_fetch_concurrency = 8
            "#,
        )
        .unwrap();
        let env = ConfigLayer::from_lookup(lookup_from(&[("AGENT_ID", "FROM_ENV")])).unwrap();
        let config = AnswerConfig::from_layer(file.merge(env)).unwrap();

        assert_eq!(config.agent_id, "FROM_ENV");
        assert_eq!(config.agent_alias_id, "ALIAS_FILE");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.fetch_concurrency, 8);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let layer = ConfigLayer {
            agent_id: Some("a".into()),
            agent_alias_id: Some("b".into()),
            region_name: Some("r".into()),
            citation_fetch_concurrency: Some(0),
            storage_endpoint: Some("http://localhost:9000/".into()),
            ..Default::default()
        };
        let config = AnswerConfig::from_layer(layer).unwrap();
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.storage_endpoint, "http://localhost:9000");
    }

    #[test]
    fn explicit_endpoints_replace_regional_defaults() {
        let layer = ConfigLayer::from_lookup(lookup_from(&[
            ("AGENT_ID", "AGENT123"),
            ("AGENT_ALIAS_ID", "ALIAS1"),
            ("REGION_NAME", "us-east-1"),
            ("AGENT_RUNTIME_ENDPOINT", "http://gateway.local:8080/agent/"),
            ("STORAGE_ENDPOINT", "http://gateway.local:8080/objects"),
        ]))
        .unwrap();
        let config = AnswerConfig::from_layer(layer).unwrap();

        assert_eq!(config.runtime_endpoint, "http://gateway.local:8080/agent");
        assert_eq!(config.storage_endpoint, "http://gateway.local:8080/objects");
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        let err = ConfigLayer::from_toml_str("agnet_id = \"typo\"").unwrap_err();
        assert!(matches!(err, AnswerError::Configuration(_)));
    }
}
