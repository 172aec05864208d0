//! `bounty.yaml` loading and collaborator wiring.

use crate::errors::ConfigError;
use crate::providers::fetch::http::DEFAULT_USER_AGENT;
use crate::providers::fetch::{ContentFetcher, HttpFetcher, StaticFetcher};
use crate::providers::llm::{FakeClient, LlmClient, OpenAIClient, TracingClient};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_PATH: &str = "bounty.yaml";

const SAMPLE_CONFIG: &str = include_str!("sample.yaml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BountyConfig {
    pub version: u32,
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Default for BountyConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            database: default_database(),
            oracle: OracleConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

fn default_database() -> PathBuf {
    PathBuf::from("bounty.db")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleProvider {
    Openai,
    Fake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OracleConfig {
    #[serde(default = "default_oracle_provider")]
    pub provider: OracleProvider,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound for one oracle request, in seconds.
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Answer returned by the `fake` provider for every prompt.
    #[serde(default = "default_fake_response")]
    pub fake_response: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: default_oracle_provider(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_secs: default_oracle_timeout_secs(),
            base_url: None,
            fake_response: default_fake_response(),
        }
    }
}

fn default_oracle_provider() -> OracleProvider {
    OracleProvider::Openai
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    256
}

fn default_oracle_timeout_secs() -> u64 {
    60
}

fn default_fake_response() -> String {
    "YES".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchProvider {
    Http,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_provider")]
    pub provider: FetchProvider,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            provider: default_fetch_provider(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_fetch_provider() -> FetchProvider {
    FetchProvider::Http
}

fn default_timeout_secs() -> u64 {
    15
}

pub fn load_config(path: &Path) -> Result<BountyConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<BountyConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(BountyConfig::default());
    }
    load_config(path)
}

pub fn parse_config(raw: &str) -> Result<BountyConfig, ConfigError> {
    let cfg: BountyConfig = serde_yaml::from_str(raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    if cfg.fetch.timeout_secs == 0 {
        return Err(ConfigError("fetch.timeout_secs must be > 0".into()));
    }
    if cfg.oracle.timeout_secs == 0 {
        return Err(ConfigError("oracle.timeout_secs must be > 0".into()));
    }
    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, SAMPLE_CONFIG)
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

impl OracleConfig {
    /// Build the judgment oracle, wrapped in request tracing.
    pub fn build(&self) -> Result<Arc<dyn LlmClient>, ConfigError> {
        let inner: Arc<dyn LlmClient> = match self.provider {
            OracleProvider::Fake => {
                let client = FakeClient::new(self.model.clone());
                Arc::new(client.with_response(self.fake_response.clone()))
            }
            OracleProvider::Openai => {
                let client = self.openai().map_err(|e| ConfigError(e.to_string()))?;
                Arc::new(client)
            }
        };
        Ok(Arc::new(TracingClient::new(inner)))
    }

    fn openai(&self) -> anyhow::Result<OpenAIClient> {
        let client = OpenAIClient::from_env(self.model.clone(), self.temperature, self.max_tokens)?;
        let timeout = Duration::from_secs(self.timeout_secs);
        let client = client.with_timeout(timeout)?;
        Ok(match &self.base_url {
            Some(url) => client.with_base_url(url.clone()),
            None => client,
        })
    }
}

impl FetchConfig {
    pub fn build(&self) -> Result<Arc<dyn ContentFetcher>, ConfigError> {
        match self.provider {
            FetchProvider::Offline => Ok(Arc::new(StaticFetcher::offline())),
            FetchProvider::Http => {
                let agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
                let fetcher = HttpFetcher::new(Duration::from_secs(self.timeout_secs), agent)
                    .map_err(|e| ConfigError(format!("failed to build http fetcher: {}", e)))?;
                Ok(Arc::new(fetcher))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn sample_config_parses() {
        let cfg = parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(cfg.oracle.provider, OracleProvider::Openai);
        assert_eq!(cfg.fetch.provider, FetchProvider::Http);
        assert_eq!(cfg.database, PathBuf::from("bounty.db"));
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config("version: 1\n").unwrap();
        assert_eq!(cfg, BountyConfig::default());
    }

    #[test]
    fn wrong_version_is_refused() {
        let err = parse_config("version: 2\n").unwrap_err();
        assert!(err.to_string().contains("unsupported config version 2"));
    }

    #[test]
    fn zero_oracle_timeout_is_refused() {
        let err = parse_config("version: 1\noracle:\n  timeout_secs: 0\n").unwrap_err();
        assert!(err.to_string().contains("oracle.timeout_secs"));
        let cfg = parse_config("version: 1\noracle:\n  timeout_secs: 5\n").unwrap();
        assert_eq!(cfg.oracle.timeout_secs, 5);
    }

    #[test]
    fn unknown_keys_are_refused() {
        let raw = "version: 1\noracle:\n  provder: fake\n";
        assert!(parse_config(raw).is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg = load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(cfg, BountyConfig::default());
    }

    #[test]
    fn written_sample_round_trips_through_loader() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        write_sample_config(&path).unwrap();
        assert!(load_config(&path).is_ok());
    }

    #[tokio::test]
    async fn fake_oracle_answers_configured_response() {
        let cfg = parse_config(concat!(
            "version: 1\n",
            "oracle:\n  provider: fake\n  fake_response: \"NO\"\n",
            "fetch:\n  provider: offline\n",
        ))
        .unwrap();
        let oracle = cfg.oracle.build().unwrap();
        assert_eq!(oracle.complete("anything").await.unwrap().text, "NO");
        assert!(cfg.fetch.build().is_ok());
    }

    #[test]
    #[serial(openai_env)]
    fn openai_without_key_is_a_config_error() {
        let saved = std::env::var("OPENAI_API_KEY").ok();
        std::env::remove_var("OPENAI_API_KEY");

        let result = OracleConfig::default().build();

        if let Some(key) = saved {
            std::env::set_var("OPENAI_API_KEY", key);
        }
        let err = result.err().expect("missing key must fail");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
