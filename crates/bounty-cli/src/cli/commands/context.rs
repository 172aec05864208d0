//! Per-invocation wiring: config, store and service.

use crate::cli::args::{CallerArgs, Cli};
use async_trait::async_trait;
use bounty_core::config::{load_or_default, BountyConfig};
use bounty_core::consensus::{ConsensusError, ContentValidator, ValidationConsensus};
use bounty_core::errors::ConfigError;
use bounty_core::storage::{ContestStore, SqliteStore};
use bounty_core::{CallContext, ContentRewards, ContestError};
use std::path::PathBuf;
use std::sync::Arc;

pub struct Context {
    pub config: BountyConfig,
    pub database: PathBuf,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config = load_or_default(&cli.config)?;
        let database = cli
            .database
            .clone()
            .unwrap_or_else(|| config.database.clone());
        Ok(Self { config, database })
    }

    fn store(&self) -> anyhow::Result<Arc<dyn ContestStore>> {
        let store = SqliteStore::open(&self.database).map_err(|e| {
            tracing::error!(path = %self.database.display(), error = %e, "cannot open database");
            ContestError::Storage(e)
        })?;
        Ok(Arc::new(store))
    }

    /// Service able to judge submissions; builds the configured oracle and
    /// fetcher.
    pub fn judging_service(&self) -> anyhow::Result<ContentRewards> {
        let oracle = self.config.oracle.build()?;
        let fetcher = self.config.fetch.build()?;
        let validator = Arc::new(ValidationConsensus::new(fetcher, oracle));
        Ok(ContentRewards::new(self.store()?, validator))
    }

    /// Service for commands that never judge content; no oracle credentials
    /// are needed.
    pub fn service(&self) -> anyhow::Result<ContentRewards> {
        Ok(ContentRewards::new(self.store()?, Arc::new(NoOracle)))
    }
}

pub fn call_context(caller: &CallerArgs) -> CallContext {
    match caller.at {
        Some(ts) => CallContext::new(caller.account.as_str(), ts),
        None => CallContext::now(caller.account.as_str()),
    }
}

struct NoOracle;

#[async_trait]
impl ContentValidator for NoOracle {
    async fn is_content_valid(
        &self,
        _content_url: &str,
        _platform_pattern: &str,
        _required_topic: &str,
    ) -> Result<bool, ConsensusError> {
        Err(ConsensusError::OracleUnavailable {
            stage: "principal".into(),
            detail: "no oracle wired for this command".into(),
        })
    }
}
