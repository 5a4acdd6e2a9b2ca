//! Configuration module for the market adapter
//!
//! Configuration is loaded from a TOML file, optionally overridden by
//! environment variables (a `.env` file is honoured). The resulting
//! [`ProgramContext`] is passed explicitly into every component.

use crate::tx_builder::{ComputeBudget, MessageVersion};
use crate::types::{Cluster, ProgramContext};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_RPC_URL: &str = "MARKET_ADAPTER_RPC_URL";
pub const ENV_PROGRAM_ID: &str = "MARKET_ADAPTER_PROGRAM_ID";
pub const ENV_CLUSTER: &str = "MARKET_ADAPTER_CLUSTER";

/// Main adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdapterConfig {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub transaction: TransactionConfig,

    #[serde(default)]
    pub quote: QuoteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub cluster: Cluster,

    /// RPC endpoint; the cluster's public endpoint when unset
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Program id override for non-canonical deployments
    #[serde(default)]
    pub program_id: Option<String>,

    /// processed, confirmed or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionConfig {
    #[serde(default)]
    pub message_version: MessageVersion,

    /// Compute unit limit; 0 leaves the runtime default
    #[serde(default)]
    pub compute_unit_limit: u32,

    /// Priority fee in micro-lamports per compute unit
    #[serde(default)]
    pub priority_fee_micro_lamports: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Decimal places kept when quotes are displayed
    #[serde(default = "default_decimals")]
    pub display_decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_commitment() -> String { "confirmed".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_decimals() -> u32 { crate::quote::DEFAULT_DECIMALS }
fn default_filter() -> String { "info".to_string() }

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            rpc_url: None,
            program_id: None,
            commitment: default_commitment(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            message_version: MessageVersion::default(),
            compute_unit_limit: 0,
            priority_fee_micro_lamports: 0,
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            display_decimals: default_decimals(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AdapterConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(cluster) = lookup(ENV_CLUSTER) {
            self.network.cluster = Cluster::from_str(&cluster).map_err(|e| anyhow!(e))?;
        }
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.network.rpc_url = Some(url);
        }
        if let Some(program_id) = lookup(ENV_PROGRAM_ID) {
            self.network.program_id = Some(program_id);
        }
        self.validate()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.commitment()?;
        self.program_id()?;
        if self.quote.display_decimals > 9 {
            return Err(anyhow!(
                "quote.display_decimals must be at most 9, got {}",
                self.quote.display_decimals
            ));
        }
        Ok(())
    }

    fn program_id(&self) -> anyhow::Result<Pubkey> {
        match &self.network.program_id {
            Some(raw) => Pubkey::from_str(raw).with_context(|| format!("invalid program id '{}'", raw)),
            None => Ok(self.network.cluster.default_program_id()),
        }
    }

    /// Explicit deployment selection for deriver, encoder, reader and
    /// assembler
    pub fn program_context(&self) -> anyhow::Result<ProgramContext> {
        Ok(ProgramContext::new(self.network.cluster, self.program_id()?))
    }

    pub fn rpc_url(&self) -> String {
        self.network
            .rpc_url
            .clone()
            .unwrap_or_else(|| self.network.cluster.default_rpc_url().to_string())
    }

    pub fn commitment(&self) -> anyhow::Result<CommitmentConfig> {
        match self.network.commitment.to_ascii_lowercase().as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(anyhow!("unknown commitment '{}'", other)),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }

    pub fn compute_budget(&self) -> ComputeBudget {
        ComputeBudget::new(
            self.transaction.compute_unit_limit,
            self.transaction.priority_fee_micro_lamports,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = AdapterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.network.cluster, Cluster::Mainnet);
        assert_eq!(config.rpc_url(), "https://api.mainnet-beta.solana.com");
        assert_eq!(config.commitment().unwrap(), CommitmentConfig::confirmed());
        assert_eq!(config.quote.display_decimals, 4);
        assert_eq!(config.transaction.message_version, MessageVersion::Legacy);
        assert!(config.compute_budget().is_empty());
        assert_eq!(config.program_context().unwrap(), ProgramContext::default());
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            r#"
            [network]
            cluster = "devnet"
            rpc_url = "http://localhost:8899"
            commitment = "finalized"
            timeout_secs = 5

            [transaction]
            message_version = "v0"
            compute_unit_limit = 200000
            priority_fee_micro_lamports = 5000

            [logging]
            filter = "market_adapter=debug"
            json = true
            "#,
        );
        let config = AdapterConfig::from_file(file.path()).unwrap();
        let ctx = config.program_context().unwrap();
        assert_eq!(ctx, ProgramContext::for_cluster(Cluster::Devnet));
        assert_eq!(config.rpc_url(), "http://localhost:8899");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.transaction.message_version, MessageVersion::V0);
        assert_eq!(config.compute_budget(), ComputeBudget::new(200_000, 5_000));
        assert!(config.logging.json);
    }

    #[test]
    fn test_env_overrides() {
        let custom = Pubkey::new_unique();
        let env: HashMap<&str, String> = HashMap::from([
            (ENV_CLUSTER, "devnet".to_string()),
            (ENV_PROGRAM_ID, custom.to_string()),
            (ENV_RPC_URL, "http://rpc.internal:8899".to_string()),
        ]);
        let mut config = AdapterConfig::default();
        config
            .apply_env_overrides(|k| env.get(k).cloned())
            .unwrap();

        let ctx = config.program_context().unwrap();
        assert_eq!(ctx.cluster, Cluster::Devnet);
        assert_eq!(ctx.program_id, custom);
        assert_eq!(config.rpc_url(), "http://rpc.internal:8899");
    }

    #[test]
    fn test_rejects_bad_values() {
        let file = write_config("[network]\ncommitment = \"eventually\"\n");
        assert!(AdapterConfig::from_file(file.path()).is_err());

        let file = write_config("[network]\nprogram_id = \"not-a-key\"\n");
        assert!(AdapterConfig::from_file(file.path()).is_err());

        let mut config = AdapterConfig::default();
        assert!(config
            .apply_env_overrides(|k| (k == ENV_CLUSTER).then(|| "testnet".to_string()))
            .is_err());
    }
}
