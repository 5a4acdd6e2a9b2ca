//! Common types used throughout the adapter

use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey, pubkey::Pubkey};
use std::fmt;
use std::str::FromStr;

/// Program deployed on mainnet-beta
pub const MAINNET_PROGRAM_ID: Pubkey = pubkey!("BWxe2XdnRPLMiirdcZGUffEkg9jP4pZZAMwXojKQ6zCW");

/// Program deployed on devnet
pub const DEVNET_PROGRAM_ID: Pubkey = pubkey!("CjmHaEKF29YsWgqrCYJEix6dydDmrkMCPR9TdKZQowNS");

/// Target cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Mainnet,
    Devnet,
}

impl Cluster {
    pub fn default_program_id(&self) -> Pubkey {
        match self {
            Cluster::Mainnet => MAINNET_PROGRAM_ID,
            Cluster::Devnet => DEVNET_PROGRAM_ID,
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Mainnet => write!(f, "mainnet"),
            Cluster::Devnet => write!(f, "devnet"),
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "devnet" => Ok(Cluster::Devnet),
            other => Err(format!("unknown cluster '{}'", other)),
        }
    }
}

/// Explicit network selection threaded into every component at construction.
///
/// There is no process-wide "current network": the deriver, encoder, reader
/// and assembler each hold their own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramContext {
    pub cluster: Cluster,
    pub program_id: Pubkey,
}

impl ProgramContext {
    pub fn new(cluster: Cluster, program_id: Pubkey) -> Self {
        Self {
            cluster,
            program_id,
        }
    }

    /// Context using the cluster's canonical deployment
    pub fn for_cluster(cluster: Cluster) -> Self {
        Self::new(cluster, cluster.default_program_id())
    }
}

impl Default for ProgramContext {
    fn default() -> Self {
        Self::for_cluster(Cluster::Mainnet)
    }
}

/// Lamports per SOL, the base unit of every monetary field
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert base units to SOL for display
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Convert a SOL amount to base units, rejecting negatives and non-finite input
pub fn sol_to_lamports(sol: f64) -> Option<u64> {
    if !sol.is_finite() || sol < 0.0 {
        return None;
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if lamports > u64::MAX as f64 {
        return None;
    }
    Some(lamports as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("mainnet-beta".parse::<Cluster>().unwrap(), Cluster::Mainnet);
        assert_eq!("DEVNET".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert!("testnet".parse::<Cluster>().is_err());
    }

    #[test]
    fn test_contexts_differ_per_cluster() {
        let main = ProgramContext::for_cluster(Cluster::Mainnet);
        let dev = ProgramContext::for_cluster(Cluster::Devnet);
        assert_ne!(main.program_id, dev.program_id);
        assert_eq!(ProgramContext::default(), main);
    }

    #[test]
    fn test_sol_conversions() {
        assert_eq!(sol_to_lamports(1.5), Some(1_500_000_000));
        assert_eq!(sol_to_lamports(-1.0), None);
        assert_eq!(sol_to_lamports(f64::NAN), None);
        assert_eq!(lamports_to_sol(250_000_000), 0.25);
    }
}
