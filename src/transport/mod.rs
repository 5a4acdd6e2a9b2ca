//! Ledger node access
//!
//! The adapter needs four things from a node: account bytes, a recent
//! blockhash, submission and simulation. [`Transport`] is the seam; the
//! production implementation is [`RpcTransport`]. Implementations perform
//! no retries of their own.

pub mod errors;
pub mod rpc;

pub use errors::TransportError;
pub use rpc::RpcTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::{hash::Hash, pubkey::Pubkey};

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Byte comparison applied server-side when listing program accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl AccountFilter {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Match accounts whose kind tag equals `tag`
    pub fn kind_tag(tag: [u8; 8]) -> Self {
        Self::new(0, tag.to_vec())
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        data.get(self.offset..self.offset + self.bytes.len()) == Some(self.bytes.as_slice())
    }
}

/// Short-lived token that stamps an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessToken {
    pub blockhash: Hash,
    /// Last block height at which the envelope is still accepted
    pub last_valid_block_height: u64,
}

/// Result of a dry run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub success: bool,
    pub logs: Vec<String>,
    pub compute_units: Option<u64>,
    pub error: Option<String>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Raw account data, `None` when the account does not exist
    async fn fetch_account(&self, address: &Pubkey) -> TransportResult<Option<Vec<u8>>>;

    /// Program-owned accounts passing every filter
    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> TransportResult<Vec<(Pubkey, Vec<u8>)>>;

    async fn fetch_liveness_token(&self) -> TransportResult<LivenessToken>;

    /// Submit a signed, base64-encoded envelope; returns the signature
    async fn submit(&self, envelope: &str) -> TransportResult<String>;

    /// Dry-run a base64-encoded envelope without requiring signatures
    async fn simulate(&self, envelope: &str) -> TransportResult<SimulationOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matching() {
        let filter = AccountFilter::new(2, vec![7, 8]);
        assert!(filter.matches(&[0, 0, 7, 8, 9]));
        assert!(!filter.matches(&[0, 0, 7, 9]));
        assert!(!filter.matches(&[0, 0, 7]));

        let tag = AccountFilter::kind_tag([1; 8]);
        assert!(tag.matches(&[1; 12]));
        assert!(!tag.matches(&[1; 7]));
    }
}
