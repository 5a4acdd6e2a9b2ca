//! JSON-RPC transport over the nonblocking Solana client

use super::{AccountFilter, LivenessToken, SimulationOutcome, Transport, TransportError, TransportResult};
use crate::tx_builder::output::decode_wire;
use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::config::{
    RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSimulateTransactionConfig,
};
use solana_rpc_client_api::filter::{Memcmp, RpcFilterType};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Single-endpoint RPC transport. Every call is issued exactly once.
#[derive(Clone)]
pub struct RpcTransport {
    client: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl RpcTransport {
    pub fn new(url: impl Into<String>, commitment: CommitmentConfig, timeout: Duration) -> Self {
        Self {
            client: Arc::new(RpcClient::new_with_timeout_and_commitment(
                url.into(),
                timeout,
                commitment,
            )),
            commitment,
        }
    }

    pub fn from_client(client: Arc<RpcClient>) -> Self {
        let commitment = client.commitment();
        Self { client, commitment }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl Transport for RpcTransport {
    async fn fetch_account(&self, address: &Pubkey) -> TransportResult<Option<Vec<u8>>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| TransportError::from_client_error(e, "fetch_account"))?;
        debug!(address = %address, found = response.value.is_some(), "Fetched account");
        Ok(response.value.map(|account| account.data))
    }

    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> TransportResult<Vec<(Pubkey, Vec<u8>)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(
                filters
                    .iter()
                    .map(|f| RpcFilterType::Memcmp(Memcmp::new_raw_bytes(f.offset, f.bytes.clone())))
                    .collect(),
            ),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..Default::default()
            },
            ..Default::default()
        };

        let accounts = self
            .client
            .get_program_accounts_with_config(program_id, config)
            .await
            .map_err(|e| TransportError::from_client_error(e, "fetch_program_accounts"))?;
        debug!(program = %program_id, count = accounts.len(), "Listed program accounts");
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }

    async fn fetch_liveness_token(&self) -> TransportResult<LivenessToken> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await
            .map_err(|e| TransportError::from_client_error(e, "fetch_liveness_token"))?;
        Ok(LivenessToken {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn submit(&self, envelope: &str) -> TransportResult<String> {
        let tx = decode_wire(envelope).map_err(TransportError::InvalidEnvelope)?;
        let signature = self
            .client
            .send_transaction(&tx)
            .await
            .map_err(|e| TransportError::from_client_error(e, "submit"))?;
        Ok(signature.to_string())
    }

    async fn simulate(&self, envelope: &str) -> TransportResult<SimulationOutcome> {
        let tx = decode_wire(envelope).map_err(TransportError::InvalidEnvelope)?;
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            commitment: Some(self.commitment),
            ..Default::default()
        };
        let result = self
            .client
            .simulate_transaction_with_config(&tx, config)
            .await
            .map_err(|e| TransportError::from_client_error(e, "simulate"))?
            .value;

        let error = result.err.map(|e| format!("{:?}", e));
        if let Some(err) = &error {
            warn!(error = %err, "Simulation reported a program error");
        }
        Ok(SimulationOutcome {
            success: error.is_none(),
            logs: result.logs.unwrap_or_default(),
            compute_units: result.units_consumed,
            error,
        })
    }
}
