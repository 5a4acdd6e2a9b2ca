//! Unsigned envelope handed to the signing collaborator
//!
//! The wire form is `base64(bincode(VersionedTransaction))`. Signature slots
//! are present (one per required signer) but zeroed; the signer fills them
//! in without re-encoding the message.

use crate::tx_builder::errors::TransactionBuilderError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use solana_sdk::{hash::Hash, pubkey::Pubkey, transaction::VersionedTransaction};

/// Assembled, unsigned transaction with the metadata a signer needs
#[derive(Debug, Clone, Serialize)]
pub struct UnsignedEnvelope {
    /// Portable wire string
    pub transaction: String,
    /// Blockhash the message was stamped with
    #[serde(serialize_with = "serialize_display")]
    pub blockhash: Hash,
    /// Envelope expires after this block height
    pub last_valid_block_height: u64,
    /// Keys that must sign, fee payer first
    #[serde(serialize_with = "serialize_keys")]
    pub required_signers: Vec<Pubkey>,
    pub instruction_count: usize,
    /// Correlation id shared with the assembly log events
    pub correlation_id: String,
}

impl UnsignedEnvelope {
    pub(crate) fn new(
        tx: &VersionedTransaction,
        last_valid_block_height: u64,
        correlation_id: String,
    ) -> Result<Self, TransactionBuilderError> {
        Ok(Self {
            transaction: encode_wire(tx)?,
            blockhash: *tx.message.recent_blockhash(),
            last_valid_block_height,
            required_signers: crate::compat::get_required_signers(&tx.message).to_vec(),
            instruction_count: tx.message.instructions().len(),
            correlation_id,
        })
    }

    /// Decode the wire string back into a transaction
    pub fn to_transaction(&self) -> Result<VersionedTransaction, TransactionBuilderError> {
        decode_wire(&self.transaction).map_err(TransactionBuilderError::Serialization)
    }

    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.required_signers.first()
    }
}

pub fn encode_wire(tx: &VersionedTransaction) -> Result<String, TransactionBuilderError> {
    let bytes = bincode::serialize(tx)
        .map_err(|e| TransactionBuilderError::serialization(format!("bincode: {}", e)))?;
    Ok(STANDARD.encode(bytes))
}

pub fn decode_wire(envelope: &str) -> Result<VersionedTransaction, String> {
    let bytes = STANDARD
        .decode(envelope.trim())
        .map_err(|e| format!("base64: {}", e))?;
    bincode::deserialize(&bytes).map_err(|e| format!("bincode: {}", e))
}

fn serialize_display<S: serde::Serializer>(v: &Hash, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

fn serialize_keys<S: serde::Serializer>(keys: &[Pubkey], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(keys.iter().map(|k| k.to_string()))
}
