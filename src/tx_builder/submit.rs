//! Relay of externally signed envelopes
//!
//! The adapter never signs. A caller that signed an assembled envelope with
//! its own keys can hand the wire string back here; it is checked for empty
//! signature slots before it reaches the transport.

use crate::compat;
use crate::structured_logging::AssemblyContext;
use crate::transport::{Transport, TransportError};
use crate::tx_builder::errors::TransactionBuilderError;
use crate::tx_builder::output::decode_wire;
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction};

/// Required signers whose signature slot is still zeroed
pub fn unsigned_signers(tx: &VersionedTransaction) -> Vec<Pubkey> {
    compat::get_required_signers(&tx.message)
        .iter()
        .zip(tx.signatures.iter())
        .filter(|(_, sig)| **sig == Signature::default())
        .map(|(key, _)| *key)
        .collect()
}

/// Submit a fully signed envelope and return the node's signature string
pub async fn submit_signed<T: Transport + ?Sized>(
    transport: &T,
    envelope: &str,
) -> Result<String, TransactionBuilderError> {
    let ctx = AssemblyContext::new("submit");
    let tx = decode_wire(envelope).map_err(TransportError::InvalidEnvelope)?;

    let expected = compat::get_message_header(&tx.message).num_required_signatures as usize;
    if tx.signatures.len() != expected {
        return Err(TransactionBuilderError::Configuration(format!(
            "envelope carries {} signature slots, message requires {}",
            tx.signatures.len(),
            expected
        )));
    }
    let missing = unsigned_signers(&tx);
    if !missing.is_empty() {
        let keys: Vec<String> = missing.iter().map(Pubkey::to_string).collect();
        ctx.logger.log_assembly_failure(&keys[0], "unsigned envelope", "config");
        return Err(TransactionBuilderError::Configuration(format!(
            "envelope is missing signatures for {}",
            keys.join(", ")
        )));
    }

    let signature = transport.submit(envelope).await?;
    ctx.logger.log_submission(&signature);
    Ok(signature)
}
