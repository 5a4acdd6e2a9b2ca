//! Unsigned transaction assembly
//!
//! One assembly = one blockhash fetch. Instructions are planned (compute
//! budget first), compiled into a legacy or v0 message with the fee payer
//! first, and wrapped in a transaction whose signature slots are zeroed.

use crate::instructions::{InstructionEncoder, MarketInstruction, PositionAction};
use crate::structured_logging::AssemblyContext;
use crate::transport::Transport;
use crate::tx_builder::errors::TransactionBuilderError;
use crate::tx_builder::instructions::{plan_instructions, sanity_check_ix_order, ComputeBudget};
use crate::tx_builder::output::UnsignedEnvelope;
use serde::{Deserialize, Serialize};
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::{v0::Message as MessageV0, Message, VersionedMessage},
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use std::sync::Arc;
use std::time::Instant;

/// Message format of assembled envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageVersion {
    #[default]
    Legacy,
    V0,
}

/// Claim kinds that can be batched into one envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    Winnings,
    Refund,
    RaceWinnings,
    RaceRefund,
}

/// Builds unsigned envelopes for one program deployment
pub struct TransactionAssembler<T: Transport> {
    transport: Arc<T>,
    encoder: InstructionEncoder,
    budget: ComputeBudget,
    version: MessageVersion,
}

impl<T: Transport> TransactionAssembler<T> {
    pub fn new(transport: Arc<T>, encoder: InstructionEncoder) -> Self {
        Self {
            transport,
            encoder,
            budget: ComputeBudget::default(),
            version: MessageVersion::default(),
        }
    }

    pub fn with_compute_budget(mut self, budget: ComputeBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_message_version(mut self, version: MessageVersion) -> Self {
        self.version = version;
        self
    }

    pub fn encoder(&self) -> &InstructionEncoder {
        &self.encoder
    }

    /// Encode and assemble typed instructions.
    ///
    /// Every instruction is encoded before the transport is touched, so an
    /// invalid parameter never costs a network call.
    pub async fn assemble(
        &self,
        instructions: &[MarketInstruction],
        fee_payer: &Pubkey,
    ) -> Result<UnsignedEnvelope, TransactionBuilderError> {
        let encoded = instructions
            .iter()
            .map(|ix| self.encoder.encode(ix))
            .collect::<Result<Vec<_>, _>>()?;
        self.assemble_instructions(encoded, fee_payer).await
    }

    /// Several claims from one owner in a single envelope
    pub async fn assemble_claims(
        &self,
        owner: &Pubkey,
        claims: &[(ClaimKind, u64)],
    ) -> Result<UnsignedEnvelope, TransactionBuilderError> {
        let instructions: Vec<MarketInstruction> = claims
            .iter()
            .map(|(kind, market_id)| {
                let action = PositionAction {
                    market_id: *market_id,
                    owner: *owner,
                };
                match kind {
                    ClaimKind::Winnings => MarketInstruction::ClaimWinnings(action),
                    ClaimKind::Refund => MarketInstruction::ClaimRefund(action),
                    ClaimKind::RaceWinnings => MarketInstruction::ClaimRaceWinnings(action),
                    ClaimKind::RaceRefund => MarketInstruction::ClaimRaceRefund(action),
                }
            })
            .collect();
        self.assemble(&instructions, owner).await
    }

    /// Assemble already-encoded instructions
    pub async fn assemble_instructions(
        &self,
        program_ixs: Vec<Instruction>,
        fee_payer: &Pubkey,
    ) -> Result<UnsignedEnvelope, TransactionBuilderError> {
        let ctx = AssemblyContext::new("assemble");
        let start = Instant::now();
        let payer = fee_payer.to_string();
        ctx.logger.log_assembly_started(&payer, program_ixs.len());

        let result = self.assemble_inner(program_ixs, fee_payer, &ctx).await;
        match &result {
            Ok(envelope) => {
                metrics::counter!("market_adapter_envelopes_assembled").increment(1);
                ctx.logger.log_envelope_assembled(
                    &payer,
                    &envelope.blockhash.to_string(),
                    envelope.required_signers.len(),
                    envelope.transaction.len(),
                    start.elapsed().as_millis() as u64,
                );
            }
            Err(e) => {
                metrics::counter!("market_adapter_assembly_failures", "category" => e.category())
                    .increment(1);
                ctx.logger
                    .log_assembly_failure(&payer, &e.to_string(), e.category());
            }
        }
        result
    }

    async fn assemble_inner(
        &self,
        program_ixs: Vec<Instruction>,
        fee_payer: &Pubkey,
        ctx: &AssemblyContext,
    ) -> Result<UnsignedEnvelope, TransactionBuilderError> {
        let plan = plan_instructions(self.budget, program_ixs)?;
        sanity_check_ix_order(&plan.instructions)?;

        let token = self.transport.fetch_liveness_token().await?;
        let tx = compile_unsigned(self.version, &plan.instructions, fee_payer, token.blockhash)?;
        UnsignedEnvelope::new(&tx, token.last_valid_block_height, ctx.correlation_id.clone())
    }
}

/// Compile a message and attach one zeroed signature per required signer
pub fn compile_unsigned(
    version: MessageVersion,
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    blockhash: Hash,
) -> Result<VersionedTransaction, TransactionBuilderError> {
    let message = match version {
        MessageVersion::Legacy => VersionedMessage::Legacy(Message::new_with_blockhash(
            instructions,
            Some(fee_payer),
            &blockhash,
        )),
        MessageVersion::V0 => VersionedMessage::V0(
            MessageV0::try_compile(fee_payer, instructions, &[], blockhash)
                .map_err(|e| TransactionBuilderError::serialization(format!("v0 compile: {}", e)))?,
        ),
    };
    let required = crate::compat::get_message_header(&message).num_required_signatures as usize;
    Ok(VersionedTransaction {
        signatures: vec![Signature::default(); required],
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat;
    use crate::instructions::PlaceBet;
    use crate::test_utils::MockTransport;
    use crate::transport::TransportError;
    use crate::types::ProgramContext;

    fn assembler(transport: Arc<MockTransport>) -> TransactionAssembler<MockTransport> {
        TransactionAssembler::new(transport, InstructionEncoder::new(&ProgramContext::default()))
    }

    fn bet(bettor: Pubkey, amount: u64) -> MarketInstruction {
        MarketInstruction::PlaceBet(PlaceBet {
            market_id: 3,
            outcome: true,
            amount,
            bettor,
            whitelist: None,
        })
    }

    #[tokio::test]
    async fn test_assemble_unsigned_envelope() {
        let transport = Arc::new(MockTransport::new());
        let bettor = Pubkey::new_unique();
        let envelope = assembler(transport.clone())
            .assemble(&[bet(bettor, 1_000)], &bettor)
            .await
            .unwrap();

        assert_eq!(transport.liveness_calls(), 1);
        assert_eq!(envelope.required_signers, vec![bettor]);
        assert_eq!(envelope.fee_payer(), Some(&bettor));
        assert_eq!(envelope.blockhash, transport.blockhash());
        assert_eq!(envelope.instruction_count, 1);

        let tx = envelope.to_transaction().unwrap();
        assert!(compat::is_unsigned(&tx));
        assert_eq!(tx.signatures.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_instruction_skips_network() {
        let transport = Arc::new(MockTransport::new());
        let bettor = Pubkey::new_unique();
        let err = assembler(transport.clone())
            .assemble(&[bet(bettor, 0)], &bettor)
            .await
            .unwrap_err();

        assert!(matches!(err, TransactionBuilderError::Codec(_)));
        assert_eq!(err.category(), "invalid_input");
        assert_eq!(transport.liveness_calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced_without_retry() {
        let transport = Arc::new(MockTransport::new());
        transport.fail_liveness(TransportError::Timeout {
            operation: "fetch_liveness_token",
        });
        let bettor = Pubkey::new_unique();
        let err = assembler(transport.clone())
            .assemble(&[bet(bettor, 1)], &bettor)
            .await
            .unwrap_err();

        assert!(matches!(err, TransactionBuilderError::Transport(TransportError::Timeout { .. })));
        assert!(err.is_retryable());
        assert_eq!(transport.liveness_calls(), 1);
    }

    #[tokio::test]
    async fn test_budget_and_v0() {
        let transport = Arc::new(MockTransport::new());
        let bettor = Pubkey::new_unique();
        let envelope = assembler(transport)
            .with_compute_budget(ComputeBudget::new(150_000, 1_000))
            .with_message_version(MessageVersion::V0)
            .assemble(&[bet(bettor, 1)], &bettor)
            .await
            .unwrap();

        let tx = envelope.to_transaction().unwrap();
        assert!(matches!(tx.message, VersionedMessage::V0(_)));
        assert_eq!(envelope.instruction_count, 3);
        let programs = compat::get_invoked_programs(&tx.message);
        assert_eq!(programs[0], solana_sdk::compute_budget::id());
        assert_eq!(programs[2], ProgramContext::default().program_id);
    }

    #[tokio::test]
    async fn test_batch_claims_share_one_fetch() {
        let transport = Arc::new(MockTransport::new());
        let owner = Pubkey::new_unique();
        let envelope = assembler(transport.clone())
            .assemble_claims(
                &owner,
                &[
                    (ClaimKind::Winnings, 1),
                    (ClaimKind::Refund, 2),
                    (ClaimKind::RaceWinnings, 3),
                ],
            )
            .await
            .unwrap();

        assert_eq!(transport.liveness_calls(), 1);
        assert_eq!(envelope.instruction_count, 3);
        assert_eq!(envelope.required_signers, vec![owner]);
    }

    #[test]
    fn test_compile_unsigned_signature_slots() {
        let payer = Pubkey::new_unique();
        let cosigner = Pubkey::new_unique();
        let ix = Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[0],
            vec![
                solana_sdk::instruction::AccountMeta::new(payer, true),
                solana_sdk::instruction::AccountMeta::new_readonly(cosigner, true),
            ],
        );
        let tx = compile_unsigned(MessageVersion::Legacy, &[ix], &payer, Hash::new_unique()).unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert_eq!(compat::get_required_signers(&tx.message), &[payer, cosigner]);
    }
}
