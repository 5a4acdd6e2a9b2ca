//! End-to-end: encode, assemble, decode the wire string back and inspect it

use async_trait::async_trait;
use market_adapter::compat;
use market_adapter::instructions::{
    is_placeholder, CouncilVote, InstructionEncoder, MarketInstruction, PlaceBet, PositionAction,
};
use market_adapter::transport::{
    AccountFilter, LivenessToken, SimulationOutcome, Transport, TransportError, TransportResult,
};
use market_adapter::tx_builder::{decode_wire, MessageVersion, TransactionAssembler};
use market_adapter::types::{Cluster, ProgramContext};
use solana_sdk::{hash::Hash, message::VersionedMessage, pubkey::Pubkey};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Transport that only hands out liveness tokens
struct LivenessOnly {
    blockhash: Hash,
    calls: AtomicUsize,
}

impl LivenessOnly {
    fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transport for LivenessOnly {
    async fn fetch_account(&self, _: &Pubkey) -> TransportResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn fetch_program_accounts(
        &self,
        _: &Pubkey,
        _: &[AccountFilter],
    ) -> TransportResult<Vec<(Pubkey, Vec<u8>)>> {
        Ok(Vec::new())
    }

    async fn fetch_liveness_token(&self) -> TransportResult<LivenessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LivenessToken {
            blockhash: self.blockhash,
            last_valid_block_height: 250_000_150,
        })
    }

    async fn submit(&self, _: &str) -> TransportResult<String> {
        Err(TransportError::Rejected("unsigned".into()))
    }

    async fn simulate(&self, _: &str) -> TransportResult<SimulationOutcome> {
        Ok(SimulationOutcome::default())
    }
}

#[tokio::test]
async fn test_bet_envelope_round_trips_through_wire() {
    let ctx = ProgramContext::for_cluster(Cluster::Devnet);
    let transport = Arc::new(LivenessOnly::new());
    let assembler = TransactionAssembler::new(transport.clone(), InstructionEncoder::new(&ctx));
    let bettor = Pubkey::new_unique();

    let envelope = assembler
        .assemble(
            &[MarketInstruction::PlaceBet(PlaceBet {
                market_id: 12,
                outcome: false,
                amount: 2_500_000_000,
                bettor,
                whitelist: None,
            })],
            &bettor,
        )
        .await
        .unwrap();

    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert_eq!(envelope.last_valid_block_height, 250_000_150);

    let tx = decode_wire(&envelope.transaction).unwrap();
    assert!(compat::is_unsigned(&tx));
    assert_eq!(*tx.message.recent_blockhash(), transport.blockhash);
    assert_eq!(compat::get_required_signers(&tx.message), &[bettor]);
    assert_eq!(compat::get_invoked_programs(&tx.message), vec![ctx.program_id]);
    assert!(matches!(tx.message, VersionedMessage::Legacy(_)));

    // The absent whitelist slot carries the program id, read-only.
    let ix = InstructionEncoder::new(&ctx)
        .encode(&MarketInstruction::PlaceBet(PlaceBet {
            market_id: 12,
            outcome: false,
            amount: 2_500_000_000,
            bettor,
            whitelist: None,
        }))
        .unwrap();
    assert_eq!(ix.accounts.iter().filter(|m| is_placeholder(m, &ctx.program_id)).count(), 1);
    assert!(!compat::get_writable_accounts(&tx.message).contains(&ctx.program_id));
}

#[tokio::test]
async fn test_mixed_batch_in_v0_message() {
    let ctx = ProgramContext::default();
    let transport = Arc::new(LivenessOnly::new());
    let assembler = TransactionAssembler::new(transport.clone(), InstructionEncoder::new(&ctx))
        .with_message_version(MessageVersion::V0);
    let voter = Pubkey::new_unique();

    let envelope = assembler
        .assemble(
            &[
                MarketInstruction::VoteCouncil(CouncilVote {
                    market_id: 3,
                    outcome: true,
                    voter,
                }),
                MarketInstruction::ClosePosition(PositionAction {
                    market_id: 2,
                    owner: voter,
                }),
            ],
            &voter,
        )
        .await
        .unwrap();

    let tx = envelope.to_transaction().unwrap();
    assert!(matches!(tx.message, VersionedMessage::V0(_)));
    assert_eq!(tx.message.instructions().len(), 2);
    assert_eq!(envelope.required_signers, vec![voter]);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_batch_rejected_before_fetch() {
    let transport = Arc::new(LivenessOnly::new());
    let assembler =
        TransactionAssembler::new(transport.clone(), InstructionEncoder::new(&ProgramContext::default()));
    let payer = Pubkey::new_unique();

    assert!(assembler.assemble(&[], &payer).await.is_err());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}
