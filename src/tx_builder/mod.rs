//! Unsigned transaction assembly
//!
//! ## Architecture
//!
//! - **errors**: one error taxonomy over encoding, transport and serialization
//! - **instructions**: compute budget planning and ordering checks
//! - **builder**: [`TransactionAssembler`], one blockhash fetch per envelope
//! - **output**: [`UnsignedEnvelope`] and the base64 wire encoding
//! - **simulate**: dry runs through the transport
//! - **submit**: relay of envelopes signed elsewhere
//!
//! Envelopes leave this module unsigned. Signature slots are present and
//! zeroed so a key holder can sign without recompiling the message.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use market_adapter::instructions::{InstructionEncoder, MarketInstruction, PlaceBet};
//! use market_adapter::transport::RpcTransport;
//! use market_adapter::tx_builder::TransactionAssembler;
//! use market_adapter::types::ProgramContext;
//! use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
//! use std::{sync::Arc, time::Duration};
//!
//! # async fn example(bettor: Pubkey) -> Result<(), market_adapter::tx_builder::TransactionBuilderError> {
//! let ctx = ProgramContext::default();
//! let transport = Arc::new(RpcTransport::new(
//!     ctx.cluster.default_rpc_url(),
//!     CommitmentConfig::confirmed(),
//!     Duration::from_secs(30),
//! ));
//! let assembler = TransactionAssembler::new(transport, InstructionEncoder::new(&ctx));
//! let envelope = assembler
//!     .assemble(
//!         &[MarketInstruction::PlaceBet(PlaceBet {
//!             market_id: 7,
//!             outcome: true,
//!             amount: 1_000_000_000,
//!             bettor,
//!             whitelist: None,
//!         })],
//!         &bettor,
//!     )
//!     .await?;
//! println!("{}", envelope.transaction);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub use errors::TransactionBuilderError;

pub mod builder;
pub mod instructions;
pub mod output;
pub mod simulate;
pub mod submit;

pub use builder::{compile_unsigned, ClaimKind, MessageVersion, TransactionAssembler};
pub use instructions::{plan_instructions, sanity_check_ix_order, ComputeBudget, InstructionPlan};
pub use output::{decode_wire, encode_wire, UnsignedEnvelope};
pub use simulate::{simulate_envelope, suggested_unit_limit};
pub use submit::{submit_signed, unsigned_signers};
