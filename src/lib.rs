//! Market Adapter - key-less client for an on-chain pari-mutuel prediction
//! market program
//!
//! The library reads program-owned accounts into typed records, encodes
//! every program instruction and assembles unsigned transactions for a
//! separate signer. It never holds keys.
//!
//! ## Modules
//!
//! - **codec**: bounds-checked field cursor and writer
//! - **pda**: deterministic address derivation
//! - **accounts**: typed decoders for each record kind
//! - **instructions**: instruction encoders and account lists
//! - **quote**: pari-mutuel payout arithmetic
//! - **reader**: fetch-and-decode over a [`transport::Transport`]
//! - **tx_builder**: unsigned envelope assembly and simulation

pub mod accounts;
pub mod codec;
pub mod compat;
pub mod config;
pub mod instructions;
pub mod pda;
pub mod quote;
pub mod reader;
pub mod structured_logging;
pub mod test_utils;
pub mod transport;
pub mod tx_builder;
pub mod types;

// Re-export commonly used types
pub use accounts::{AccountKind, AccountRecord};
pub use codec::{CodecError, CodecResult};
pub use config::AdapterConfig;
pub use instructions::{InstructionEncoder, MarketInstruction};
pub use pda::{AddressDeriver, DerivedAddress};
pub use quote::PariMutuelQuoter;
pub use reader::MarketReader;
pub use transport::{RpcTransport, Transport};
pub use tx_builder::{TransactionAssembler, UnsignedEnvelope};
pub use types::{Cluster, ProgramContext};

pub use solana_sdk::{message::VersionedMessage, pubkey::Pubkey};
