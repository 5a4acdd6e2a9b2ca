//! Error types for unsigned transaction assembly
//!
//! Assembly touches three layers: instruction encoding, the transport (one
//! blockhash fetch) and wire serialization. Each keeps its own error type and
//! converts into [`TransactionBuilderError`] here, so callers see one
//! taxonomy with a stable [`category`](TransactionBuilderError::category).

use crate::codec::CodecError;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransactionBuilderError {
    /// An instruction failed validation or address derivation
    #[error("Instruction encoding failed: {0}")]
    Codec(#[from] CodecError),

    /// The transport collaborator failed; surfaced as-is
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Message compilation or wire encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid assembler settings or empty input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Compute budget instructions placed after program instructions
    #[error("Invalid instruction order: {0}")]
    InvalidInstructionOrder(String),

    /// Wrapped error from external crates
    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl TransactionBuilderError {
    /// Whether the same call could succeed if repeated.
    ///
    /// Only transport failures qualify; assembly itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Codec(_)
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::InvalidInstructionOrder(_)
            | Self::External(_) => false,
        }
    }

    /// Caller-facing category: "not_found", "invalid_input", "network", ...
    pub fn category(&self) -> &'static str {
        match self {
            Self::Codec(e) => e.category(),
            Self::Transport(e) => e.category(),
            Self::Serialization(_) => "serialization",
            Self::Configuration(_) => "config",
            Self::InvalidInstructionOrder(_) => "validation",
            Self::External(_) => "external",
        }
    }
}

impl TransactionBuilderError {
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization(reason.into())
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidInstructionOrder(reason.into())
    }
}
