use crate::codec::CodecError;
use crate::transport::TransportError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Errors returned by [`MarketReader`](super::MarketReader)
#[derive(Debug, Clone, Error)]
pub enum ReadError {
    /// The bytes at `address` are not a valid record of the requested kind
    #[error("Failed to decode {kind} at {address}: {source}")]
    Decode {
        kind: &'static str,
        address: Pubkey,
        #[source]
        source: CodecError,
    },

    /// Address derivation failed before anything was fetched
    #[error("Derivation error: {0}")]
    Derivation(CodecError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ReadError {
    /// Callers should treat the record as absent rather than fail hard
    pub fn is_absent(&self) -> bool {
        matches!(self, ReadError::Decode { source, .. } if source.is_absent())
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ReadError::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ReadError::Decode { source, .. } | ReadError::Derivation(source) => source.category(),
            ReadError::Transport(e) => e.category(),
        }
    }
}

impl From<CodecError> for ReadError {
    fn from(err: CodecError) -> Self {
        ReadError::Derivation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failure_is_absent() {
        let err = ReadError::Decode {
            kind: "Market",
            address: Pubkey::new_unique(),
            source: CodecError::Utf8Invalid { offset: 20 },
        };
        assert!(err.is_absent());
        assert!(!err.is_retryable());
        assert_eq!(err.category(), "not_found");
    }

    #[test]
    fn test_transport_retry_hint_passes_through() {
        let err = ReadError::from(TransportError::Timeout {
            operation: "fetch_account",
        });
        assert!(err.is_retryable());
        assert!(!err.is_absent());
        assert_eq!(err.category(), "network");
    }
}
