use solana_client::client_error::ClientError;
use thiserror::Error;

/// Failures reported by the transport collaborator.
///
/// The adapter never interprets or retries these; [`TransportError::is_retryable`]
/// is only a hint for callers that wrap the transport with their own policy.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Node-side or network failure
    #[error("RPC error during {operation}: {message}")]
    Rpc {
        operation: &'static str,
        message: String,
    },

    #[error("Timeout during {operation}")]
    Timeout { operation: &'static str },

    #[error("Rate limited during {operation}")]
    RateLimited { operation: &'static str },

    /// The node rejected the submitted envelope
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// The wire string could not be turned back into a transaction
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rpc { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Rejected(_) | Self::InvalidEnvelope(_) => false,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidEnvelope(_) => "invalid_input",
            _ => "network",
        }
    }

    /// Classify a client error by its message
    pub fn from_client_error(err: ClientError, operation: &'static str) -> Self {
        let text = err.to_string();
        let lower = text.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout { operation }
        } else if lower.contains("429") || lower.contains("too many requests") {
            Self::RateLimited { operation }
        } else if lower.contains("transaction simulation failed")
            || lower.contains("blockhash not found")
            || lower.contains("signature verification")
        {
            Self::Rejected(text)
        } else {
            Self::Rpc {
                operation,
                message: text,
            }
        }
    }
}
