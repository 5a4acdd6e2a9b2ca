//! Error taxonomy for decoding, encoding and address derivation
//!
//! None of these errors is retryable: the layout version is fixed, so a
//! decode that failed once will fail again on the same bytes. Callers map
//! them onto three user-facing buckets via [`CodecError::category`].

use thiserror::Error;

/// Errors produced by the codec layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The leading 8 bytes belong to a different record kind
    ///
    /// Treat the account as absent; never attempt a partial decode.
    #[error("Kind mismatch: expected {expected} tag {expected_tag:02x?}, found {found:02x?}")]
    KindMismatch {
        /// Record kind the caller asked for
        expected: &'static str,
        /// Tag the program assigns to that kind
        expected_tag: [u8; 8],
        /// Tag actually present in the buffer
        found: [u8; 8],
    },

    /// The buffer ended before a field could be read
    #[error("Buffer underrun at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A string field is not valid UTF-8
    #[error("Invalid UTF-8 in string field at offset {offset}")]
    Utf8Invalid { offset: usize },

    /// An optional-presence byte was neither 0 nor 1
    #[error("Invalid optional tag {tag} at offset {offset}")]
    InvalidOptionTag { offset: usize, tag: u8 },

    /// A stored count exceeds the fixed slot capacity that follows it
    #[error("Invalid count for `{field}` at offset {offset}: {count} exceeds {max} slots")]
    InvalidCount {
        field: &'static str,
        offset: usize,
        count: u8,
        max: usize,
    },

    /// A seed exceeds the derivation limits (32 bytes each, 16 seeds total)
    #[error("Seed too long: {reason}")]
    SeedTooLong { reason: String },

    /// No bump value in 255..=0 produced an off-curve address
    #[error("Address derivation exhausted all bump seeds")]
    DerivationExhausted,

    /// An instruction parameter failed a documented precondition
    #[error("Invalid parameter `{field}`: {reason}")]
    ParameterInvalid {
        field: &'static str,
        reason: String,
    },
}

impl CodecError {
    /// Codec errors are deterministic over their inputs; none are retryable
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Whether the caller should treat the account as "not found"
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Self::KindMismatch { .. }
                | Self::BufferUnderrun { .. }
                | Self::Utf8Invalid { .. }
                | Self::InvalidOptionTag { .. }
                | Self::InvalidCount { .. }
        )
    }

    /// Get the error category for metrics and observability
    pub fn category(&self) -> &'static str {
        match self {
            Self::KindMismatch { .. }
            | Self::BufferUnderrun { .. }
            | Self::Utf8Invalid { .. }
            | Self::InvalidOptionTag { .. }
            | Self::InvalidCount { .. } => "not_found",
            Self::SeedTooLong { .. } | Self::DerivationExhausted => "derivation",
            Self::ParameterInvalid { .. } => "invalid_input",
        }
    }
}

// Convenience constructors
impl CodecError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::ParameterInvalid {
            field,
            reason: reason.into(),
        }
    }

    pub fn seed_too_long(reason: impl Into<String>) -> Self {
        Self::SeedTooLong {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::BufferUnderrun {
            offset: 40,
            needed: 8,
            remaining: 3,
        };
        assert_eq!(
            err.to_string(),
            "Buffer underrun at offset 40: needed 8 bytes, 3 remaining"
        );

        let err = CodecError::invalid("amount", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `amount`: must be greater than zero"
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(CodecError::Utf8Invalid { offset: 0 }.category(), "not_found");
        assert_eq!(CodecError::DerivationExhausted.category(), "derivation");
        assert_eq!(CodecError::invalid("code", "too short").category(), "invalid_input");
    }

    #[test]
    fn test_nothing_is_retryable() {
        assert!(!CodecError::DerivationExhausted.is_retryable());
        assert!(!CodecError::Utf8Invalid { offset: 3 }.is_retryable());
        assert!(CodecError::Utf8Invalid { offset: 3 }.is_absent());
        assert!(!CodecError::invalid("x", "y").is_absent());
    }
}
