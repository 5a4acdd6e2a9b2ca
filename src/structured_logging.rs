//! Structured logging and assembly context

use uuid::Uuid;

/// Structured logger for envelope assembly and submission events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    context_id: String,
}

impl StructuredLogger {
    pub fn new(context_id: String) -> Self {
        Self { context_id }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn log_assembly_started(&self, fee_payer: &str, instruction_count: usize) {
        tracing::debug!(
            context_id = %self.context_id,
            fee_payer = %fee_payer,
            instruction_count = %instruction_count,
            "Assembling envelope"
        );
    }

    pub fn log_envelope_assembled(
        &self,
        fee_payer: &str,
        blockhash: &str,
        signers: usize,
        wire_len: usize,
        latency_ms: u64,
    ) {
        tracing::info!(
            context_id = %self.context_id,
            fee_payer = %fee_payer,
            blockhash = %blockhash,
            signers = %signers,
            wire_len = %wire_len,
            latency_ms = %latency_ms,
            "Envelope assembled"
        );
    }

    pub fn log_assembly_failure(&self, fee_payer: &str, error: &str, category: &str) {
        tracing::warn!(
            context_id = %self.context_id,
            fee_payer = %fee_payer,
            error = %error,
            category = %category,
            "Envelope assembly failed"
        );
    }

    pub fn log_simulation(&self, success: bool, compute_units: Option<u64>, error: Option<&str>) {
        tracing::info!(
            context_id = %self.context_id,
            success = %success,
            compute_units = ?compute_units,
            error = ?error,
            "Envelope simulated"
        );
    }

    pub fn log_submission(&self, signature: &str) {
        tracing::info!(
            context_id = %self.context_id,
            signature = %signature,
            "Envelope submitted"
        );
    }
}

/// Per-request context carried through one assembly
#[derive(Debug, Clone)]
pub struct AssemblyContext {
    /// Unique request ID, also stamped into the envelope metadata
    pub correlation_id: String,
    /// Operation name
    pub operation: String,
    pub logger: StructuredLogger,
}

impl AssemblyContext {
    pub fn new(operation: &str) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        Self {
            correlation_id: correlation_id.clone(),
            operation: operation.to_string(),
            logger: StructuredLogger::new(correlation_id),
        }
    }
}

impl Default for AssemblyContext {
    fn default() -> Self {
        Self::new("assemble")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_ids_are_unique() {
        let ctx = AssemblyContext::new("submit");
        assert_eq!(ctx.logger.context_id(), ctx.correlation_id);
        assert_eq!(ctx.operation, "submit");
        assert_ne!(AssemblyContext::default().correlation_id, ctx.correlation_id);
    }
}
