//! Dry runs of assembled envelopes
//!
//! Simulation goes through the same transport as assembly. The node is
//! asked to skip signature checks and substitute a fresh blockhash, so an
//! unsigned envelope can be checked right after assembly.

use crate::structured_logging::StructuredLogger;
use crate::transport::{SimulationOutcome, Transport};
use crate::tx_builder::errors::TransactionBuilderError;
use crate::tx_builder::output::UnsignedEnvelope;

/// Simulate an envelope; program errors come back inside the outcome, not
/// as `Err`
pub async fn simulate_envelope<T: Transport + ?Sized>(
    transport: &T,
    envelope: &UnsignedEnvelope,
) -> Result<SimulationOutcome, TransactionBuilderError> {
    let outcome = transport.simulate(&envelope.transaction).await?;
    StructuredLogger::new(envelope.correlation_id.clone()).log_simulation(
        outcome.success,
        outcome.compute_units,
        outcome.error.as_deref(),
    );
    Ok(outcome)
}

/// Compute unit limit suggested by a successful simulation, with headroom
pub fn suggested_unit_limit(outcome: &SimulationOutcome, headroom_pct: u32) -> Option<u32> {
    if !outcome.success {
        return None;
    }
    let used = outcome.compute_units?;
    let padded = used.saturating_mul(100 + headroom_pct as u64) / 100;
    Some(padded.min(1_400_000) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::{InstructionEncoder, MarketInstruction, PositionAction};
    use crate::test_utils::MockTransport;
    use crate::tx_builder::TransactionAssembler;
    use crate::types::ProgramContext;
    use solana_sdk::pubkey::Pubkey;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_simulate_assembled_envelope() {
        let transport = Arc::new(MockTransport::new());
        transport.set_simulation(SimulationOutcome {
            success: true,
            logs: vec!["Program log: Instruction: ClaimWinningsSol".to_string()],
            compute_units: Some(21_000),
            error: None,
        });
        let owner = Pubkey::new_unique();
        let assembler = TransactionAssembler::new(
            transport.clone(),
            InstructionEncoder::new(&ProgramContext::default()),
        );
        let envelope = assembler
            .assemble(
                &[MarketInstruction::ClaimWinnings(PositionAction { market_id: 1, owner })],
                &owner,
            )
            .await
            .unwrap();

        let outcome = simulate_envelope(transport.as_ref(), &envelope).await.unwrap();
        assert!(outcome.success);
        assert_eq!(transport.simulated(), vec![envelope.transaction.clone()]);
        assert_eq!(suggested_unit_limit(&outcome, 20), Some(25_200));
    }

    #[test]
    fn test_no_suggestion_for_failed_run() {
        let failed = SimulationOutcome {
            success: false,
            compute_units: Some(10),
            error: Some("custom program error: 0x1771".into()),
            ..Default::default()
        };
        assert_eq!(suggested_unit_limit(&failed, 10), None);
        let huge = SimulationOutcome {
            success: true,
            compute_units: Some(1_400_000),
            ..Default::default()
        };
        assert_eq!(suggested_unit_limit(&huge, 50), Some(1_400_000));
    }
}
