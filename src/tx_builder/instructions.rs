//! Instruction planning and ordering validation
//!
//! An envelope carries, in order:
//! 1. Compute budget instructions (CU limit, priority fee), when configured
//! 2. Program instructions, in caller order

use crate::tx_builder::errors::TransactionBuilderError;
use serde::{Deserialize, Serialize};
use solana_sdk::{compute_budget::ComputeBudgetInstruction, instruction::Instruction};

/// Compute budget prepended to every envelope. Zero fields are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComputeBudget {
    /// Compute unit limit (0 = program default)
    pub unit_limit: u32,
    /// Priority fee in micro-lamports per compute unit (0 = none)
    pub unit_price_micro_lamports: u64,
}

impl ComputeBudget {
    pub fn new(unit_limit: u32, unit_price_micro_lamports: u64) -> Self {
        Self {
            unit_limit,
            unit_price_micro_lamports,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unit_limit == 0 && self.unit_price_micro_lamports == 0
    }
}

/// Ordered instruction list for one envelope
#[derive(Debug, Clone)]
pub struct InstructionPlan {
    pub instructions: Vec<Instruction>,
    /// How many leading instructions are compute budget instructions
    pub budget_len: usize,
}

impl InstructionPlan {
    /// Program instructions only
    pub fn program_instructions(&self) -> &[Instruction] {
        &self.instructions[self.budget_len..]
    }
}

/// Plan an envelope: compute budget first, then the program instructions.
///
/// # Errors
///
/// `Configuration` when there are no program instructions or one of them
/// lists no accounts.
pub fn plan_instructions(
    budget: ComputeBudget,
    program_ixs: Vec<Instruction>,
) -> Result<InstructionPlan, TransactionBuilderError> {
    if program_ixs.is_empty() {
        return Err(TransactionBuilderError::configuration(
            "No program instructions to assemble",
        ));
    }
    if let Some(idx) = program_ixs.iter().position(|ix| ix.accounts.is_empty()) {
        return Err(TransactionBuilderError::configuration(format!(
            "Instruction {} has no accounts",
            idx
        )));
    }

    let mut instructions = Vec::with_capacity(program_ixs.len() + 2);
    if budget.unit_limit > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(
            budget.unit_limit,
        ));
    }
    if budget.unit_price_micro_lamports > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_price(
            budget.unit_price_micro_lamports,
        ));
    }
    let budget_len = instructions.len();
    instructions.extend(program_ixs);

    Ok(InstructionPlan {
        instructions,
        budget_len,
    })
}

/// Check that no compute budget instruction follows a program instruction
/// and that each budget kind appears at most once.
pub fn sanity_check_ix_order(instructions: &[Instruction]) -> Result<(), TransactionBuilderError> {
    if instructions.is_empty() {
        return Err(TransactionBuilderError::invalid_order("Instruction list is empty"));
    }

    let is_budget = |ix: &Instruction| ix.program_id == solana_sdk::compute_budget::id();
    let mut seen_program = false;
    let mut seen_tags = Vec::with_capacity(2);
    for (idx, ix) in instructions.iter().enumerate() {
        if is_budget(ix) {
            if seen_program {
                return Err(TransactionBuilderError::invalid_order(format!(
                    "Compute budget instruction at position {} follows a program instruction",
                    idx
                )));
            }
            let tag = ix.data.first().copied();
            if seen_tags.contains(&tag) {
                return Err(TransactionBuilderError::invalid_order(format!(
                    "Duplicate compute budget instruction at position {}",
                    idx
                )));
            }
            seen_tags.push(tag);
        } else {
            seen_program = true;
        }
    }

    if !seen_program {
        return Err(TransactionBuilderError::invalid_order(
            "Envelope has no program instruction",
        ));
    }
    Ok(())
}
