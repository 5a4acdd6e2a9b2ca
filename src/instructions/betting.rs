//! Bets, claims and affiliate instructions

use super::account_list::AccountList;
use super::opcodes::Opcode;
use super::validate;
use super::InstructionEncoder;
use crate::codec::{CodecResult, FieldWriter};
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

/// Stake on one side of a binary market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceBet {
    pub market_id: u64,
    /// `true` for yes, `false` for no
    pub outcome: bool,
    pub amount: u64,
    pub bettor: Pubkey,
    /// Whitelist account of a whitelist-gated private market
    pub whitelist: Option<Pubkey>,
}

/// A bet credited to an affiliate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateBet {
    pub bet: PlaceBet,
    pub affiliate_code: String,
}

/// Stake on one outcome of a race market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceBet {
    pub market_id: u64,
    pub outcome_index: u8,
    pub amount: u64,
    pub bettor: Pubkey,
    pub whitelist: Option<Pubkey>,
}

/// Owner acting on their own position (claims, refunds, closing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAction {
    pub market_id: u64,
    pub owner: Pubkey,
}

/// Owner acting on their affiliate account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateAction {
    pub code: String,
    pub owner: Pubkey,
}

impl InstructionEncoder {
    /// Payload: market_id u64, outcome bool, amount u64.
    /// Accounts: config, market (w), position (w), whitelist (optional),
    /// bettor (s, w), system program.
    pub fn place_bet(&self, p: &PlaceBet) -> CodecResult<Instruction> {
        validate::amount(p.amount)?;
        let accounts = self.bet_accounts(p, None)?;
        Ok(self.instruction(Self::bet_payload(Opcode::PlaceBetSol, p), accounts))
    }

    /// Same payload as [`Self::place_bet`]; the affiliate account follows the
    /// position.
    pub fn place_bet_with_affiliate(&self, p: &AffiliateBet) -> CodecResult<Instruction> {
        validate::amount(p.bet.amount)?;
        validate::affiliate_code(&p.affiliate_code)?;
        let affiliate = self.deriver.affiliate(&p.affiliate_code)?.address;
        let accounts = self.bet_accounts(&p.bet, Some(affiliate))?;
        Ok(self.instruction(
            Self::bet_payload(Opcode::PlaceBetSolWithAffiliate, &p.bet),
            accounts,
        ))
    }

    pub fn claim_winnings(&self, p: &PositionAction) -> CodecResult<Instruction> {
        self.claim(Opcode::ClaimWinningsSol, p)
    }

    pub fn claim_refund(&self, p: &PositionAction) -> CodecResult<Instruction> {
        self.claim(Opcode::ClaimRefundSol, p)
    }

    /// Accounts: market, position (w), owner (s, w).
    pub fn close_position(&self, p: &PositionAction) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .readonly(self.deriver.market(p.market_id)?.address)
            .writable(self.deriver.position(p.market_id, &p.owner)?.address)
            .signer(p.owner);
        Ok(self.instruction(Self::bare(Opcode::ClosePosition), accounts))
    }

    /// Payload: code string. Accounts: affiliate (w), owner (s, w), system.
    pub fn register_affiliate(&self, p: &AffiliateAction) -> CodecResult<Instruction> {
        validate::affiliate_code(&p.code)?;
        let mut w = FieldWriter::with_tag(&Opcode::RegisterAffiliate.tag());
        w.string(&p.code);
        let accounts = self
            .accounts()
            .writable(self.deriver.affiliate(&p.code)?.address)
            .signer(p.owner)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: active bool. Accounts: affiliate (w), owner (s).
    pub fn toggle_affiliate(&self, p: &AffiliateAction, active: bool) -> CodecResult<Instruction> {
        validate::affiliate_code(&p.code)?;
        let mut w = FieldWriter::with_tag(&Opcode::ToggleAffiliate.tag());
        w.bool(active);
        let accounts = self
            .accounts()
            .writable(self.deriver.affiliate(&p.code)?.address)
            .readonly_signer(p.owner);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Accounts: affiliate (w), owner (s, w), system.
    pub fn claim_affiliate(&self, p: &AffiliateAction) -> CodecResult<Instruction> {
        validate::affiliate_code(&p.code)?;
        let accounts = self
            .accounts()
            .writable(self.deriver.affiliate(&p.code)?.address)
            .signer(p.owner)
            .system_program();
        Ok(self.instruction(Self::bare(Opcode::ClaimAffiliateSol), accounts))
    }

    /// Payload: market_id u64, outcome_index u8, amount u64.
    /// Accounts: config, race market (w), race position (w), whitelist
    /// (optional), bettor (s, w), system.
    pub fn bet_on_race_outcome(&self, p: &RaceBet) -> CodecResult<Instruction> {
        validate::amount(p.amount)?;
        validate::outcome_index(p.outcome_index)?;
        let mut w = FieldWriter::with_tag(&Opcode::BetOnRaceOutcomeSol.tag());
        w.u64(p.market_id).u8(p.outcome_index).u64(p.amount);
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(self.deriver.race_market(p.market_id)?.address)
            .writable(self.deriver.race_position(p.market_id, &p.bettor)?.address)
            .optional(p.whitelist, false)
            .signer(p.bettor)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    pub fn claim_race_winnings(&self, p: &PositionAction) -> CodecResult<Instruction> {
        self.race_claim(Opcode::ClaimRaceWinningsSol, p)
    }

    pub fn claim_race_refund(&self, p: &PositionAction) -> CodecResult<Instruction> {
        self.race_claim(Opcode::ClaimRaceRefundSol, p)
    }

    /// Accounts: race market, race position (w), owner (s, w).
    pub fn close_race_position(&self, p: &PositionAction) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .readonly(self.deriver.race_market(p.market_id)?.address)
            .writable(self.deriver.race_position(p.market_id, &p.owner)?.address)
            .signer(p.owner);
        Ok(self.instruction(Self::bare(Opcode::CloseRacePosition), accounts))
    }

    fn bet_payload(op: Opcode, p: &PlaceBet) -> Vec<u8> {
        let mut w = FieldWriter::with_tag(&op.tag());
        w.u64(p.market_id).bool(p.outcome).u64(p.amount);
        w.finish()
    }

    fn bet_accounts(&self, p: &PlaceBet, affiliate: Option<Pubkey>) -> CodecResult<AccountList> {
        let mut accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(self.deriver.market(p.market_id)?.address)
            .writable(self.deriver.position(p.market_id, &p.bettor)?.address);
        if let Some(affiliate) = affiliate {
            accounts = accounts.writable(affiliate);
        }
        Ok(accounts
            .optional(p.whitelist, false)
            .signer(p.bettor)
            .system_program())
    }

    /// Accounts: market (w), position (w), owner (s, w), system.
    fn claim(&self, op: Opcode, p: &PositionAction) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .writable(self.deriver.market(p.market_id)?.address)
            .writable(self.deriver.position(p.market_id, &p.owner)?.address)
            .signer(p.owner)
            .system_program();
        Ok(self.instruction(Self::bare(op), accounts))
    }

    fn race_claim(&self, op: Opcode, p: &PositionAction) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .writable(self.deriver.race_market(p.market_id)?.address)
            .writable(self.deriver.race_position(p.market_id, &p.owner)?.address)
            .signer(p.owner)
            .system_program();
        Ok(self.instruction(Self::bare(op), accounts))
    }
}
