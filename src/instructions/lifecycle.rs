//! Market creation, resolution, disputes and teardown

use super::opcodes::Opcode;
use super::validate;
use super::InstructionEncoder;
use crate::accounts::enums::{Layer, ResolutionMode};
use crate::codec::{CodecError, CodecResult, FieldWriter};
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

/// Community ("lab") binary market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLabMarket {
    /// Id the new market will get; read from the config's market counter
    pub market_id: u64,
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub resolution_mode: ResolutionMode,
    pub council: Vec<Pubkey>,
    pub creator: Pubkey,
    pub treasury: Pubkey,
    pub creator_profile: Option<Pubkey>,
}

/// Private binary market, optionally gated by an invite hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePrivateMarket {
    pub market_id: u64,
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub invite_hash: Option<[u8; 32]>,
    pub council: Vec<Pubkey>,
    pub creator: Pubkey,
    pub treasury: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRaceMarket {
    pub market_id: u64,
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub outcome_labels: Vec<String>,
    pub layer: Layer,
    pub creator: Pubkey,
    pub treasury: Pubkey,
}

/// Outcome decision by an authority (admin, oracle or host)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub market_id: u64,
    pub outcome: bool,
    pub authority: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRace {
    pub market_id: u64,
    pub winning_index: u8,
    pub resolver: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeResolution {
    pub market_id: u64,
    pub payer: Pubkey,
    /// Dispute record, when one was filed
    pub dispute: Option<Pubkey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDispute {
    pub market_id: u64,
    pub reason: String,
    pub proposed_outcome: Option<bool>,
    pub disputer: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveDispute {
    pub market_id: u64,
    pub uphold: bool,
    pub final_outcome: Option<bool>,
    pub admin: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilVote {
    pub market_id: u64,
    pub outcome: bool,
    pub voter: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelMarket {
    pub market_id: u64,
    pub reason: String,
    pub authority: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseMarket {
    pub market_id: u64,
    pub paused: bool,
    pub authority: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseMarket {
    pub market_id: u64,
    pub creator: Pubkey,
}

fn known_mode(mode: ResolutionMode) -> CodecResult<()> {
    if !mode.is_known() {
        return Err(CodecError::invalid(
            "resolution_mode",
            format!("unknown mode {}", mode.to_u8()),
        ));
    }
    Ok(())
}

impl InstructionEncoder {
    /// Payload: question, closing i64, resolution i64, mode u8,
    /// council vec<pubkey>.
    /// Accounts: config (w), market (w), creator profile (optional, w),
    /// creator (s, w), treasury (w), system.
    pub fn create_lab_market(&self, p: &CreateLabMarket) -> CodecResult<Instruction> {
        validate::question(&p.question)?;
        validate::council(&p.council)?;
        known_mode(p.resolution_mode)?;

        let mut w = FieldWriter::with_tag(&Opcode::CreateLabMarketSol.tag());
        w.string(&p.question)
            .i64(p.closing_time)
            .i64(p.resolution_time)
            .u8(p.resolution_mode.to_u8())
            .pubkeys(&p.council);

        let accounts = self
            .accounts()
            .writable(self.deriver.config()?.address)
            .writable(self.deriver.market(p.market_id)?.address)
            .optional(p.creator_profile, true)
            .signer(p.creator)
            .writable(p.treasury)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: question, closing i64, resolution i64, invite_hash
    /// opt<[u8; 32]>, council vec<pubkey>.
    /// Accounts: config (w), market (w), whitelist (w), creator (s, w),
    /// treasury (w), system.
    pub fn create_private_market(&self, p: &CreatePrivateMarket) -> CodecResult<Instruction> {
        validate::question(&p.question)?;
        validate::council(&p.council)?;

        let mut w = FieldWriter::with_tag(&Opcode::CreatePrivateMarketSol.tag());
        w.string(&p.question)
            .i64(p.closing_time)
            .i64(p.resolution_time)
            .option(p.invite_hash, |w, h| {
                w.bytes(&h);
            })
            .pubkeys(&p.council);

        let accounts = self
            .accounts()
            .writable(self.deriver.config()?.address)
            .writable(self.deriver.market(p.market_id)?.address)
            .writable(self.deriver.whitelist(p.market_id)?.address)
            .signer(p.creator)
            .writable(p.treasury)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: question, closing i64, resolution i64, labels vec<string>,
    /// layer u8.
    /// Accounts: config (w), race market (w), creator (s, w), treasury (w),
    /// system.
    pub fn create_race_market(&self, p: &CreateRaceMarket) -> CodecResult<Instruction> {
        validate::question(&p.question)?;
        validate::outcome_labels(&p.outcome_labels)?;
        if !p.layer.is_known() {
            return Err(CodecError::invalid(
                "layer",
                format!("unknown layer {}", p.layer.to_u8()),
            ));
        }

        let mut w = FieldWriter::with_tag(&Opcode::CreateRaceMarketSol.tag());
        w.string(&p.question)
            .i64(p.closing_time)
            .i64(p.resolution_time)
            .vec(&p.outcome_labels, |w, label| {
                w.string(label);
            })
            .u8(p.layer.to_u8());

        let accounts = self
            .accounts()
            .writable(self.deriver.config()?.address)
            .writable(self.deriver.race_market(p.market_id)?.address)
            .signer(p.creator)
            .writable(p.treasury)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: winning index u8. Accounts: config, race market (w),
    /// resolver (s).
    pub fn resolve_race(&self, p: &ResolveRace) -> CodecResult<Instruction> {
        validate::outcome_index(p.winning_index)?;
        let mut w = FieldWriter::with_tag(&Opcode::ResolveRace.tag());
        w.u8(p.winning_index);
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(self.deriver.race_market(p.market_id)?.address)
            .readonly_signer(p.resolver);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Oracle or council proposal. Accounts: config, market (w),
    /// authority (s).
    pub fn propose_resolution(&self, p: &Resolution) -> CodecResult<Instruction> {
        self.decide(Opcode::ProposeResolution, p)
    }

    /// Host-oracle proposal. Accounts: market (w), host (s).
    pub fn propose_resolution_host(&self, p: &Resolution) -> CodecResult<Instruction> {
        let mut w = FieldWriter::with_tag(&Opcode::ProposeResolutionHost.tag());
        w.bool(p.outcome);
        let accounts = self
            .accounts()
            .writable(self.deriver.market(p.market_id)?.address)
            .readonly_signer(p.authority);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Admin resolution. Accounts: config, market (w), admin (s).
    pub fn resolve_market(&self, p: &Resolution) -> CodecResult<Instruction> {
        self.decide(Opcode::ResolveMarket, p)
    }

    /// Accounts: config, market (w), dispute (optional), payer (s).
    pub fn finalize_resolution(&self, p: &FinalizeResolution) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(self.deriver.market(p.market_id)?.address)
            .optional(p.dispute, false)
            .readonly_signer(p.payer);
        Ok(self.instruction(Self::bare(Opcode::FinalizeResolution), accounts))
    }

    /// Payload: reason string, proposed outcome opt<bool>.
    /// Accounts: config, market (w), dispute (w), disputer (s, w), system.
    pub fn flag_dispute(&self, p: &FlagDispute) -> CodecResult<Instruction> {
        validate::reason(&p.reason)?;
        let mut w = FieldWriter::with_tag(&Opcode::FlagDispute.tag());
        w.string(&p.reason).option(p.proposed_outcome, |w, v| {
            w.bool(v);
        });

        let market = self.deriver.market(p.market_id)?.address;
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(market)
            .writable(self.deriver.dispute(&market)?.address)
            .signer(p.disputer)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: uphold bool, final outcome opt<bool>.
    /// Accounts: config, market (w), dispute (w), admin (s).
    pub fn resolve_dispute(&self, p: &ResolveDispute) -> CodecResult<Instruction> {
        let mut w = FieldWriter::with_tag(&Opcode::ResolveDispute.tag());
        w.bool(p.uphold).option(p.final_outcome, |w, v| {
            w.bool(v);
        });

        let market = self.deriver.market(p.market_id)?.address;
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(market)
            .writable(self.deriver.dispute(&market)?.address)
            .readonly_signer(p.admin);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: outcome bool. Accounts: market (w), vote record (w),
    /// voter (s, w), system.
    pub fn vote_council(&self, p: &CouncilVote) -> CodecResult<Instruction> {
        let market = self.deriver.market(p.market_id)?.address;
        let mut w = FieldWriter::with_tag(&Opcode::VoteCouncil.tag());
        w.bool(p.outcome);
        let accounts = self
            .accounts()
            .writable(market)
            .writable(self.deriver.council_vote(&market, &p.voter)?.address)
            .signer(p.voter)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: outcome bool. Accounts: market (w), vote record (w),
    /// voter (s).
    pub fn change_council_vote(&self, p: &CouncilVote) -> CodecResult<Instruction> {
        let market = self.deriver.market(p.market_id)?.address;
        let mut w = FieldWriter::with_tag(&Opcode::ChangeCouncilVote.tag());
        w.bool(p.outcome);
        let accounts = self
            .accounts()
            .writable(market)
            .writable(self.deriver.council_vote(&market, &p.voter)?.address)
            .readonly_signer(p.voter);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: reason string. Accounts: config, market (w), authority (s).
    pub fn cancel_market(&self, p: &CancelMarket) -> CodecResult<Instruction> {
        let market = self.deriver.market(p.market_id)?.address;
        self.cancel(Opcode::CancelMarket, market, p)
    }

    /// Race counterpart of [`Self::cancel_market`]
    pub fn cancel_race(&self, p: &CancelMarket) -> CodecResult<Instruction> {
        let race = self.deriver.race_market(p.market_id)?.address;
        self.cancel(Opcode::CancelRace, race, p)
    }

    /// Payload: paused bool. Accounts: config, market (w), authority (s).
    pub fn pause_market(&self, p: &PauseMarket) -> CodecResult<Instruction> {
        let mut w = FieldWriter::with_tag(&Opcode::PauseMarket.tag());
        w.bool(p.paused);
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(self.deriver.market(p.market_id)?.address)
            .readonly_signer(p.authority);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Reclaims rent. Accounts: config, market (w), creator (s, w).
    pub fn close_market(&self, p: &CloseMarket) -> CodecResult<Instruction> {
        let market = self.deriver.market(p.market_id)?.address;
        self.close(Opcode::CloseMarket, market, p.creator)
    }

    pub fn close_race_market(&self, p: &CloseMarket) -> CodecResult<Instruction> {
        let race = self.deriver.race_market(p.market_id)?.address;
        self.close(Opcode::CloseRaceMarket, race, p.creator)
    }

    fn decide(&self, op: Opcode, p: &Resolution) -> CodecResult<Instruction> {
        let mut w = FieldWriter::with_tag(&op.tag());
        w.bool(p.outcome);
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(self.deriver.market(p.market_id)?.address)
            .readonly_signer(p.authority);
        Ok(self.instruction(w.finish(), accounts))
    }

    fn cancel(&self, op: Opcode, market: Pubkey, p: &CancelMarket) -> CodecResult<Instruction> {
        validate::reason(&p.reason)?;
        let mut w = FieldWriter::with_tag(&op.tag());
        w.string(&p.reason);
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(market)
            .readonly_signer(p.authority);
        Ok(self.instruction(w.finish(), accounts))
    }

    fn close(&self, op: Opcode, market: Pubkey, creator: Pubkey) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .readonly(self.deriver.config()?.address)
            .writable(market)
            .signer(creator);
        Ok(self.instruction(Self::bare(op), accounts))
    }
}
