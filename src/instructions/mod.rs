//! Instruction encoders
//!
//! Each encoder validates its parameters, then writes the opcode tag and the
//! packed fields, and lists the accounts in the order the program expects.
//! Nothing is written when validation fails.
//!
//! Account addresses are derived through [`AddressDeriver`]; callers only
//! supply keys the program cannot derive (signers, the treasury, optional
//! accounts such as a bet's whitelist).

pub mod access;
pub mod account_list;
pub mod betting;
pub mod lifecycle;
pub mod opcodes;
pub mod validate;

pub use access::{
    CreateCreatorProfile, CreateRaceWhitelist, SetInviteHash, UpdateCreatorProfile,
    WhitelistUpdate, WithdrawCreatorFees,
};
pub use account_list::{is_placeholder, AccountList};
pub use betting::{AffiliateAction, AffiliateBet, PlaceBet, PositionAction, RaceBet};
pub use lifecycle::{
    CancelMarket, CloseMarket, CouncilVote, CreateLabMarket, CreatePrivateMarket,
    CreateRaceMarket, FinalizeResolution, FlagDispute, PauseMarket, Resolution, ResolveDispute,
    ResolveRace,
};
pub use opcodes::Opcode;

use crate::codec::{CodecResult, FieldWriter};
use crate::pda::AddressDeriver;
use crate::types::ProgramContext;
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

/// Every instruction the adapter can encode, with its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketInstruction {
    PlaceBet(PlaceBet),
    PlaceBetWithAffiliate(AffiliateBet),
    ClaimWinnings(PositionAction),
    ClaimRefund(PositionAction),
    ClaimAffiliate(AffiliateAction),
    RegisterAffiliate(AffiliateAction),
    ToggleAffiliate { action: AffiliateAction, active: bool },
    CreateLabMarket(CreateLabMarket),
    CreatePrivateMarket(CreatePrivateMarket),
    CreateRaceMarket(CreateRaceMarket),
    BetOnRaceOutcome(RaceBet),
    ClaimRaceWinnings(PositionAction),
    ClaimRaceRefund(PositionAction),
    ResolveRace(ResolveRace),
    ProposeResolution(Resolution),
    ProposeResolutionHost(Resolution),
    FinalizeResolution(FinalizeResolution),
    ResolveMarket(Resolution),
    FlagDispute(FlagDispute),
    ResolveDispute(ResolveDispute),
    VoteCouncil(CouncilVote),
    ChangeCouncilVote(CouncilVote),
    CancelMarket(CancelMarket),
    CancelRace(CancelMarket),
    PauseMarket(PauseMarket),
    CloseMarket(CloseMarket),
    ClosePosition(PositionAction),
    CloseRaceMarket(CloseMarket),
    CloseRacePosition(PositionAction),
    AddToWhitelist(WhitelistUpdate),
    RemoveFromWhitelist(WhitelistUpdate),
    CreateRaceWhitelist(CreateRaceWhitelist),
    AddToRaceWhitelist(WhitelistUpdate),
    RemoveFromRaceWhitelist(WhitelistUpdate),
    SetInviteHash(SetInviteHash),
    CreateCreatorProfile(CreateCreatorProfile),
    UpdateCreatorProfile(UpdateCreatorProfile),
    WithdrawCreatorFees(WithdrawCreatorFees),
}

impl MarketInstruction {
    pub fn opcode(&self) -> Opcode {
        use MarketInstruction as M;
        match self {
            M::PlaceBet(_) => Opcode::PlaceBetSol,
            M::PlaceBetWithAffiliate(_) => Opcode::PlaceBetSolWithAffiliate,
            M::ClaimWinnings(_) => Opcode::ClaimWinningsSol,
            M::ClaimRefund(_) => Opcode::ClaimRefundSol,
            M::ClaimAffiliate(_) => Opcode::ClaimAffiliateSol,
            M::RegisterAffiliate(_) => Opcode::RegisterAffiliate,
            M::ToggleAffiliate { .. } => Opcode::ToggleAffiliate,
            M::CreateLabMarket(_) => Opcode::CreateLabMarketSol,
            M::CreatePrivateMarket(_) => Opcode::CreatePrivateMarketSol,
            M::CreateRaceMarket(_) => Opcode::CreateRaceMarketSol,
            M::BetOnRaceOutcome(_) => Opcode::BetOnRaceOutcomeSol,
            M::ClaimRaceWinnings(_) => Opcode::ClaimRaceWinningsSol,
            M::ClaimRaceRefund(_) => Opcode::ClaimRaceRefundSol,
            M::ResolveRace(_) => Opcode::ResolveRace,
            M::ProposeResolution(_) => Opcode::ProposeResolution,
            M::ProposeResolutionHost(_) => Opcode::ProposeResolutionHost,
            M::FinalizeResolution(_) => Opcode::FinalizeResolution,
            M::ResolveMarket(_) => Opcode::ResolveMarket,
            M::FlagDispute(_) => Opcode::FlagDispute,
            M::ResolveDispute(_) => Opcode::ResolveDispute,
            M::VoteCouncil(_) => Opcode::VoteCouncil,
            M::ChangeCouncilVote(_) => Opcode::ChangeCouncilVote,
            M::CancelMarket(_) => Opcode::CancelMarket,
            M::CancelRace(_) => Opcode::CancelRace,
            M::PauseMarket(_) => Opcode::PauseMarket,
            M::CloseMarket(_) => Opcode::CloseMarket,
            M::ClosePosition(_) => Opcode::ClosePosition,
            M::CloseRaceMarket(_) => Opcode::CloseRaceMarket,
            M::CloseRacePosition(_) => Opcode::CloseRacePosition,
            M::AddToWhitelist(_) => Opcode::AddToWhitelist,
            M::RemoveFromWhitelist(_) => Opcode::RemoveFromWhitelist,
            M::CreateRaceWhitelist(_) => Opcode::CreateRaceWhitelist,
            M::AddToRaceWhitelist(_) => Opcode::AddToRaceWhitelist,
            M::RemoveFromRaceWhitelist(_) => Opcode::RemoveFromRaceWhitelist,
            M::SetInviteHash(_) => Opcode::SetInviteHash,
            M::CreateCreatorProfile(_) => Opcode::CreateCreatorProfile,
            M::UpdateCreatorProfile(_) => Opcode::UpdateCreatorProfile,
            M::WithdrawCreatorFees(_) => Opcode::WithdrawCreatorFees,
        }
    }
}

/// Encodes instructions for one program deployment
#[derive(Debug, Clone, Copy)]
pub struct InstructionEncoder {
    deriver: AddressDeriver,
}

impl InstructionEncoder {
    pub fn new(ctx: &ProgramContext) -> Self {
        Self {
            deriver: AddressDeriver::new(ctx),
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        self.deriver.program_id()
    }

    pub fn deriver(&self) -> &AddressDeriver {
        &self.deriver
    }

    /// Encode any instruction: opcode-tagged payload plus ordered accounts
    pub fn encode(&self, ix: &MarketInstruction) -> CodecResult<Instruction> {
        use MarketInstruction as M;
        let result = match ix {
            M::PlaceBet(p) => self.place_bet(p),
            M::PlaceBetWithAffiliate(p) => self.place_bet_with_affiliate(p),
            M::ClaimWinnings(p) => self.claim_winnings(p),
            M::ClaimRefund(p) => self.claim_refund(p),
            M::ClaimAffiliate(p) => self.claim_affiliate(p),
            M::RegisterAffiliate(p) => self.register_affiliate(p),
            M::ToggleAffiliate { action, active } => self.toggle_affiliate(action, *active),
            M::CreateLabMarket(p) => self.create_lab_market(p),
            M::CreatePrivateMarket(p) => self.create_private_market(p),
            M::CreateRaceMarket(p) => self.create_race_market(p),
            M::BetOnRaceOutcome(p) => self.bet_on_race_outcome(p),
            M::ClaimRaceWinnings(p) => self.claim_race_winnings(p),
            M::ClaimRaceRefund(p) => self.claim_race_refund(p),
            M::ResolveRace(p) => self.resolve_race(p),
            M::ProposeResolution(p) => self.propose_resolution(p),
            M::ProposeResolutionHost(p) => self.propose_resolution_host(p),
            M::FinalizeResolution(p) => self.finalize_resolution(p),
            M::ResolveMarket(p) => self.resolve_market(p),
            M::FlagDispute(p) => self.flag_dispute(p),
            M::ResolveDispute(p) => self.resolve_dispute(p),
            M::VoteCouncil(p) => self.vote_council(p),
            M::ChangeCouncilVote(p) => self.change_council_vote(p),
            M::CancelMarket(p) => self.cancel_market(p),
            M::CancelRace(p) => self.cancel_race(p),
            M::PauseMarket(p) => self.pause_market(p),
            M::CloseMarket(p) => self.close_market(p),
            M::ClosePosition(p) => self.close_position(p),
            M::CloseRaceMarket(p) => self.close_race_market(p),
            M::CloseRacePosition(p) => self.close_race_position(p),
            M::AddToWhitelist(p) => self.add_to_whitelist(p),
            M::RemoveFromWhitelist(p) => self.remove_from_whitelist(p),
            M::CreateRaceWhitelist(p) => self.create_race_whitelist(p),
            M::AddToRaceWhitelist(p) => self.add_to_race_whitelist(p),
            M::RemoveFromRaceWhitelist(p) => self.remove_from_race_whitelist(p),
            M::SetInviteHash(p) => self.set_invite_hash(p),
            M::CreateCreatorProfile(p) => self.create_creator_profile(p),
            M::UpdateCreatorProfile(p) => self.update_creator_profile(p),
            M::WithdrawCreatorFees(p) => self.withdraw_creator_fees(p),
        };

        match &result {
            Ok(encoded) => debug!(
                opcode = %ix.opcode(),
                payload_len = encoded.data.len(),
                accounts = encoded.accounts.len(),
                "Encoded instruction"
            ),
            Err(e) => debug!(opcode = %ix.opcode(), error = %e, "Instruction rejected"),
        }
        result
    }

    pub(crate) fn accounts(&self) -> AccountList {
        AccountList::new(*self.deriver.program_id())
    }

    pub(crate) fn instruction(&self, data: Vec<u8>, accounts: AccountList) -> Instruction {
        Instruction {
            program_id: *self.deriver.program_id(),
            accounts: accounts.into_metas(),
            data,
        }
    }

    /// Payload for instructions that carry no fields
    pub(crate) fn bare(op: Opcode) -> Vec<u8> {
        FieldWriter::with_tag(&op.tag()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cluster, DEVNET_PROGRAM_ID};

    fn owner_action() -> PositionAction {
        PositionAction {
            market_id: 77,
            owner: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_encode_dispatch_prefixes_matching_opcode() {
        let enc = InstructionEncoder::new(&ProgramContext::default());
        let owner = Pubkey::new_unique();
        let samples = vec![
            MarketInstruction::ClaimWinnings(owner_action()),
            MarketInstruction::ClaimRefund(owner_action()),
            MarketInstruction::ClosePosition(owner_action()),
            MarketInstruction::CloseRacePosition(owner_action()),
            MarketInstruction::ToggleAffiliate {
                action: AffiliateAction {
                    code: "ALPHA".to_string(),
                    owner,
                },
                active: false,
            },
            MarketInstruction::PauseMarket(PauseMarket {
                market_id: 1,
                paused: true,
                authority: owner,
            }),
            MarketInstruction::WithdrawCreatorFees(WithdrawCreatorFees {
                market_id: 1,
                creator: owner,
            }),
        ];
        for ix in samples {
            let encoded = enc.encode(&ix).unwrap();
            assert_eq!(encoded.data[..8], ix.opcode().tag(), "{}", ix.opcode());
            assert_eq!(encoded.program_id, *enc.program_id());
        }
    }

    #[test]
    fn test_program_context_flows_into_accounts() {
        let devnet = InstructionEncoder::new(&ProgramContext::for_cluster(Cluster::Devnet));
        let mainnet = InstructionEncoder::new(&ProgramContext::for_cluster(Cluster::Mainnet));
        let ix = MarketInstruction::ClaimWinnings(owner_action());

        let a = devnet.encode(&ix).unwrap();
        let b = mainnet.encode(&ix).unwrap();
        assert_eq!(a.program_id, DEVNET_PROGRAM_ID);
        assert_eq!(a.data, b.data);
        assert_ne!(a.accounts[0].pubkey, b.accounts[0].pubkey);
    }

    #[test]
    fn test_instruction_json_shape() {
        let ix = MarketInstruction::ClaimRefund(PositionAction {
            market_id: 5,
            owner: Pubkey::new_unique(),
        });
        let json = serde_json::to_value(&ix).unwrap();
        assert_eq!(json["kind"], "claim_refund");
        assert_eq!(json["market_id"], 5);
        let back: MarketInstruction = serde_json::from_value(json).unwrap();
        assert_eq!(back, ix);
    }
}
