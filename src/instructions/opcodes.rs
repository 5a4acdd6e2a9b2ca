//! Instruction opcodes
//!
//! Every payload starts with the first 8 bytes of `sha256("global:<name>")`.

use serde::Serialize;
use std::fmt;

/// Every instruction the program exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    PlaceBetSol,
    PlaceBetSolWithAffiliate,
    ClaimWinningsSol,
    ClaimRefundSol,
    ClaimAffiliateSol,
    RegisterAffiliate,
    ToggleAffiliate,
    CreateLabMarketSol,
    CreatePrivateMarketSol,
    CreateRaceMarketSol,
    BetOnRaceOutcomeSol,
    ClaimRaceWinningsSol,
    ClaimRaceRefundSol,
    ResolveRace,
    ProposeResolution,
    ProposeResolutionHost,
    FinalizeResolution,
    ResolveMarket,
    FlagDispute,
    ResolveDispute,
    VoteCouncil,
    ChangeCouncilVote,
    CancelMarket,
    CancelRace,
    PauseMarket,
    CloseMarket,
    ClosePosition,
    CloseRaceMarket,
    CloseRacePosition,
    AddToWhitelist,
    RemoveFromWhitelist,
    CreateRaceWhitelist,
    AddToRaceWhitelist,
    RemoveFromRaceWhitelist,
    SetInviteHash,
    CreateCreatorProfile,
    UpdateCreatorProfile,
    WithdrawCreatorFees,
}

impl Opcode {
    pub const ALL: [Opcode; 38] = [
        Opcode::PlaceBetSol,
        Opcode::PlaceBetSolWithAffiliate,
        Opcode::ClaimWinningsSol,
        Opcode::ClaimRefundSol,
        Opcode::ClaimAffiliateSol,
        Opcode::RegisterAffiliate,
        Opcode::ToggleAffiliate,
        Opcode::CreateLabMarketSol,
        Opcode::CreatePrivateMarketSol,
        Opcode::CreateRaceMarketSol,
        Opcode::BetOnRaceOutcomeSol,
        Opcode::ClaimRaceWinningsSol,
        Opcode::ClaimRaceRefundSol,
        Opcode::ResolveRace,
        Opcode::ProposeResolution,
        Opcode::ProposeResolutionHost,
        Opcode::FinalizeResolution,
        Opcode::ResolveMarket,
        Opcode::FlagDispute,
        Opcode::ResolveDispute,
        Opcode::VoteCouncil,
        Opcode::ChangeCouncilVote,
        Opcode::CancelMarket,
        Opcode::CancelRace,
        Opcode::PauseMarket,
        Opcode::CloseMarket,
        Opcode::ClosePosition,
        Opcode::CloseRaceMarket,
        Opcode::CloseRacePosition,
        Opcode::AddToWhitelist,
        Opcode::RemoveFromWhitelist,
        Opcode::CreateRaceWhitelist,
        Opcode::AddToRaceWhitelist,
        Opcode::RemoveFromRaceWhitelist,
        Opcode::SetInviteHash,
        Opcode::CreateCreatorProfile,
        Opcode::UpdateCreatorProfile,
        Opcode::WithdrawCreatorFees,
    ];

    /// Instruction name as registered by the program
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::PlaceBetSol => "place_bet_sol",
            Opcode::PlaceBetSolWithAffiliate => "place_bet_sol_with_affiliate",
            Opcode::ClaimWinningsSol => "claim_winnings_sol",
            Opcode::ClaimRefundSol => "claim_refund_sol",
            Opcode::ClaimAffiliateSol => "claim_affiliate_sol",
            Opcode::RegisterAffiliate => "register_affiliate",
            Opcode::ToggleAffiliate => "toggle_affiliate",
            Opcode::CreateLabMarketSol => "create_lab_market_sol",
            Opcode::CreatePrivateMarketSol => "create_private_market_sol",
            Opcode::CreateRaceMarketSol => "create_race_market_sol",
            Opcode::BetOnRaceOutcomeSol => "bet_on_race_outcome_sol",
            Opcode::ClaimRaceWinningsSol => "claim_race_winnings_sol",
            Opcode::ClaimRaceRefundSol => "claim_race_refund_sol",
            Opcode::ResolveRace => "resolve_race",
            Opcode::ProposeResolution => "propose_resolution",
            Opcode::ProposeResolutionHost => "propose_resolution_host",
            Opcode::FinalizeResolution => "finalize_resolution",
            Opcode::ResolveMarket => "resolve_market",
            Opcode::FlagDispute => "flag_dispute",
            Opcode::ResolveDispute => "resolve_dispute",
            Opcode::VoteCouncil => "vote_council",
            Opcode::ChangeCouncilVote => "change_council_vote",
            Opcode::CancelMarket => "cancel_market",
            Opcode::CancelRace => "cancel_race",
            Opcode::PauseMarket => "pause_market",
            Opcode::CloseMarket => "close_market",
            Opcode::ClosePosition => "close_position",
            Opcode::CloseRaceMarket => "close_race_market",
            Opcode::CloseRacePosition => "close_race_position",
            Opcode::AddToWhitelist => "add_to_whitelist",
            Opcode::RemoveFromWhitelist => "remove_from_whitelist",
            Opcode::CreateRaceWhitelist => "create_race_whitelist",
            Opcode::AddToRaceWhitelist => "add_to_race_whitelist",
            Opcode::RemoveFromRaceWhitelist => "remove_from_race_whitelist",
            Opcode::SetInviteHash => "set_invite_hash",
            Opcode::CreateCreatorProfile => "create_creator_profile",
            Opcode::UpdateCreatorProfile => "update_creator_profile",
            Opcode::WithdrawCreatorFees => "withdraw_creator_fees",
        }
    }

    pub fn tag(&self) -> [u8; 8] {
        match self {
            Opcode::PlaceBetSol => [0x89, 0x89, 0xf7, 0xfd, 0xe9, 0xf3, 0x30, 0xaa],
            Opcode::PlaceBetSolWithAffiliate => [0xc5, 0xba, 0xbb, 0x91, 0xfc, 0xef, 0x65, 0x60],
            Opcode::ClaimWinningsSol => [0x40, 0x9e, 0xcf, 0x74, 0x80, 0x81, 0xa9, 0x4c],
            Opcode::ClaimRefundSol => [0x08, 0x52, 0x05, 0x90, 0xc2, 0x72, 0xff, 0x14],
            Opcode::ClaimAffiliateSol => [0x7d, 0x12, 0xa4, 0x70, 0xd8, 0xcf, 0xc5, 0xc9],
            Opcode::RegisterAffiliate => [0x57, 0x79, 0x63, 0xb8, 0x7e, 0x3f, 0x67, 0xd9],
            Opcode::ToggleAffiliate => [0x2f, 0xa1, 0x85, 0x13, 0xac, 0x2c, 0x2b, 0xc2],
            Opcode::CreateLabMarketSol => [0x23, 0x9f, 0x32, 0x43, 0x1f, 0x86, 0xc7, 0x9d],
            Opcode::CreatePrivateMarketSol => [0x6b, 0x68, 0xda, 0xad, 0x51, 0x76, 0xa7, 0x43],
            Opcode::CreateRaceMarketSol => [0x5e, 0xed, 0x28, 0x2f, 0x3f, 0xe9, 0x19, 0x43],
            Opcode::BetOnRaceOutcomeSol => [0xc3, 0xb5, 0x97, 0x9f, 0x69, 0x64, 0xea, 0xf4],
            Opcode::ClaimRaceWinningsSol => [0x2e, 0x78, 0xca, 0xc2, 0x7e, 0x48, 0x16, 0x34],
            Opcode::ClaimRaceRefundSol => [0x9f, 0x99, 0xea, 0x88, 0x2b, 0x4f, 0xdb, 0x98],
            Opcode::ResolveRace => [0xb5, 0xfc, 0x07, 0xd1, 0xf2, 0x64, 0x5f, 0xac],
            Opcode::ProposeResolution => [0x13, 0x44, 0xb5, 0x17, 0xc2, 0x92, 0x98, 0xfc],
            Opcode::ProposeResolutionHost => [0x74, 0xe7, 0x4b, 0xb9, 0x7f, 0x81, 0x2e, 0x7c],
            Opcode::FinalizeResolution => [0xbf, 0x4a, 0x5e, 0xd6, 0x2d, 0x96, 0x98, 0x7d],
            Opcode::ResolveMarket => [0x9b, 0x17, 0x50, 0xad, 0x2e, 0x4a, 0x17, 0xef],
            Opcode::FlagDispute => [0x96, 0xde, 0x4e, 0x48, 0x75, 0x8c, 0x02, 0x4b],
            Opcode::ResolveDispute => [0xe7, 0x06, 0xca, 0x06, 0x60, 0x67, 0x0c, 0xe6],
            Opcode::VoteCouncil => [0xfc, 0xa7, 0xa5, 0xb6, 0xdd, 0xf2, 0xae, 0xf9],
            Opcode::ChangeCouncilVote => [0x46, 0x60, 0x48, 0xfd, 0x86, 0x78, 0xfe, 0x4c],
            Opcode::CancelMarket => [0xcd, 0x79, 0x54, 0xd2, 0xde, 0x47, 0x96, 0x0b],
            Opcode::CancelRace => [0xdf, 0xd6, 0xe8, 0xe8, 0x2b, 0x0f, 0xa5, 0xea],
            Opcode::PauseMarket => [0xd8, 0xee, 0x04, 0xa4, 0x41, 0x0b, 0xa2, 0x5b],
            Opcode::CloseMarket => [0x58, 0x9a, 0xf8, 0xba, 0x30, 0x0e, 0x7b, 0xf4],
            Opcode::ClosePosition => [0x7b, 0x86, 0x51, 0x00, 0x31, 0x44, 0x62, 0x62],
            Opcode::CloseRaceMarket => [0x27, 0xbd, 0xa6, 0x76, 0x86, 0x25, 0x66, 0x29],
            Opcode::CloseRacePosition => [0x79, 0x8b, 0xe1, 0x3d, 0x86, 0x1a, 0x8d, 0xed],
            Opcode::AddToWhitelist => [0x9d, 0xd3, 0x34, 0x36, 0x90, 0x51, 0x05, 0x37],
            Opcode::RemoveFromWhitelist => [0x07, 0x90, 0xd8, 0xef, 0xf3, 0xec, 0xc1, 0xeb],
            Opcode::CreateRaceWhitelist => [0xec, 0x67, 0x29, 0x09, 0x98, 0x17, 0xe5, 0x3a],
            Opcode::AddToRaceWhitelist => [0x90, 0xe5, 0x70, 0xb8, 0xc7, 0x27, 0x1b, 0x9c],
            Opcode::RemoveFromRaceWhitelist => [0x96, 0x88, 0x11, 0x9e, 0x30, 0x13, 0x27, 0xe8],
            Opcode::SetInviteHash => [0x32, 0x21, 0x14, 0x5e, 0x66, 0x01, 0x8f, 0x66],
            Opcode::CreateCreatorProfile => [0x8b, 0xf4, 0x7f, 0x91, 0x5f, 0xac, 0x8c, 0x9a],
            Opcode::UpdateCreatorProfile => [0x08, 0xf0, 0xa2, 0x37, 0x6e, 0x2e, 0xb1, 0x6c],
            Opcode::WithdrawCreatorFees => [0x08, 0x1e, 0xd5, 0x12, 0x79, 0x69, 0x81, 0xde],
        }
    }

    /// Identify a payload by its opcode prefix
    pub fn from_payload(data: &[u8]) -> Option<Opcode> {
        let tag = data.get(..8)?;
        Self::ALL.into_iter().find(|op| op.tag().as_slice() == tag)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute the opcode for an instruction name at runtime
pub fn instruction_tag(name: &str) -> [u8; 8] {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(format!("global:{}", name).as_bytes());
    let mut tag = [0u8; 8];
    tag.copy_from_slice(&digest[..8]);
    tag
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tags_match_hash_convention() {
        for op in Opcode::ALL {
            assert_eq!(op.tag(), instruction_tag(op.name()), "opcode {}", op);
        }
    }

    #[test]
    fn test_tags_unique() {
        let tags: HashSet<[u8; 8]> = Opcode::ALL.iter().map(|op| op.tag()).collect();
        assert_eq!(tags.len(), Opcode::ALL.len());
    }

    #[test]
    fn test_from_payload() {
        let mut data = Opcode::FlagDispute.tag().to_vec();
        data.extend_from_slice(&[1, 2, 3]);
        assert_eq!(Opcode::from_payload(&data), Some(Opcode::FlagDispute));
        assert_eq!(Opcode::from_payload(&[0u8; 4]), None);
    }
}
