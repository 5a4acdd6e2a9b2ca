//! Access lists, invite hashes and creator profiles

use super::opcodes::Opcode;
use super::validate;
use super::InstructionEncoder;
use crate::codec::{CodecResult, FieldWriter};
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

/// Add or remove one address on a market's whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistUpdate {
    pub market_id: u64,
    pub user: Pubkey,
    pub creator: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRaceWhitelist {
    pub market_id: u64,
    pub creator: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInviteHash {
    pub market_id: u64,
    /// `None` clears the hash
    pub invite_hash: Option<[u8; 32]>,
    pub creator: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCreatorProfile {
    pub owner: Pubkey,
    pub display_name: String,
    pub default_fee_bps: u16,
}

/// Fields left `None` are unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCreatorProfile {
    pub owner: Pubkey,
    pub display_name: Option<String>,
    pub default_fee_bps: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawCreatorFees {
    pub market_id: u64,
    pub creator: Pubkey,
}

impl InstructionEncoder {
    /// Payload: user pubkey. Accounts: market, whitelist (w), creator (s).
    pub fn add_to_whitelist(&self, p: &WhitelistUpdate) -> CodecResult<Instruction> {
        let market = self.deriver.market(p.market_id)?.address;
        let list = self.deriver.whitelist(p.market_id)?.address;
        self.whitelist_update(Opcode::AddToWhitelist, market, list, p)
    }

    pub fn remove_from_whitelist(&self, p: &WhitelistUpdate) -> CodecResult<Instruction> {
        let market = self.deriver.market(p.market_id)?.address;
        let list = self.deriver.whitelist(p.market_id)?.address;
        self.whitelist_update(Opcode::RemoveFromWhitelist, market, list, p)
    }

    pub fn add_to_race_whitelist(&self, p: &WhitelistUpdate) -> CodecResult<Instruction> {
        let race = self.deriver.race_market(p.market_id)?.address;
        let list = self.deriver.race_whitelist(p.market_id)?.address;
        self.whitelist_update(Opcode::AddToRaceWhitelist, race, list, p)
    }

    pub fn remove_from_race_whitelist(&self, p: &WhitelistUpdate) -> CodecResult<Instruction> {
        let race = self.deriver.race_market(p.market_id)?.address;
        let list = self.deriver.race_whitelist(p.market_id)?.address;
        self.whitelist_update(Opcode::RemoveFromRaceWhitelist, race, list, p)
    }

    /// Accounts: race market, whitelist (w), creator (s, w), system.
    pub fn create_race_whitelist(&self, p: &CreateRaceWhitelist) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .readonly(self.deriver.race_market(p.market_id)?.address)
            .writable(self.deriver.race_whitelist(p.market_id)?.address)
            .signer(p.creator)
            .system_program();
        Ok(self.instruction(Self::bare(Opcode::CreateRaceWhitelist), accounts))
    }

    /// Payload: opt<[u8; 32]>. Accounts: market (w), creator (s).
    pub fn set_invite_hash(&self, p: &SetInviteHash) -> CodecResult<Instruction> {
        let mut w = FieldWriter::with_tag(&Opcode::SetInviteHash.tag());
        w.option(p.invite_hash, |w, h| {
            w.bytes(&h);
        });
        let accounts = self
            .accounts()
            .writable(self.deriver.market(p.market_id)?.address)
            .readonly_signer(p.creator);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: display name, default fee u16.
    /// Accounts: profile (w), owner (s, w), system.
    pub fn create_creator_profile(&self, p: &CreateCreatorProfile) -> CodecResult<Instruction> {
        validate::display_name(&p.display_name)?;
        validate::fee_bps("default_fee_bps", p.default_fee_bps)?;
        let mut w = FieldWriter::with_tag(&Opcode::CreateCreatorProfile.tag());
        w.string(&p.display_name).u16(p.default_fee_bps);
        let accounts = self
            .accounts()
            .writable(self.deriver.creator_profile(&p.owner)?.address)
            .signer(p.owner)
            .system_program();
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Payload: opt<string>, opt<u16>. Accounts: profile (w), owner (s).
    pub fn update_creator_profile(&self, p: &UpdateCreatorProfile) -> CodecResult<Instruction> {
        if let Some(name) = &p.display_name {
            validate::display_name(name)?;
        }
        if let Some(fee) = p.default_fee_bps {
            validate::fee_bps("default_fee_bps", fee)?;
        }
        let mut w = FieldWriter::with_tag(&Opcode::UpdateCreatorProfile.tag());
        w.option(p.display_name.as_deref(), |w, name| {
            w.string(name);
        })
        .option(p.default_fee_bps, |w, fee| {
            w.u16(fee);
        });
        let accounts = self
            .accounts()
            .writable(self.deriver.creator_profile(&p.owner)?.address)
            .readonly_signer(p.owner);
        Ok(self.instruction(w.finish(), accounts))
    }

    /// Accounts: market (w), creator profile (w), creator (s, w).
    pub fn withdraw_creator_fees(&self, p: &WithdrawCreatorFees) -> CodecResult<Instruction> {
        let accounts = self
            .accounts()
            .writable(self.deriver.market(p.market_id)?.address)
            .writable(self.deriver.creator_profile(&p.creator)?.address)
            .signer(p.creator);
        Ok(self.instruction(Self::bare(Opcode::WithdrawCreatorFees), accounts))
    }

    fn whitelist_update(
        &self,
        op: Opcode,
        market: Pubkey,
        list: Pubkey,
        p: &WhitelistUpdate,
    ) -> CodecResult<Instruction> {
        let mut w = FieldWriter::with_tag(&op.tag());
        w.pubkey(&p.user);
        let accounts = self
            .accounts()
            .readonly(market)
            .writable(list)
            .readonly_signer(p.creator);
        Ok(self.instruction(w.finish(), accounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, FieldCursor};
    use crate::types::ProgramContext;

    fn encoder() -> InstructionEncoder {
        InstructionEncoder::new(&ProgramContext::default())
    }

    #[test]
    fn test_whitelist_updates_pick_matching_accounts() {
        let enc = encoder();
        let p = WhitelistUpdate {
            market_id: 8,
            user: Pubkey::new_unique(),
            creator: Pubkey::new_unique(),
        };
        let add = enc.add_to_whitelist(&p).unwrap();
        let race_add = enc.add_to_race_whitelist(&p).unwrap();

        assert_eq!(add.accounts[1].pubkey, enc.deriver().whitelist(8).unwrap().address);
        assert_eq!(
            race_add.accounts[1].pubkey,
            enc.deriver().race_whitelist(8).unwrap().address
        );
        assert_eq!(add.data[8..], p.user.to_bytes());
        assert_ne!(&add.data[..8], &race_add.data[..8]);
    }

    #[test]
    fn test_invite_hash_clear() {
        let p = SetInviteHash {
            market_id: 1,
            invite_hash: None,
            creator: Pubkey::new_unique(),
        };
        let ix = encoder().set_invite_hash(&p).unwrap();
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.data[8], 0);
    }

    #[test]
    fn test_update_profile_partial() {
        let p = UpdateCreatorProfile {
            owner: Pubkey::new_unique(),
            display_name: None,
            default_fee_bps: Some(150),
        };
        let ix = encoder().update_creator_profile(&p).unwrap();
        let mut cur = FieldCursor::new(&ix.data[8..]);
        assert_eq!(cur.read_option(|c| c.read_string()).unwrap(), None);
        assert_eq!(cur.read_option(|c| c.read_u16()).unwrap(), Some(150));
    }

    #[test]
    fn test_profile_fee_cap() {
        let p = CreateCreatorProfile {
            owner: Pubkey::new_unique(),
            display_name: "oracle_labs".to_string(),
            default_fee_bps: 10_001,
        };
        assert!(matches!(
            encoder().create_creator_profile(&p),
            Err(CodecError::ParameterInvalid { field: "default_fee_bps", .. })
        ));
    }
}
