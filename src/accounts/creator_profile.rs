//! Market creator profiles

use super::{AccountKind, AccountRecord};
use crate::codec::{CodecResult, FieldCursor};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

pub const MAX_DISPLAY_NAME_LEN: usize = 32;

/// Decoded creator profile.
///
/// Layout after the kind tag: owner pubkey, display_name string,
/// default_fee_bps u16, markets_created u64, total_fees_earned u64,
/// verified bool, created_at i64, bump u8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorProfile {
    pub owner: Pubkey,
    pub display_name: String,
    pub default_fee_bps: u16,
    pub markets_created: u64,
    pub total_fees_earned: u64,
    pub verified: bool,
    pub created_at: i64,
    pub bump: u8,
}

impl AccountRecord for CreatorProfile {
    const KIND: AccountKind = AccountKind::CreatorProfile;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        Ok(Self {
            owner: cur.read_pubkey()?,
            display_name: cur.read_string()?,
            default_fee_bps: cur.read_u16()?,
            markets_created: cur.read_u64()?,
            total_fees_earned: cur.read_u64()?,
            verified: cur.read_bool()?,
            created_at: cur.read_i64()?,
            bump: cur.read_u8()?,
        })
    }
}
