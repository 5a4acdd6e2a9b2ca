//! Referral affiliate records

use super::{AccountKind, AccountRecord};
use crate::codec::{CodecResult, FieldCursor};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Decoded affiliate account.
///
/// Layout after the kind tag: owner pubkey, code string, total_earned u64,
/// total_claimed u64, total_referrals u32, active bool, created_at i64,
/// bump u8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affiliate {
    pub owner: Pubkey,
    pub code: String,
    pub total_earned: u64,
    pub total_claimed: u64,
    pub total_referrals: u32,
    pub active: bool,
    pub created_at: i64,
    pub bump: u8,
}

impl AccountRecord for Affiliate {
    const KIND: AccountKind = AccountKind::Affiliate;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        Ok(Self {
            owner: cur.read_pubkey()?,
            code: cur.read_string()?,
            total_earned: cur.read_u64()?,
            total_claimed: cur.read_u64()?,
            total_referrals: cur.read_u32()?,
            active: cur.read_bool()?,
            created_at: cur.read_i64()?,
            bump: cur.read_u8()?,
        })
    }
}

impl Affiliate {
    /// Earned but not yet withdrawn. Never stored on chain.
    pub fn unclaimed(&self) -> u64 {
        self.total_earned.saturating_sub(self.total_claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::test_utils::fixtures;

    #[test]
    fn test_decode_and_unclaimed() {
        let affiliate = fixtures::sample_affiliate();
        let decoded = Affiliate::decode(&fixtures::encode_affiliate(&affiliate)).unwrap();
        assert_eq!(decoded, affiliate);
        assert_eq!(decoded.unclaimed(), 750_000_000);
    }

    #[test]
    fn test_unclaimed_never_negative() {
        let mut affiliate = fixtures::sample_affiliate();
        affiliate.total_claimed = affiliate.total_earned + 1;
        assert_eq!(affiliate.unclaimed(), 0);
    }

    #[test]
    fn test_code_with_invalid_utf8() {
        let mut bytes = fixtures::encode_affiliate(&fixtures::sample_affiliate());
        // tag (8) + owner (32) + len (4) -> first code byte
        bytes[44] = 0xff;
        assert_eq!(
            Affiliate::decode(&bytes).unwrap_err(),
            CodecError::Utf8Invalid { offset: 44 }
        );
    }
}
