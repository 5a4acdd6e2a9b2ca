//! Outcome disputes raised against a proposed resolution

use super::{AccountKind, AccountRecord};
use crate::codec::{CodecResult, FieldCursor};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Longest dispute reason the program accepts, in bytes
pub const MAX_REASON_LEN: usize = 500;

/// Decoded dispute account.
///
/// Layout after the kind tag: market pubkey, disputer pubkey, reason string,
/// proposed_outcome opt<bool>, bond u64, created_at i64, deadline i64,
/// resolved bool, bump u8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisputeRecord {
    pub market: Pubkey,
    pub disputer: Pubkey,
    pub reason: String,
    pub proposed_outcome: Option<bool>,
    pub bond: u64,
    pub created_at: i64,
    pub deadline: i64,
    pub resolved: bool,
    pub bump: u8,
}

impl AccountRecord for DisputeRecord {
    const KIND: AccountKind = AccountKind::DisputeMeta;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        Ok(Self {
            market: cur.read_pubkey()?,
            disputer: cur.read_pubkey()?,
            reason: cur.read_string()?,
            proposed_outcome: cur.read_option(|c| c.read_bool())?,
            bond: cur.read_u64()?,
            created_at: cur.read_i64()?,
            deadline: cur.read_i64()?,
            resolved: cur.read_bool()?,
            bump: cur.read_u8()?,
        })
    }
}

impl DisputeRecord {
    /// Still open for council/admin review at `now`
    pub fn is_open(&self, now: i64) -> bool {
        !self.resolved && now < self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn test_decode_fixture() {
        let dispute = fixtures::sample_dispute();
        assert_eq!(
            DisputeRecord::decode(&fixtures::encode_dispute(&dispute)).unwrap(),
            dispute
        );
    }

    #[test]
    fn test_absent_proposed_outcome_shifts_by_one_byte() {
        let mut dispute = fixtures::sample_dispute();
        let present = fixtures::encode_dispute(&dispute);
        dispute.proposed_outcome = None;
        let absent = fixtures::encode_dispute(&dispute);
        assert_eq!(absent.len(), present.len() - 1);
        assert_eq!(DisputeRecord::decode(&absent).unwrap(), dispute);
    }

    #[test]
    fn test_is_open() {
        let dispute = fixtures::sample_dispute();
        assert!(dispute.is_open(dispute.deadline - 1));
        assert!(!dispute.is_open(dispute.deadline));
    }
}
