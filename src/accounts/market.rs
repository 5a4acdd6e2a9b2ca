//! Binary (yes/no) pari-mutuel market

use super::enums::{effective_access_gate, AccessGate, Currency, Layer, MarketStatus, ResolutionMode};
use super::{AccountKind, AccountRecord, FeeSnapshot};
use crate::codec::{CodecResult, FieldCursor};
use crate::pda::AddressDeriver;
use chrono::{DateTime, Utc};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Council seats reserved in every market, used or not
pub const COUNCIL_SLOTS: usize = 5;

/// Longest question the program accepts, in bytes
pub const MAX_QUESTION_LEN: usize = 200;

/// Decoded market account.
///
/// Layout after the kind tag:
///
/// | field                   | width            |
/// |-------------------------|------------------|
/// | market_id               | u64              |
/// | question                | u32 len + bytes  |
/// | closing_time            | i64              |
/// | resolution_time         | i64              |
/// | yes_pool, no_pool       | u64, u64         |
/// | snapshot_yes/no_pool    | u64, u64         |
/// | status                  | u8               |
/// | winning_outcome         | opt<bool>        |
/// | currency                | u8               |
/// | platform/creator fees   | u64, u64         |
/// | total_claimed           | u64              |
/// | layer, access_gate      | u8, u8           |
/// | resolution_mode         | u8               |
/// | creator                 | pubkey           |
/// | oracle                  | opt<pubkey>      |
/// | council                 | 5 × pubkey       |
/// | council size/yes/no/thr | 4 × u8           |
/// | invite_hash             | opt<[u8; 32]>    |
/// | dispute_deadline        | i64              |
/// | fee_snapshot            | u8, 3 × u16      |
/// | bump                    | u8               |
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Market {
    pub market_id: u64,
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub yes_pool: u64,
    pub no_pool: u64,
    /// Pools frozen at close, used for payouts
    pub snapshot_yes_pool: u64,
    pub snapshot_no_pool: u64,
    pub status: MarketStatus,
    pub winning_outcome: Option<bool>,
    pub currency: Currency,
    pub platform_fee_collected: u64,
    pub creator_fee_collected: u64,
    pub total_claimed: u64,
    pub layer: Layer,
    /// Raw stored gate; see [`Market::effective_access_gate`]
    pub access_gate: AccessGate,
    pub resolution_mode: ResolutionMode,
    pub creator: Pubkey,
    pub oracle: Option<Pubkey>,
    /// Active council members only (the first `council_size` seats)
    pub council: Vec<Pubkey>,
    pub council_votes_yes: u8,
    pub council_votes_no: u8,
    pub council_threshold: u8,
    pub invite_hash: Option<[u8; 32]>,
    pub dispute_deadline: i64,
    pub fee_snapshot: FeeSnapshot,
    pub bump: u8,
}

impl AccountRecord for Market {
    const KIND: AccountKind = AccountKind::Market;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        let market_id = cur.read_u64()?;
        let question = cur.read_string()?;
        let closing_time = cur.read_i64()?;
        let resolution_time = cur.read_i64()?;
        let yes_pool = cur.read_u64()?;
        let no_pool = cur.read_u64()?;
        let snapshot_yes_pool = cur.read_u64()?;
        let snapshot_no_pool = cur.read_u64()?;
        let status = MarketStatus::from_u8(cur.read_u8()?);
        let winning_outcome = cur.read_option(|c| c.read_bool())?;
        let currency = Currency::from_u8(cur.read_u8()?);
        let platform_fee_collected = cur.read_u64()?;
        let creator_fee_collected = cur.read_u64()?;
        let total_claimed = cur.read_u64()?;
        let layer = Layer::from_u8(cur.read_u8()?);
        let access_gate = AccessGate::from_u8(cur.read_u8()?);
        let resolution_mode = ResolutionMode::from_u8(cur.read_u8()?);
        let creator = cur.read_pubkey()?;
        let oracle = cur.read_option(|c| c.read_pubkey())?;

        // All five seats are consumed before truncating to the active count.
        let mut seats = [Pubkey::default(); COUNCIL_SLOTS];
        for seat in seats.iter_mut() {
            *seat = cur.read_pubkey()?;
        }
        let council_size = cur.read_count("council_size", COUNCIL_SLOTS)?;
        let council_votes_yes = cur.read_u8()?;
        let council_votes_no = cur.read_u8()?;
        let council_threshold = cur.read_u8()?;
        let council = seats[..council_size].to_vec();

        let invite_hash = cur.read_option(|c| c.read_array::<32>())?;
        let dispute_deadline = cur.read_i64()?;
        let fee_snapshot = FeeSnapshot::read(cur)?;
        let bump = cur.read_u8()?;

        Ok(Self {
            market_id,
            question,
            closing_time,
            resolution_time,
            yes_pool,
            no_pool,
            snapshot_yes_pool,
            snapshot_no_pool,
            status,
            winning_outcome,
            currency,
            platform_fee_collected,
            creator_fee_collected,
            total_claimed,
            layer,
            access_gate,
            resolution_mode,
            creator,
            oracle,
            council,
            council_votes_yes,
            council_votes_no,
            council_threshold,
            invite_hash,
            dispute_deadline,
            fee_snapshot,
            bump,
        })
    }
}

impl Market {
    pub fn total_pool(&self) -> u64 {
        self.yes_pool.saturating_add(self.no_pool)
    }

    /// Gate actually enforced by the program for this market's layer
    pub fn effective_access_gate(&self) -> AccessGate {
        effective_access_gate(self.layer, self.access_gate)
    }

    /// Whitelist account a bet must reference, if the market is gated by one
    pub fn whitelist_account(&self, deriver: &AddressDeriver) -> CodecResult<Option<Pubkey>> {
        match self.effective_access_gate() {
            AccessGate::Whitelist => Ok(Some(deriver.whitelist(self.market_id)?.address)),
            _ => Ok(None),
        }
    }

    pub fn closing_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.closing_time, 0)
    }

    pub fn resolution_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.resolution_time, 0)
    }

    pub fn is_council_member(&self, key: &Pubkey) -> bool {
        self.council.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::test_utils::fixtures;
    use crate::types::ProgramContext;

    #[test]
    fn test_decode_reference_fixture() {
        let market = fixtures::sample_market();
        let bytes = fixtures::encode_market(&market);
        assert_eq!(Market::decode(&bytes).unwrap(), market);
    }

    #[test]
    fn test_trailing_allocation_is_ignored() {
        let market = fixtures::sample_market();
        let mut bytes = fixtures::encode_market(&market);
        bytes.extend_from_slice(&[0u8; 64]);
        assert_eq!(Market::decode(&bytes).unwrap(), market);
    }

    #[test]
    fn test_council_truncated_after_full_read() {
        let mut market = fixtures::sample_market();
        market.council.truncate(2);
        let bytes = fixtures::encode_market(&market);
        let decoded = Market::decode(&bytes).unwrap();
        assert_eq!(decoded.council.len(), 2);
        // Fields after the council array still line up.
        assert_eq!(decoded.fee_snapshot, market.fee_snapshot);
        assert_eq!(decoded.bump, market.bump);
    }

    #[test]
    fn test_council_size_above_seat_count_rejected() {
        let market = fixtures::sample_market();
        let mut bytes = fixtures::encode_market(&market);
        // council_size, three vote bytes, invite hash, deadline, fee snapshot, bump
        let at = bytes.len() - (1 + 3 + 33 + 8 + 7 + 1);
        assert_eq!(bytes[at], 3);

        bytes[at] = 5;
        assert_eq!(Market::decode(&bytes).unwrap().council.len(), 5);

        bytes[at] = 6;
        let err = Market::decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidCount {
                field: "council_size",
                offset: at,
                count: 6,
                max: COUNCIL_SLOTS,
            }
        );
        assert!(err.is_absent());
    }

    #[test]
    fn test_every_single_byte_truncation_underruns() {
        let bytes = fixtures::encode_market(&fixtures::sample_market());
        for len in 0..bytes.len() {
            let err = Market::decode(&bytes[..len]).unwrap_err();
            assert!(
                matches!(err, CodecError::BufferUnderrun { .. }),
                "truncation to {} bytes produced {:?}",
                len,
                err
            );
        }
    }

    #[test]
    fn test_other_kind_rejected() {
        let position = fixtures::encode_user_position(&fixtures::sample_user_position());
        assert!(matches!(
            Market::decode(&position),
            Err(CodecError::KindMismatch { expected: "Market", .. })
        ));
    }

    #[test]
    fn test_whitelist_only_for_private_markets() {
        let deriver = AddressDeriver::new(&ProgramContext::default());
        let mut market = fixtures::sample_market();
        market.access_gate = AccessGate::Whitelist;

        market.layer = Layer::Community;
        assert_eq!(market.whitelist_account(&deriver).unwrap(), None);

        market.layer = Layer::Private;
        assert_eq!(
            market.whitelist_account(&deriver).unwrap(),
            Some(deriver.whitelist(market.market_id).unwrap().address)
        );
    }

    #[test]
    fn test_timestamps() {
        let market = fixtures::sample_market();
        assert_eq!(market.closing_at().unwrap().timestamp(), market.closing_time);
    }
}
