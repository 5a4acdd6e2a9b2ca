//! Bettor positions on binary and race markets

use super::race_market::MAX_OUTCOMES;
use super::{AccountKind, AccountRecord};
use crate::codec::{CodecResult, FieldCursor};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Stake held by one owner in one binary market.
///
/// Layout after the kind tag: owner pubkey, market_id u64, yes_amount u64,
/// no_amount u64, claimed bool, bump u8, affiliate_fee_paid u64,
/// referred_by opt<pubkey>.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPosition {
    pub owner: Pubkey,
    pub market_id: u64,
    pub yes_amount: u64,
    pub no_amount: u64,
    pub claimed: bool,
    pub bump: u8,
    pub affiliate_fee_paid: u64,
    pub referred_by: Option<Pubkey>,
}

impl AccountRecord for UserPosition {
    const KIND: AccountKind = AccountKind::UserPosition;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        Ok(Self {
            owner: cur.read_pubkey()?,
            market_id: cur.read_u64()?,
            yes_amount: cur.read_u64()?,
            no_amount: cur.read_u64()?,
            claimed: cur.read_bool()?,
            bump: cur.read_u8()?,
            affiliate_fee_paid: cur.read_u64()?,
            referred_by: cur.read_option(|c| c.read_pubkey())?,
        })
    }
}

impl UserPosition {
    pub fn total_staked(&self) -> u64 {
        self.yes_amount.saturating_add(self.no_amount)
    }

    pub fn amount_on(&self, outcome: bool) -> u64 {
        if outcome {
            self.yes_amount
        } else {
            self.no_amount
        }
    }
}

/// Stake held by one owner across the outcomes of a race market.
///
/// Layout after the kind tag: owner pubkey, market_id u64, race_market
/// pubkey, bets [u64; 10], total_bet u64, claimed bool, bump u8,
/// referred_by opt<pubkey>.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RacePosition {
    pub owner: Pubkey,
    pub market_id: u64,
    pub race_market: Pubkey,
    /// One entry per outcome slot; slots beyond the market's outcome count
    /// are always zero
    pub bets: [u64; MAX_OUTCOMES],
    pub total_bet: u64,
    pub claimed: bool,
    pub bump: u8,
    pub referred_by: Option<Pubkey>,
}

impl AccountRecord for RacePosition {
    const KIND: AccountKind = AccountKind::RacePosition;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        let owner = cur.read_pubkey()?;
        let market_id = cur.read_u64()?;
        let race_market = cur.read_pubkey()?;
        let mut bets = [0u64; MAX_OUTCOMES];
        for bet in bets.iter_mut() {
            *bet = cur.read_u64()?;
        }
        Ok(Self {
            owner,
            market_id,
            race_market,
            bets,
            total_bet: cur.read_u64()?,
            claimed: cur.read_bool()?,
            bump: cur.read_u8()?,
            referred_by: cur.read_option(|c| c.read_pubkey())?,
        })
    }
}

impl RacePosition {
    /// Outcomes with a non-zero stake, as (index, amount)
    pub fn active_bets(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.bets
            .iter()
            .enumerate()
            .filter(|(_, amount)| **amount > 0)
            .map(|(i, amount)| (i as u8, *amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::test_utils::fixtures;

    #[test]
    fn test_user_position_fixture() {
        let position = fixtures::sample_user_position();
        let bytes = fixtures::encode_user_position(&position);
        assert_eq!(UserPosition::decode(&bytes).unwrap(), position);
        assert_eq!(position.total_staked(), position.yes_amount + position.no_amount);
    }

    #[test]
    fn test_absent_referrer_does_not_read_value_bytes() {
        let mut position = fixtures::sample_user_position();
        let present = fixtures::encode_user_position(&position);

        position.referred_by = None;
        let absent = fixtures::encode_user_position(&position);
        // The absent fixture ends at the presence byte.
        assert_eq!(absent.len(), present.len() - 32);
        assert_eq!(*absent.last().unwrap(), 0);
        assert_eq!(UserPosition::decode(&absent).unwrap().referred_by, None);

        // A present flag with a missing value must not decode.
        let mut broken = absent.clone();
        *broken.last_mut().unwrap() = 1;
        assert!(matches!(
            UserPosition::decode(&broken),
            Err(CodecError::BufferUnderrun { needed: 32, .. })
        ));
    }

    #[test]
    fn test_race_position_fixture() {
        let position = fixtures::sample_race_position();
        let bytes = fixtures::encode_race_position(&position);
        let decoded = RacePosition::decode(&bytes).unwrap();
        assert_eq!(decoded, position);
        let active: Vec<_> = decoded.active_bets().collect();
        assert_eq!(active, vec![(0, 2_000_000_000), (2, 500_000_000)]);
    }

    #[test]
    fn test_position_kinds_not_interchangeable() {
        let bytes = fixtures::encode_race_position(&fixtures::sample_race_position());
        assert!(matches!(
            UserPosition::decode(&bytes),
            Err(CodecError::KindMismatch { .. })
        ));
    }
}
