//! Multi-outcome ("race") market with up to ten outcomes

use super::enums::{effective_access_gate, AccessGate, Currency, Layer, MarketStatus, ResolutionMode};
use super::{AccountKind, AccountRecord, FeeSnapshot};
use crate::codec::{CodecResult, FieldCursor, ADDRESS_LEN, LEN_PREFIX, TAG_LEN};
use crate::pda::AddressDeriver;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Outcome slots reserved in every race market
pub const MAX_OUTCOMES: usize = 10;

/// Width of each zero-padded outcome label
pub const LABEL_LEN: usize = 32;

/// Width of one (label, pool) slot
pub const OUTCOME_SLOT_LEN: usize = LABEL_LEN + 8;

/// Smallest possible encoded race market: empty question, every optional
/// absent.
///
/// Only used as a cheap pre-filter when scanning program accounts. It is
/// derived from the current layout, not published by the program, and a
/// future layout may change it.
pub const MIN_RACE_MARKET_LEN: usize = TAG_LEN
    + 8 // market_id
    + LEN_PREFIX // empty question
    + 8 + 8 // closing/resolution time
    + ADDRESS_LEN // creator
    + 1 // outcome_count
    + MAX_OUTCOMES * OUTCOME_SLOT_LEN
    + 8 // total_pool
    + 1 // status
    + 1 // winning_outcome (absent)
    + 1 // currency
    + 8 * 3 // fee/claim counters
    + 3 // layer, access_gate, resolution_mode
    + 1 // oracle (absent)
    + FeeSnapshot::LEN
    + 1; // bump

/// One active outcome of a race market
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceOutcome {
    pub index: u8,
    pub label: String,
    pub pool: u64,
}

/// Decoded race market account.
///
/// Layout after the kind tag: market_id u64, question string, closing_time
/// i64, resolution_time i64, creator pubkey, outcome_count u8, ten
/// `(label [u8; 32], pool u64)` slots, total_pool u64, status u8,
/// winning_outcome opt<u8>, currency u8, platform/creator fee counters,
/// total_claimed u64, layer u8, access_gate u8, resolution_mode u8, oracle
/// opt<pubkey>, fee snapshot, bump u8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceMarket {
    pub market_id: u64,
    pub question: String,
    pub closing_time: i64,
    pub resolution_time: i64,
    pub creator: Pubkey,
    /// Active outcomes only; padding slots are never exposed
    pub outcomes: Vec<RaceOutcome>,
    pub total_pool: u64,
    pub status: MarketStatus,
    pub winning_outcome: Option<u8>,
    pub currency: Currency,
    pub platform_fee_collected: u64,
    pub creator_fee_collected: u64,
    pub total_claimed: u64,
    pub layer: Layer,
    pub access_gate: AccessGate,
    pub resolution_mode: ResolutionMode,
    pub oracle: Option<Pubkey>,
    pub fee_snapshot: FeeSnapshot,
    pub bump: u8,
}

impl AccountRecord for RaceMarket {
    const KIND: AccountKind = AccountKind::RaceMarket;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        let market_id = cur.read_u64()?;
        let question = cur.read_string()?;
        let closing_time = cur.read_i64()?;
        let resolution_time = cur.read_i64()?;
        let creator = cur.read_pubkey()?;
        let active = cur.read_count("outcome_count", MAX_OUTCOMES)?;

        // Read every slot, padding included, before truncating. Labels in
        // padding slots may hold garbage, so they are skipped, not parsed.
        let mut outcomes = Vec::with_capacity(active);
        for index in 0..MAX_OUTCOMES {
            if index < active {
                let label = cur.read_padded_str::<LABEL_LEN>()?;
                let pool = cur.read_u64()?;
                outcomes.push(RaceOutcome {
                    index: index as u8,
                    label,
                    pool,
                });
            } else {
                cur.skip(OUTCOME_SLOT_LEN)?;
            }
        }

        let total_pool = cur.read_u64()?;
        let status = MarketStatus::from_u8(cur.read_u8()?);
        let winning_outcome = cur.read_option(|c| c.read_u8())?;
        let currency = Currency::from_u8(cur.read_u8()?);
        let platform_fee_collected = cur.read_u64()?;
        let creator_fee_collected = cur.read_u64()?;
        let total_claimed = cur.read_u64()?;
        let layer = Layer::from_u8(cur.read_u8()?);
        let access_gate = AccessGate::from_u8(cur.read_u8()?);
        let resolution_mode = ResolutionMode::from_u8(cur.read_u8()?);
        let oracle = cur.read_option(|c| c.read_pubkey())?;
        let fee_snapshot = FeeSnapshot::read(cur)?;
        let bump = cur.read_u8()?;

        Ok(Self {
            market_id,
            question,
            closing_time,
            resolution_time,
            creator,
            outcomes,
            total_pool,
            status,
            winning_outcome,
            currency,
            platform_fee_collected,
            creator_fee_collected,
            total_claimed,
            layer,
            access_gate,
            resolution_mode,
            oracle,
            fee_snapshot,
            bump,
        })
    }
}

impl RaceMarket {
    /// Best-effort size filter for program-account scans
    pub fn plausible_len(len: usize) -> bool {
        len >= MIN_RACE_MARKET_LEN
    }

    pub fn outcome(&self, index: u8) -> Option<&RaceOutcome> {
        self.outcomes.get(index as usize)
    }

    pub fn pools(&self) -> Vec<u64> {
        self.outcomes.iter().map(|o| o.pool).collect()
    }

    pub fn effective_access_gate(&self) -> AccessGate {
        effective_access_gate(self.layer, self.access_gate)
    }

    pub fn whitelist_account(&self, deriver: &AddressDeriver) -> CodecResult<Option<Pubkey>> {
        match self.effective_access_gate() {
            AccessGate::Whitelist => Ok(Some(deriver.race_whitelist(self.market_id)?.address)),
            _ => Ok(None),
        }
    }
}
