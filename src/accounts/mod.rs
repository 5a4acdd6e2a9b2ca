//! Typed decoders for every program-owned record
//!
//! Each record kind implements [`AccountRecord`]: the leading kind tag is
//! checked first, then every field is read in layout order. Fixed-size arrays
//! are consumed in full (padding included) and truncated afterwards, and
//! variable-width fields are always read rather than skipped by guesswork,
//! since every later offset depends on them.
//!
//! Decoded records are immutable snapshots. Refreshing a view means fetching
//! the account again and decoding it again.

pub mod affiliate;
pub mod config;
pub mod creator_profile;
pub mod discriminators;
pub mod dispute;
pub mod enums;
pub mod market;
pub mod position;
pub mod race_market;
pub mod whitelist;

pub use affiliate::Affiliate;
pub use config::ProgramConfig;
pub use creator_profile::CreatorProfile;
pub use dispute::DisputeRecord;
pub use enums::{effective_access_gate, AccessGate, Currency, Layer, MarketStatus, ResolutionMode};
pub use market::Market;
pub use position::{RacePosition, UserPosition};
pub use race_market::{RaceMarket, RaceOutcome};
pub use whitelist::Whitelist;

use crate::codec::{CodecResult, FieldCursor};
use serde::Serialize;

/// Record shapes the program stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AccountKind {
    Config,
    Market,
    UserPosition,
    RaceMarket,
    RacePosition,
    Affiliate,
    DisputeMeta,
    CreatorProfile,
    Whitelist,
}

impl AccountKind {
    pub const ALL: [AccountKind; 9] = [
        AccountKind::Config,
        AccountKind::Market,
        AccountKind::UserPosition,
        AccountKind::RaceMarket,
        AccountKind::RacePosition,
        AccountKind::Affiliate,
        AccountKind::DisputeMeta,
        AccountKind::CreatorProfile,
        AccountKind::Whitelist,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AccountKind::Config => "Config",
            AccountKind::Market => "Market",
            AccountKind::UserPosition => "UserPosition",
            AccountKind::RaceMarket => "RaceMarket",
            AccountKind::RacePosition => "RacePosition",
            AccountKind::Affiliate => "Affiliate",
            AccountKind::DisputeMeta => "DisputeMeta",
            AccountKind::CreatorProfile => "CreatorProfile",
            AccountKind::Whitelist => "Whitelist",
        }
    }

    pub fn tag(&self) -> [u8; 8] {
        match self {
            AccountKind::Config => discriminators::CONFIG,
            AccountKind::Market => discriminators::MARKET,
            AccountKind::UserPosition => discriminators::USER_POSITION,
            AccountKind::RaceMarket => discriminators::RACE_MARKET,
            AccountKind::RacePosition => discriminators::RACE_POSITION,
            AccountKind::Affiliate => discriminators::AFFILIATE,
            AccountKind::DisputeMeta => discriminators::DISPUTE_META,
            AccountKind::CreatorProfile => discriminators::CREATOR_PROFILE,
            AccountKind::Whitelist => discriminators::WHITELIST,
        }
    }

    /// Identify a buffer by its leading tag, if it belongs to any known kind
    pub fn identify(data: &[u8]) -> Option<AccountKind> {
        let tag = data.get(..8)?;
        Self::ALL.into_iter().find(|k| k.tag().as_slice() == tag)
    }
}

/// A record shape that can be decoded from raw account bytes
pub trait AccountRecord: Sized {
    const KIND: AccountKind;

    /// Read the fields that follow the kind tag
    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self>;

    /// Check the kind tag, then decode the fields.
    ///
    /// Trailing bytes after the last field are ignored: accounts are often
    /// allocated for the maximum string lengths.
    fn decode(data: &[u8]) -> CodecResult<Self> {
        let mut cur = FieldCursor::new(data);
        cur.expect_tag(Self::KIND.name(), &Self::KIND.tag())?;
        Self::decode_fields(&mut cur)
    }
}

/// Fee rates captured when a market was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeeSnapshot {
    /// Layout version of the snapshot itself
    pub version: u8,
    pub platform_fee_bps: u16,
    pub creator_fee_bps: u16,
    pub affiliate_fee_bps: u16,
}

impl FeeSnapshot {
    /// Serialized width
    pub const LEN: usize = 1 + 2 + 2 + 2;

    pub(crate) fn read(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        Ok(Self {
            version: cur.read_u8()?,
            platform_fee_bps: cur.read_u16()?,
            creator_fee_bps: cur.read_u16()?,
            affiliate_fee_bps: cur.read_u16()?,
        })
    }
}
