//! Global program configuration record

use super::enums::Layer;
use super::{AccountKind, AccountRecord};
use crate::codec::{CodecResult, FieldCursor};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Decoded global config account.
///
/// Layout after the kind tag: admin, treasury, guardian (pubkeys), fee rates
/// for public/community/private markets (3 × u16), max_creator_fee_bps u16,
/// affiliate_fee_bps u16, creation_fee u64, market_count u64,
/// dispute_bond u64, dispute_window_secs i64, paused bool, bump u8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramConfig {
    pub admin: Pubkey,
    pub treasury: Pubkey,
    pub guardian: Pubkey,
    pub public_fee_bps: u16,
    pub community_fee_bps: u16,
    pub private_fee_bps: u16,
    pub max_creator_fee_bps: u16,
    pub affiliate_fee_bps: u16,
    pub creation_fee: u64,
    /// Next market id; shared by binary and race markets
    pub market_count: u64,
    pub dispute_bond: u64,
    pub dispute_window_secs: i64,
    pub paused: bool,
    pub bump: u8,
}

impl AccountRecord for ProgramConfig {
    const KIND: AccountKind = AccountKind::Config;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        Ok(Self {
            admin: cur.read_pubkey()?,
            treasury: cur.read_pubkey()?,
            guardian: cur.read_pubkey()?,
            public_fee_bps: cur.read_u16()?,
            community_fee_bps: cur.read_u16()?,
            private_fee_bps: cur.read_u16()?,
            max_creator_fee_bps: cur.read_u16()?,
            affiliate_fee_bps: cur.read_u16()?,
            creation_fee: cur.read_u64()?,
            market_count: cur.read_u64()?,
            dispute_bond: cur.read_u64()?,
            dispute_window_secs: cur.read_i64()?,
            paused: cur.read_bool()?,
            bump: cur.read_u8()?,
        })
    }
}

impl ProgramConfig {
    /// Platform fee currently charged for new markets on a layer
    pub fn platform_fee_bps(&self, layer: Layer) -> u16 {
        match layer {
            Layer::Public => self.public_fee_bps,
            Layer::Community => self.community_fee_bps,
            Layer::Private => self.private_fee_bps,
            Layer::Unknown(_) => self.public_fee_bps.max(self.community_fee_bps).max(self.private_fee_bps),
        }
    }

    /// Id the next created market will receive
    pub fn next_market_id(&self) -> u64 {
        self.market_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn test_decode_fixture() {
        let config = fixtures::sample_config();
        assert_eq!(
            ProgramConfig::decode(&fixtures::encode_config(&config)).unwrap(),
            config
        );
    }

    #[test]
    fn test_fee_per_layer() {
        let config = fixtures::sample_config();
        assert_eq!(config.platform_fee_bps(Layer::Public), 250);
        assert_eq!(config.platform_fee_bps(Layer::Private), 200);
        // Unknown layers are quoted at the highest known rate.
        assert_eq!(config.platform_fee_bps(Layer::Unknown(9)), 300);
    }
}
