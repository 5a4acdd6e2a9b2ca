//! Access lists for private markets

use super::{AccountKind, AccountRecord};
use crate::codec::{CodecResult, FieldCursor, ADDRESS_LEN};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Decoded whitelist (shared by binary and race markets).
///
/// Layout after the kind tag: market_id u64, addresses vec<pubkey>, bump u8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Whitelist {
    pub market_id: u64,
    pub addresses: Vec<Pubkey>,
    pub bump: u8,
}

impl AccountRecord for Whitelist {
    const KIND: AccountKind = AccountKind::Whitelist;

    fn decode_fields(cur: &mut FieldCursor<'_>) -> CodecResult<Self> {
        Ok(Self {
            market_id: cur.read_u64()?,
            addresses: cur.read_vec(ADDRESS_LEN, |c| c.read_pubkey())?,
            bump: cur.read_u8()?,
        })
    }
}

impl Whitelist {
    pub fn contains(&self, key: &Pubkey) -> bool {
        self.addresses.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::test_utils::fixtures;

    #[test]
    fn test_decode_fixture() {
        let list = fixtures::sample_whitelist();
        let decoded = Whitelist::decode(&fixtures::encode_whitelist(&list)).unwrap();
        assert_eq!(decoded, list);
        assert!(decoded.contains(&list.addresses[1]));
        assert!(!decoded.contains(&Pubkey::new_unique()));
    }

    #[test]
    fn test_count_larger_than_buffer() {
        let mut bytes = fixtures::encode_whitelist(&fixtures::sample_whitelist());
        // tag (8) + market_id (8) -> count
        bytes[16..20].copy_from_slice(&1_000u32.to_le_bytes());
        assert!(matches!(
            Whitelist::decode(&bytes),
            Err(CodecError::BufferUnderrun { .. })
        ));
    }
}
