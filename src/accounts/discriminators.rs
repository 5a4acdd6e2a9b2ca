//! Kind tags assigned by the program to each record shape
//!
//! Each tag is the first 8 bytes of `sha256("account:<Name>")`.

pub const CONFIG: [u8; 8] = [0x9b, 0x0c, 0xaa, 0xe0, 0x1e, 0xfa, 0xcc, 0x82];
pub const MARKET: [u8; 8] = [0xdb, 0xbe, 0xd5, 0x37, 0x00, 0xe3, 0xc6, 0x9a];
pub const USER_POSITION: [u8; 8] = [0xfb, 0xf8, 0xd1, 0xf5, 0x53, 0xea, 0x11, 0x1b];
pub const RACE_MARKET: [u8; 8] = [0xeb, 0xc4, 0x6f, 0x4b, 0xe6, 0x71, 0x76, 0xee];
pub const RACE_POSITION: [u8; 8] = [0x2c, 0xb6, 0x10, 0x01, 0xe6, 0x0e, 0xae, 0x2e];
pub const AFFILIATE: [u8; 8] = [0x88, 0x5f, 0x6b, 0x95, 0x24, 0xc3, 0x92, 0x23];
pub const DISPUTE_META: [u8; 8] = [0xac, 0x6e, 0xbe, 0x4e, 0xad, 0x39, 0xfe, 0xe5];
pub const CREATOR_PROFILE: [u8; 8] = [0xfb, 0xfa, 0xb8, 0x6f, 0xd6, 0xb2, 0x20, 0xdd];
pub const WHITELIST: [u8; 8] = [0xcc, 0xb0, 0x34, 0x4f, 0x92, 0x79, 0x36, 0xf7];

/// Compute the tag for an account name at runtime
pub fn account_tag(name: &str) -> [u8; 8] {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(format!("account:{}", name).as_bytes());
    let mut tag = [0u8; 8];
    tag.copy_from_slice(&digest[..8]);
    tag
}
