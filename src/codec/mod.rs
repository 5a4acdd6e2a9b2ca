//! Byte-level codec primitives shared by every account decoder and
//! instruction encoder.
//!
//! The on-chain program's layouts are reproduced by hand. All offset logic
//! lives in two types:
//! - [`FieldCursor`]: bounds-checked, little-endian "read and advance"
//! - [`FieldWriter`]: the mirror image used for instruction payloads
//!
//! Wire conventions (identical for reads and writes):
//! - integers are little-endian
//! - addresses are exactly 32 bytes
//! - strings are a `u32` byte length followed by UTF-8 bytes
//! - optionals are a single presence byte (0 = absent, 1 = present) followed
//!   by the value only when present
//! - vectors are a `u32` element count followed by the elements

pub mod cursor;
pub mod errors;
pub mod writer;

pub use cursor::FieldCursor;
pub use errors::CodecError;
pub use writer::FieldWriter;

/// Width of the kind tag / opcode prefix.
pub const TAG_LEN: usize = 8;

/// Width of an address field.
pub const ADDRESS_LEN: usize = 32;

/// Width of the `u32` length prefix on strings and vectors.
pub const LEN_PREFIX: usize = 4;

pub type CodecResult<T> = std::result::Result<T, CodecError>;
