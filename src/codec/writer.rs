//! Payload writer mirroring [`FieldCursor`](super::FieldCursor)

use super::{CodecError, CodecResult, ADDRESS_LEN, TAG_LEN};
use solana_sdk::pubkey::Pubkey;

/// Append-only little-endian writer.
///
/// Writing is infallible apart from fixed-width labels; encoders validate
/// every parameter before the first call so a writer never holds a partially
/// valid payload.
#[derive(Debug, Default, Clone)]
pub struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a payload with its 8-byte opcode or kind tag
    pub fn with_tag(tag: &[u8; TAG_LEN]) -> Self {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(tag);
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.u8(v as u8)
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn pubkey(&mut self, v: &Pubkey) -> &mut Self {
        self.bytes(v.as_ref())
    }

    /// `u32` byte length followed by the UTF-8 bytes
    pub fn string(&mut self, v: &str) -> &mut Self {
        self.u32(v.len() as u32).bytes(v.as_bytes())
    }

    /// Fixed-width UTF-8 field, zero padded.
    ///
    /// Values longer than `N` or holding a NUL byte cannot be read back
    /// intact and are rejected.
    pub fn padded_str<const N: usize>(&mut self, v: &str) -> CodecResult<&mut Self> {
        if v.len() > N {
            return Err(CodecError::invalid(
                "label",
                format!("{} bytes exceeds the {}-byte field", v.len(), N),
            ));
        }
        if v.as_bytes().contains(&0) {
            return Err(CodecError::invalid("label", "contains a NUL byte"));
        }
        let mut field = [0u8; N];
        field[..v.len()].copy_from_slice(v.as_bytes());
        Ok(self.bytes(&field))
    }

    /// Presence byte, then the value only when present
    pub fn option<T>(&mut self, v: Option<T>, write: impl FnOnce(&mut Self, T)) -> &mut Self {
        match v {
            Some(inner) => {
                self.u8(1);
                write(self, inner);
            }
            None => {
                self.u8(0);
            }
        }
        self
    }

    /// `u32` element count, then each element
    pub fn vec<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) -> &mut Self {
        self.u32(items.len() as u32);
        for item in items {
            write(self, item);
        }
        self
    }

    pub fn pubkeys(&mut self, keys: &[Pubkey]) -> &mut Self {
        self.buf.reserve(4 + keys.len() * ADDRESS_LEN);
        self.vec(keys, |w, k| {
            w.pubkey(k);
        })
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldCursor;

    #[test]
    fn test_writer_matches_cursor_conventions() {
        let key = Pubkey::new_unique();
        let mut w = FieldWriter::with_tag(&[7u8; 8]);
        w.u64(42)
            .string("Will it rain?")
            .option(Some(true), |w, v| {
                w.bool(v);
            })
            .option(None::<u64>, |w, v| {
                w.u64(v);
            })
            .pubkeys(&[key, key]);
        let bytes = w.finish();

        let mut cur = FieldCursor::new(&bytes);
        cur.expect_tag("Test", &[7u8; 8]).unwrap();
        assert_eq!(cur.read_u64().unwrap(), 42);
        assert_eq!(cur.read_string().unwrap(), "Will it rain?");
        assert_eq!(cur.read_option(|c| c.read_bool()).unwrap(), Some(true));
        assert_eq!(cur.read_option(|c| c.read_u64()).unwrap(), None);
        assert_eq!(cur.read_vec(32, |c| c.read_pubkey()).unwrap(), vec![key, key]);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn test_padded_str_width() {
        let mut w = FieldWriter::new();
        w.padded_str::<32>("Red").unwrap();
        let bytes = w.finish();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..3], b"Red");
        assert!(bytes[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_padded_str_rejects_lossy_values() {
        let mut w = FieldWriter::new();
        w.padded_str::<4>("Blue").unwrap();
        assert!(w.padded_str::<4>("Green").is_err());
        assert!(w.padded_str::<8>("Re\0d").is_err());
        // Rejected values write nothing.
        assert_eq!(w.finish(), b"Blue".to_vec());
    }
}
