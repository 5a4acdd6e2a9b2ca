//! Bounds-checked field reader over an account buffer

use super::{CodecError, CodecResult, ADDRESS_LEN, LEN_PREFIX, TAG_LEN};
use solana_sdk::pubkey::Pubkey;

/// Stateful "read and advance" cursor over a borrowed byte buffer.
///
/// Every read either consumes exactly the field's width or fails with
/// [`CodecError::BufferUnderrun`] without moving. The source buffer is never
/// mutated, and there is no recovery: the first failing field aborts the
/// decode of the whole account.
#[derive(Debug, Clone)]
pub struct FieldCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Take the next `n` bytes and advance
    pub fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::BufferUnderrun {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Advance over a field the caller does not need
    pub fn skip(&mut self, n: usize) -> CodecResult<()> {
        self.take(n).map(|_| ())
    }

    pub fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i8(&mut self) -> CodecResult<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> CodecResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> CodecResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> CodecResult<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_pubkey(&mut self) -> CodecResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.read_array::<ADDRESS_LEN>()?))
    }

    /// Read a one-byte count that must fit `max` fixed slots
    pub fn read_count(&mut self, field: &'static str, max: usize) -> CodecResult<usize> {
        let offset = self.pos;
        let count = self.read_u8()?;
        if count as usize > max {
            return Err(CodecError::InvalidCount {
                field,
                offset,
                count,
                max,
            });
        }
        Ok(count as usize)
    }

    /// Check the leading kind tag against the expected constant
    pub fn expect_tag(&mut self, kind: &'static str, expected: &[u8; TAG_LEN]) -> CodecResult<()> {
        let found: [u8; TAG_LEN] = self.read_array()?;
        if &found != expected {
            return Err(CodecError::KindMismatch {
                expected: kind,
                expected_tag: *expected,
                found,
            });
        }
        Ok(())
    }

    /// Read a `u32` length prefix followed by that many UTF-8 bytes.
    ///
    /// The length is checked against the remaining buffer before anything is
    /// allocated, so a corrupt prefix cannot trigger a huge allocation.
    pub fn read_string(&mut self) -> CodecResult<String> {
        let len = self.read_u32()? as usize;
        let start = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::Utf8Invalid { offset: start })
    }

    /// Read a fixed-width, zero-padded UTF-8 field and trim the padding
    pub fn read_padded_str<const N: usize>(&mut self) -> CodecResult<String> {
        let start = self.pos;
        let bytes = self.take(N)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(N);
        std::str::from_utf8(&bytes[..end])
            .map(str::to_owned)
            .map_err(|_| CodecError::Utf8Invalid { offset: start })
    }

    /// Read a tagged optional. The value is only read when the presence byte
    /// is set; an absent optional consumes exactly one byte.
    pub fn read_option<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<Option<T>> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(None),
            1 => read(self).map(Some),
            tag => Err(CodecError::InvalidOptionTag { offset, tag }),
        }
    }

    /// Read a `u32` element count followed by fixed-width elements.
    pub fn read_vec<T>(
        &mut self,
        elem_width: usize,
        mut read: impl FnMut(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<Vec<T>> {
        let count = self.read_u32()? as usize;
        let needed = count.saturating_mul(elem_width);
        if needed > self.remaining() {
            return Err(CodecError::BufferUnderrun {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }

    /// Skip a length-prefixed string without validating its contents
    pub fn skip_string(&mut self) -> CodecResult<()> {
        let len = self.read_u32()? as usize;
        self.skip(len)
    }
}

/// Width of a serialized string with `len` content bytes
pub const fn string_width(len: usize) -> usize {
    LEN_PREFIX + len
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reads_little_endian() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xff, 0xff];
        let mut cur = FieldCursor::new(&buf);
        assert_eq!(cur.read_u16().unwrap(), 0x0201);
        assert_eq!(cur.read_u32().unwrap(), 0x0605_0403);
        assert_eq!(cur.read_u16().unwrap(), 0x0807);
        assert_eq!(cur.read_u16().unwrap(), 0xffff);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn test_signed_read() {
        let buf = (-42i64).to_le_bytes();
        let mut cur = FieldCursor::new(&buf);
        assert_eq!(cur.read_i64().unwrap(), -42);
    }

    #[test]
    fn test_underrun_does_not_advance() {
        let buf = [1u8, 2, 3];
        let mut cur = FieldCursor::new(&buf);
        cur.read_u8().unwrap();
        let err = cur.read_u32().unwrap_err();
        assert_eq!(
            err,
            CodecError::BufferUnderrun {
                offset: 1,
                needed: 4,
                remaining: 2
            }
        );
        assert_eq!(cur.position(), 1);
    }

    #[test]
    fn test_string_roundtrip_and_utf8_rejection() {
        let mut buf = 5u32.to_le_bytes().to_vec();
        buf.extend_from_slice(b"hello");
        let mut cur = FieldCursor::new(&buf);
        assert_eq!(cur.read_string().unwrap(), "hello");

        let mut bad = 2u32.to_le_bytes().to_vec();
        bad.extend_from_slice(&[0xc3, 0x28]);
        let mut cur = FieldCursor::new(&bad);
        assert_eq!(
            cur.read_string().unwrap_err(),
            CodecError::Utf8Invalid { offset: 4 }
        );
    }

    #[test]
    fn test_string_length_prefix_larger_than_buffer() {
        let mut buf = u32::MAX.to_le_bytes().to_vec();
        buf.extend_from_slice(b"abc");
        let mut cur = FieldCursor::new(&buf);
        assert!(matches!(
            cur.read_string(),
            Err(CodecError::BufferUnderrun { offset: 4, .. })
        ));
    }

    #[test]
    fn test_absent_option_reads_one_byte() {
        // Presence byte only: the value bytes are not there at all.
        let buf = [0u8];
        let mut cur = FieldCursor::new(&buf);
        assert_eq!(cur.read_option(|c| c.read_u64()).unwrap(), None);
        assert_eq!(cur.position(), 1);

        let mut present = vec![1u8];
        present.extend_from_slice(&7u64.to_le_bytes());
        let mut cur = FieldCursor::new(&present);
        assert_eq!(cur.read_option(|c| c.read_u64()).unwrap(), Some(7));
    }

    #[test]
    fn test_option_tag_out_of_range() {
        let buf = [2u8, 0, 0];
        let mut cur = FieldCursor::new(&buf);
        assert_eq!(
            cur.read_option(|c| c.read_u8()).unwrap_err(),
            CodecError::InvalidOptionTag { offset: 0, tag: 2 }
        );
    }

    #[test]
    fn test_padded_str_trims_zeroes() {
        let mut buf = [0u8; 32];
        buf[..3].copy_from_slice(b"Yes");
        let mut cur = FieldCursor::new(&buf);
        assert_eq!(cur.read_padded_str::<32>().unwrap(), "Yes");
        assert_eq!(cur.position(), 32);
    }

    #[test]
    fn test_vec_count_checked_before_allocation() {
        let buf = 1_000_000u32.to_le_bytes();
        let mut cur = FieldCursor::new(&buf);
        assert!(matches!(
            cur.read_vec(32, |c| c.read_pubkey()),
            Err(CodecError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_expect_tag_mismatch() {
        let buf = [9u8; 8];
        let mut cur = FieldCursor::new(&buf);
        let err = cur.expect_tag("Market", &[1u8; 8]).unwrap_err();
        assert!(matches!(err, CodecError::KindMismatch { expected: "Market", .. }));
    }

    #[test]
    fn test_signed_narrow_reads() {
        let buf = [0xff, 0xfe, 0xff, 0x80];
        let mut cur = FieldCursor::new(&buf);
        assert_eq!(cur.read_i8().unwrap(), -1);
        assert_eq!(cur.read_i16().unwrap(), -2);
        assert_eq!(cur.read_i8().unwrap(), i8::MIN);
        assert!(cur.read_i8().is_err());

        let mut short = FieldCursor::new(&[0x01]);
        assert!(matches!(
            short.read_i16(),
            Err(CodecError::BufferUnderrun { offset: 0, needed: 2, remaining: 1 })
        ));
        assert_eq!(short.position(), 0);
    }

    #[test]
    fn test_count_above_capacity_rejected() {
        let mut cur = FieldCursor::new(&[5, 6]);
        assert_eq!(cur.read_count("council_size", 5).unwrap(), 5);
        let err = cur.read_count("council_size", 5).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidCount {
                field: "council_size",
                offset: 1,
                count: 6,
                max: 5,
            }
        );
        assert!(err.is_absent());
    }

    proptest! {
        #[test]
        fn prop_i16_reads_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..17)) {
            let mut cur = FieldCursor::new(&bytes);
            let mut values = Vec::new();
            while let Ok(v) = cur.read_i16() {
                values.push(v);
            }
            prop_assert_eq!(values.len(), bytes.len() / 2);
            prop_assert_eq!(cur.remaining(), bytes.len() % 2);
            for (i, v) in values.iter().enumerate() {
                prop_assert_eq!(*v, i16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]));
            }
            if cur.remaining() == 1 {
                prop_assert_eq!(cur.read_i8().unwrap(), bytes[bytes.len() - 1] as i8);
            }
        }

        #[test]
        fn prop_u64_reads_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
            let mut cur = FieldCursor::new(&bytes);
            let mut reads = 0;
            while cur.read_u64().is_ok() {
                reads += 1;
            }
            prop_assert_eq!(reads, bytes.len() / 8);
            prop_assert_eq!(cur.remaining(), bytes.len() % 8);
        }

        #[test]
        fn prop_string_read_consumes_exact_width(s in "[a-zA-Z0-9 ?]{0,64}") {
            let mut buf = (s.len() as u32).to_le_bytes().to_vec();
            buf.extend_from_slice(s.as_bytes());
            buf.push(0xAA);
            let mut cur = FieldCursor::new(&buf);
            prop_assert_eq!(cur.read_string().unwrap(), s.clone());
            prop_assert_eq!(cur.position(), string_width(s.len()));
            prop_assert_eq!(cur.read_u8().unwrap(), 0xAA);
        }
    }
}
