//! Field-level wire codec. The Ashfall wire is little-endian throughout;
//! strings are fixed-width, NUL-padded fields.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::DecodeError;

/// Reads typed fields from a payload in declared order. A short read is a
/// hard error, never a silent zero.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                wanted: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_u8()? != 0)
    }

    /// Fixed-width string field: exactly `width` bytes on the wire, trailing
    /// NUL padding stripped. Invalid UTF-8 is replaced, not rejected --
    /// player names come from servers we do not control.
    pub fn read_string(&mut self, width: usize) -> Result<String, DecodeError> {
        let raw = self.take(width)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.take(n)
    }

    /// Consumes everything left in the payload as text. Used by chat
    /// messages, whose length is delimited by the frame.
    pub fn read_rest_string(&mut self) -> String {
        let raw = &self.buf[self.pos..];
        self.pos = self.buf.len();
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }
}

/// Appends typed fields to an outbound payload, mirroring [`Reader`].
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        let mut b = [0u8; 2];
        LittleEndian::write_u16(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_i16(&mut self, v: i16) {
        let mut b = [0u8; 2];
        LittleEndian::write_i16(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_u32(&mut self, v: u32) {
        let mut b = [0u8; 4];
        LittleEndian::write_u32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_i32(&mut self, v: i32) {
        let mut b = [0u8; 4];
        LittleEndian::write_i32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    /// Fixed-width string field. Input longer than `width` is truncated;
    /// shorter input is NUL-padded to the full width.
    pub fn write_string(&mut self, s: &str, width: usize) {
        let bytes = s.as_bytes();
        let n = bytes.len().min(width);
        self.buf.extend_from_slice(&bytes[..n]);
        self.buf.resize(self.buf.len() + (width - n), 0);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_widths() {
        let mut w = Writer::new();
        w.write_u8(0xfe);
        w.write_i8(-5);
        w.write_u16(0xbeef);
        w.write_i16(-1234);
        w.write_u32(0xdead_beef);
        w.write_i32(-7_654_321);
        w.write_bool(true);
        let buf = w.into_inner();

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_u8().unwrap(), 0xfe);
        assert_eq!(r.read_i8().unwrap(), -5);
        assert_eq!(r.read_u16().unwrap(), 0xbeef);
        assert_eq!(r.read_i16().unwrap(), -1234);
        assert_eq!(r.read_u32().unwrap(), 0xdead_beef);
        assert_eq!(r.read_i32().unwrap(), -7_654_321);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn integers_are_little_endian() {
        let mut w = Writer::new();
        w.write_u16(0x0102);
        w.write_u32(0x0a0b0c0d);
        assert_eq!(w.into_inner(), [0x02, 0x01, 0x0d, 0x0c, 0x0b, 0x0a]);
    }

    #[test]
    fn string_round_trip_pads_with_nul() {
        let mut w = Writer::new();
        w.write_string("Maya", 8);
        let buf = w.into_inner();
        assert_eq!(buf, b"Maya\0\0\0\0");

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_string(8).unwrap(), "Maya");
    }

    #[test]
    fn string_longer_than_field_is_truncated() {
        let mut w = Writer::new();
        w.write_string("Maximiliane", 8);
        let buf = w.into_inner();
        assert_eq!(buf.len(), 8);

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_string(8).unwrap(), "Maximili");
    }

    #[test]
    fn short_read_is_an_error_not_zero() {
        let mut r = Reader::new(&[0x01]);
        assert_eq!(
            r.read_u32(),
            Err(DecodeError::Truncated {
                wanted: 4,
                remaining: 1
            })
        );
        // The cursor did not advance past the failed read.
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn short_string_read_is_an_error() {
        let mut r = Reader::new(b"abc");
        assert!(matches!(
            r.read_string(8),
            Err(DecodeError::Truncated { wanted: 8, remaining: 3 })
        ));
    }

    #[test]
    fn rest_string_consumes_remainder() {
        let mut r = Reader::new(b"\x05hello there\0junk");
        assert_eq!(r.read_u8().unwrap(), 5);
        assert_eq!(r.read_rest_string(), "hello there");
        assert_eq!(r.remaining(), 0);
    }
}
