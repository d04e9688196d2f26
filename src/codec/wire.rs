// Field-level primitives shared by every format version: fixed-width u32
// fields and length-prefixed two's-complement big integers.

use alloc::vec::Vec;

use num_bigint::{BigInt, BigUint};

use crate::error::{Error, Result};

#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer::default()
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn write_bigint(&mut self, v: &BigInt) -> &mut Self {
        self.write_field(&v.to_signed_bytes_be())
    }

    pub fn write_biguint(&mut self, v: &BigUint) -> &mut Self {
        self.write_bigint(&BigInt::from(v.clone()))
    }

    /// Writes `bytes` behind a `u32` length prefix.
    pub fn write_field(&mut self, bytes: &[u8]) -> &mut Self {
        // A single field never approaches 4 GiB.
        self.write_u32(bytes.len() as u32);
        self.write_bytes(bytes)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Slice of everything written since `start`.
    pub fn written_since(&self, start: usize) -> &[u8] {
        &self.buf[start..]
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(Error::MalformedInput("unexpected end of input"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a `u32` length prefix and that many bytes.
    pub fn read_field(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.read_bytes(len)
    }

    pub fn read_bigint(&mut self) -> Result<BigInt> {
        decode_bigint(self.read_field()?)
    }

    pub fn read_biguint(&mut self) -> Result<BigUint> {
        self.read_bigint()?
            .to_biguint()
            .ok_or(Error::MalformedInput("negative integer field"))
    }

    /// Consumes and returns everything not read yet.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    pub fn finish(self) -> Result<()> {
        if self.pos == self.data.len() {
            Ok(())
        } else {
            Err(Error::MalformedInput("trailing data"))
        }
    }
}

/// Interprets the content of a length-prefixed field as a two's-complement integer.
pub fn decode_bigint(bytes: &[u8]) -> Result<BigInt> {
    if bytes.is_empty() {
        return Err(Error::MalformedInput("empty integer field"));
    }
    Ok(BigInt::from_signed_bytes_be(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn writes_fixed_width_and_prefixed_fields() {
        let mut w = Writer::new();
        w.write_u32(7)
            .write_bigint(&BigInt::from(-1))
            .write_biguint(&BigUint::from(0x80u32));
        assert_eq!(
            w.into_bytes(),
            vec![0, 0, 0, 7, 0, 0, 0, 1, 0xff, 0, 0, 0, 2, 0x00, 0x80]
        );
    }

    #[test]
    fn reads_back_what_was_written() {
        let mut w = Writer::new();
        w.write_u32(u32::MAX)
            .write_bigint(&BigInt::from(-1))
            .write_biguint(&BigUint::from(123_456_789u32))
            .write_bytes(&[9, 9]);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_u32().unwrap(), u32::MAX);
        assert_eq!(r.read_bigint().unwrap(), BigInt::from(-1));
        assert_eq!(r.read_biguint().unwrap(), BigUint::from(123_456_789u32));
        assert_eq!(r.read_bytes(2).unwrap(), &[9, 9]);
        assert!(r.finish().is_ok());
    }

    #[test]
    fn raw_fields_are_length_prefixed() {
        let mut w = Writer::new();
        w.write_u32(1);
        let start = w.position();
        w.write_field(&[0, 1, 2]);
        assert_eq!(w.written_since(start), &[0, 0, 0, 3, 0, 1, 2]);

        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        r.read_u32().unwrap();
        assert_eq!(r.read_field().unwrap(), &[0, 1, 2]);
        assert!(r.finish().is_ok());
    }

    #[test]
    fn empty_integer_field_is_malformed() {
        let mut r = Reader::new(&[0, 0, 0, 0]);
        assert_eq!(
            r.read_bigint(),
            Err(Error::MalformedInput("empty integer field"))
        );
    }

    #[test]
    fn truncated_input_is_malformed() {
        let mut r = Reader::new(&[0, 0, 0, 5, 1, 2]);
        assert!(matches!(r.read_bigint(), Err(Error::MalformedInput(_))));

        let mut r = Reader::new(&[0, 0]);
        assert!(matches!(r.read_u32(), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn huge_length_prefix_is_malformed() {
        let mut r = Reader::new(&[0xff, 0xff, 0xff, 0xff, 1]);
        assert!(matches!(r.read_bigint(), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn negative_unsigned_field_is_malformed() {
        let mut r = Reader::new(&[0, 0, 0, 1, 0xff]);
        assert_eq!(
            r.read_biguint(),
            Err(Error::MalformedInput("negative integer field"))
        );
    }

    #[test]
    fn rest_takes_what_is_left() {
        let data = [0, 0, 0, 7, 1, 2];
        let mut r = Reader::new(&data);
        assert_eq!(r.read_u32().unwrap(), 7);
        assert_eq!(r.read_rest(), &[1, 2]);
        assert_eq!(r.read_rest(), &[] as &[u8]);
        assert!(r.finish().is_ok());
    }

    #[test]
    fn trailing_data_is_malformed() {
        let data = [0, 0, 0, 1, 0];
        let mut r = Reader::new(&data);
        r.read_u32().unwrap();
        assert_eq!(r.finish(), Err(Error::MalformedInput("trailing data")));
    }
}
