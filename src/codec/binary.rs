// Binary rendering: a big-endian u32 version tag followed by the header and
// point fields with no separators.

use alloc::vec::Vec;

use super::wire::{Reader, Writer};
use super::{format, PartFormat};
use crate::error::{Error, Result};
use crate::share::Share;

impl PartFormat {
    pub fn encode_bytes(&self, share: &Share) -> Result<Vec<u8>> {
        self.check(share)?;

        let mut w = Writer::new();
        w.write_u32(self.version);
        self.write_header(share, &mut w)?;
        self.write_point(share, &mut w);
        Ok(w.into_bytes())
    }

    pub fn decode_bytes(&self, data: &[u8]) -> Result<Share> {
        let mut r = Reader::new(data);
        if r.read_u32()? != self.version {
            return Err(Error::MalformedInput("version tag does not match the format"));
        }

        let header = self.read_header(&mut r)?;
        let share = self.read_point(header, &mut r)?;
        r.finish()?;
        Ok(share)
    }
}

/// Reads the leading four-byte version tag.
pub fn detect_bytes_version(data: &[u8]) -> Result<u32> {
    Reader::new(data).read_u32()
}

/// Encodes `share` as bytes with the format of its own version.
pub fn encode_bytes(share: &Share) -> Result<Vec<u8>> {
    format(share.version())?.encode_bytes(share)
}

/// Decodes bytes produced by any known format version.
pub fn decode_bytes(data: &[u8]) -> Result<Share> {
    format(detect_bytes_version(data)?)?.decode_bytes(data)
}
