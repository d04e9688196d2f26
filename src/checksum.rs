//! Integrity digest over a share's coordinates.
//!
//! A checksum lets one transcribed share be checked on its own, before the other
//! shares needed for recovery are at hand.

use sha2::{Digest, Sha256};

use crate::codec::wire::Writer;
use crate::config::CHECKSUM_LEN;
use crate::error::{Error, Result};
use crate::share::Point;

/// The first [`CHECKSUM_LEN`] bytes of SHA-256 over the encoded `x` and `y` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checksum([u8; CHECKSUM_LEN]);

impl Checksum {
    /// Checksum of a whole-secret point, as embedded by checksummed formats.
    pub fn of(point: &Point) -> Self {
        let mut w = Writer::new();
        w.write_biguint(&point.x);
        w.write_biguint(&point.y);
        Self::of_fields(&w.into_bytes())
    }

    /// Checksum of the x and y fields exactly as they appear on the wire.
    pub fn of_fields(fields: &[u8]) -> Self {
        let digest = Sha256::digest(fields);
        let mut bytes = [0u8; CHECKSUM_LEN];
        bytes.copy_from_slice(&digest[..CHECKSUM_LEN]);
        Checksum(bytes)
    }

    pub fn from_bytes(bytes: [u8; CHECKSUM_LEN]) -> Self {
        Checksum(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CHECKSUM_LEN] {
        &self.0
    }

    /// Fails with `ChecksumMismatch` unless `self` is the checksum of the
    /// encoded x and y `fields`.
    pub fn verify(&self, fields: &[u8]) -> Result<()> {
        if *self == Checksum::of_fields(fields) {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch)
        }
    }
}
