use alloc::vec::Vec;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::arith;
use crate::codec;
use crate::config::{MIN_REQUIRED_PARTS, PER_BYTE_MAX_PARTS, PER_BYTE_PRIME};
use crate::error::{Error, Result};
use crate::field::GF257;
#[cfg(feature = "zeroize_memory")]
use crate::memory;

#[cfg(feature = "fuzzing")]
use arbitrary::Arbitrary;

#[cfg(feature = "zeroize_memory")]
use zeroize::Zeroize;

/// A sample `(x, f(x))` of a polynomial over `Z/pZ`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzzing", derive(Arbitrary))]
pub struct Point {
    /// The x coordinate, never zero for an issued share.
    pub x: BigUint,
    /// The y coordinate.
    pub y: BigUint,
}

impl Point {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Point { x, y }
    }
}

#[cfg(feature = "zeroize_memory")]
impl Zeroize for Point {
    fn zeroize(&mut self) {
        memory::wipe_biguint(&mut self.x);
        memory::wipe_biguint(&mut self.y);
    }
}

#[cfg(feature = "zeroize_memory")]
impl Drop for Point {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// One x-coordinate with the value of every byte position's polynomial at that x.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzzing", derive(Arbitrary))]
#[cfg_attr(feature = "zeroize_memory", derive(Zeroize))]
pub struct PerBytePoint {
    /// The x coordinate shared by all byte positions.
    pub x: GF257,
    /// The y coordinates, one per byte of the secret.
    pub y: Vec<GF257>,
}

/// What a share carries, depending on how the secret was split.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzzing", derive(Arbitrary))]
pub enum Payload {
    /// The whole secret as one field element, sampled at `point.x`.
    WholeSecret { modulus: BigUint, point: Point },
    /// One GF(257) polynomial per byte, all sampled at the same x.
    PerByte(PerBytePoint),
}

// The modulus is public and stays readable.
#[cfg(feature = "zeroize_memory")]
impl Zeroize for Payload {
    fn zeroize(&mut self) {
        match self {
            Payload::WholeSecret { point, .. } => point.zeroize(),
            Payload::PerByte(p) => p.zeroize(),
        }
    }
}

/// A share of a secret.
///
/// Shares are produced by [`split`](crate::split) and
/// [`split_per_byte`](crate::split_per_byte) or decoded from one of their
/// encodings, and are never modified afterwards. Shares from one split agree on
/// everything but their point.
///
/// Usage example:
/// ```
/// use secret_parts::{split, Share};
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
///
/// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let shares = split(b"correct horse", 3, 2, &mut rng).unwrap();
///
/// let text = shares[0].to_text().unwrap();
/// let parsed: Share = text.parse().unwrap();
/// assert_eq!(parsed, shares[0]);
/// assert_eq!(parsed.required_parts(), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "fuzzing", derive(Arbitrary))]
#[cfg_attr(feature = "zeroize_memory", derive(Zeroize))]
#[cfg_attr(feature = "zeroize_memory", zeroize(drop))]
pub struct Share {
    version: u32,
    secret_length: usize,
    required_parts: Option<usize>,
    payload: Payload,
}

impl Share {
    pub(crate) fn new(
        version: u32,
        secret_length: usize,
        required_parts: Option<usize>,
        payload: Payload,
    ) -> Self {
        Share {
            version,
            secret_length,
            required_parts,
            payload,
        }
    }

    /// Format version this share is encoded with.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Length in bytes of the secret this share belongs to.
    pub fn secret_length(&self) -> usize {
        self.secret_length
    }

    /// The threshold, or `None` for version 0 shares, which do not record it.
    pub fn required_parts(&self) -> Option<usize> {
        self.required_parts
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_per_byte(&self) -> bool {
        matches!(self.payload, Payload::PerByte(_))
    }

    /// The prime of a whole-secret share; per-byte shares work in GF(257) implicitly.
    pub fn modulus(&self) -> Option<&BigUint> {
        match &self.payload {
            Payload::WholeSecret { modulus, .. } => Some(modulus),
            Payload::PerByte(_) => None,
        }
    }

    /// The share index.
    pub fn x(&self) -> BigUint {
        match &self.payload {
            Payload::WholeSecret { point, .. } => point.x.clone(),
            Payload::PerByte(p) => BigUint::from(p.x.0),
        }
    }

    /// Returns this share tagged for format `version`.
    ///
    /// Version 0 has no threshold field, so it is dropped; later versions need one.
    /// Versions before 2 cannot mark a share as per-byte.
    pub fn with_version(&self, version: u32) -> Result<Share> {
        let format = codec::format(version)?;

        if self.is_per_byte() && !format.per_byte_sentinel {
            return Err(Error::InvalidShare(
                "per-byte shares need a format with the per-byte sentinel",
            ));
        }

        let required_parts = if format.explicit_required_parts {
            Some(self.required_parts.ok_or(Error::InvalidShare(
                "threshold is unknown and the format requires it",
            ))?)
        } else {
            None
        };

        Ok(Share::new(
            version,
            self.secret_length,
            required_parts,
            self.payload.clone(),
        ))
    }

    /// Checks the invariants every share satisfies regardless of format.
    pub fn validate(&self) -> Result<()> {
        if self.secret_length == 0 {
            return Err(Error::InvalidShare("secret length must be at least 1"));
        }
        if let Some(k) = self.required_parts {
            if k < MIN_REQUIRED_PARTS {
                return Err(Error::InvalidShare("threshold must be at least 2"));
            }
        }

        match &self.payload {
            Payload::WholeSecret { modulus, point } => {
                if *modulus <= BigUint::from(2u32) {
                    return Err(Error::InvalidShare("modulus must be an odd prime"));
                }
                if point.x.is_zero() {
                    return Err(Error::InvalidShare("x must not be zero"));
                }
                if &point.x >= modulus || &point.y >= modulus {
                    return Err(Error::InvalidShare("point lies outside the field"));
                }
            }
            Payload::PerByte(p) => {
                if let Some(k) = self.required_parts {
                    if k > PER_BYTE_MAX_PARTS {
                        return Err(Error::InvalidShare("threshold exceeds 256"));
                    }
                }
                if p.x.0 == 0 {
                    return Err(Error::InvalidShare("x must not be zero"));
                }
                if p.x.0 >= PER_BYTE_PRIME || p.y.iter().any(|y| y.0 >= PER_BYTE_PRIME) {
                    return Err(Error::InvalidShare("point lies outside GF(257)"));
                }
                if p.y.len() != self.secret_length {
                    return Err(Error::InvalidShare(
                        "per-byte share must carry one value per secret byte",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Runs a Miller-Rabin test on the modulus of a whole-secret share.
    ///
    /// Decoding only checks structure. Use this on shares from an untrusted producer.
    pub fn verify_modulus<R: rand::Rng>(&self, rng: &mut R) -> Result<()> {
        match &self.payload {
            Payload::WholeSecret { modulus, .. } => {
                if arith::is_table_modulus(modulus) || arith::is_probable_prime_rng(modulus, rng) {
                    Ok(())
                } else {
                    Err(Error::InvalidShare("modulus is not prime"))
                }
            }
            Payload::PerByte(_) => Ok(()),
        }
    }

    /// Encodes with this share's format version as dash-grouped text.
    pub fn to_text(&self) -> Result<alloc::string::String> {
        codec::encode_text(self)
    }

    /// Encodes with this share's format version as bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        codec::encode_bytes(self)
    }
}

impl core::str::FromStr for Share {
    type Err = Error;

    fn from_str(s: &str) -> Result<Share> {
        codec::decode_text(s)
    }
}

impl core::convert::TryFrom<&[u8]> for Share {
    type Error = Error;

    fn try_from(s: &[u8]) -> Result<Share> {
        codec::decode_bytes(s)
    }
}

/// Converts a Share to its binary encoding.
impl core::convert::TryFrom<&Share> for Vec<u8> {
    type Error = Error;

    fn try_from(s: &Share) -> Result<Vec<u8>> {
        codec::encode_bytes(s)
    }
}

// Every value as a big-endian u16. The first byte is at most 1, so the result
// also reads as a non-negative two's-complement integer.
pub(crate) fn pack_per_byte(y: &[GF257]) -> Vec<u8> {
    y.iter().flat_map(|v| v.0.to_be_bytes()).collect()
}

pub(crate) fn unpack_per_byte(packed: &[u8], len: usize) -> Result<Vec<GF257>> {
    if Some(packed.len()) != len.checked_mul(2) {
        return Err(Error::MalformedInput(
            "per-byte values do not match the secret length",
        ));
    }

    packed
        .chunks_exact(2)
        .map(|c| {
            let v = u16::from_be_bytes([c[0], c[1]]);
            if v < PER_BYTE_PRIME {
                Ok(GF257(v))
            } else {
                Err(Error::MalformedInput("per-byte value outside GF(257)"))
            }
        })
        .collect()
}
