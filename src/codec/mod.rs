//! Versioned share encodings.
//!
//! Every format version is an entry of [`FORMATS`], indexed by its number, and
//! defines one field layout rendered two ways: dash-grouped hex text for people
//! and raw bytes for machines. Both renderings start with the version, so
//! decoding dispatches on it and old shares stay readable after new versions
//! are appended. Entries are never removed or changed.
//!
//! | version | threshold field | per-byte sentinel | checksum |
//! |---------|-----------------|-------------------|----------|
//! | 0       | no              | no                | yes      |
//! | 1       | yes             | no                | yes      |
//! | 2       | yes             | yes               | yes      |
//! | 3       | yes             | yes               | no       |
//!
//! Header fields: `secret_length: u32`, `required_parts: u32` (versions with a
//! threshold field), `modulus: bigint` (`-1` marks a per-byte share).
//! Point fields: `x: bigint`, `y: bigint`, then 4 checksum bytes where the
//! version has them. A `bigint` is a `u32` byte count followed by big-endian
//! two's-complement bytes; every `u32` is big-endian. A per-byte share writes
//! its `y` as every position's value in two bytes, `2 * secret_length` bytes in
//! all, which reads back as one non-negative `bigint`. The checksum covers the
//! `x` and `y` fields exactly as encoded. The point section ends the input, so
//! a decoder takes its last 4 bytes as the checksum and verifies it before
//! reading any field of the point.

mod binary;
mod text;
pub mod wire;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;

use crate::checksum::Checksum;
use crate::config::{CHECKSUM_LEN, PER_BYTE_SENTINEL};
use crate::error::{Error, Result};
use crate::field::GF257;
use crate::share::{pack_per_byte, unpack_per_byte, Payload, PerBytePoint, Point, Share};

use self::wire::{decode_bigint, Reader, Writer};

pub use self::binary::{decode_bytes, detect_bytes_version, encode_bytes};
pub use self::text::{decode_text, detect_text_version, encode_text};

/// The layout rules of one format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartFormat {
    pub version: u32,
    /// Whether the threshold is written out. Without it a share set cannot be
    /// checked for completeness on its own.
    pub explicit_required_parts: bool,
    /// Whether the modulus field may hold [`PER_BYTE_SENTINEL`].
    pub per_byte_sentinel: bool,
    /// Whether a [`Checksum`] follows the point.
    pub checksum: bool,
}

pub static FORMATS: [PartFormat; 4] = [
    PartFormat {
        version: 0,
        explicit_required_parts: false,
        per_byte_sentinel: false,
        checksum: true,
    },
    PartFormat {
        version: 1,
        explicit_required_parts: true,
        per_byte_sentinel: false,
        checksum: true,
    },
    PartFormat {
        version: 2,
        explicit_required_parts: true,
        per_byte_sentinel: true,
        checksum: true,
    },
    PartFormat {
        version: 3,
        explicit_required_parts: true,
        per_byte_sentinel: true,
        checksum: false,
    },
];

/// Version given to freshly split shares: the last entry of [`FORMATS`].
pub const CURRENT_VERSION: u32 = 3;

/// Looks up the registry entry for `version`.
pub fn format(version: u32) -> Result<&'static PartFormat> {
    FORMATS
        .get(version as usize)
        .ok_or(Error::UnsupportedVersion {
            version,
            latest: CURRENT_VERSION,
        })
}

pub fn current_format() -> &'static PartFormat {
    &FORMATS[CURRENT_VERSION as usize]
}

struct Header {
    secret_length: usize,
    required_parts: Option<usize>,
    modulus: BigInt,
}

impl PartFormat {
    // Refuses shares this version cannot represent faithfully.
    fn check(&self, share: &Share) -> Result<()> {
        share.validate()?;
        if share.is_per_byte() && !self.per_byte_sentinel {
            return Err(Error::InvalidShare(
                "per-byte shares need a format with the per-byte sentinel",
            ));
        }
        if self.explicit_required_parts && share.required_parts().is_none() {
            return Err(Error::InvalidShare(
                "threshold is unknown and the format requires it",
            ));
        }
        Ok(())
    }

    fn write_header(&self, share: &Share, w: &mut Writer) -> Result<()> {
        let secret_length = u32::try_from(share.secret_length())
            .map_err(|_| Error::InvalidShare("secret length does not fit the format"))?;
        w.write_u32(secret_length);

        if self.explicit_required_parts {
            let required = share
                .required_parts()
                .and_then(|k| u32::try_from(k).ok())
                .ok_or(Error::InvalidShare("threshold does not fit the format"))?;
            w.write_u32(required);
        }

        match share.payload() {
            Payload::WholeSecret { modulus, .. } => {
                w.write_biguint(modulus);
            }
            Payload::PerByte(_) => {
                w.write_bigint(&BigInt::from(PER_BYTE_SENTINEL));
            }
        }
        Ok(())
    }

    fn write_point(&self, share: &Share, w: &mut Writer) {
        let start = w.position();
        match share.payload() {
            Payload::WholeSecret { point, .. } => {
                w.write_biguint(&point.x).write_biguint(&point.y);
            }
            Payload::PerByte(p) => {
                w.write_biguint(&BigUint::from(p.x.0))
                    .write_field(&pack_per_byte(&p.y));
            }
        }
        if self.checksum {
            let checksum = Checksum::of_fields(w.written_since(start));
            w.write_bytes(checksum.as_bytes());
        }
    }

    fn read_header(&self, r: &mut Reader<'_>) -> Result<Header> {
        let secret_length = r.read_u32()? as usize;
        let required_parts = if self.explicit_required_parts {
            Some(r.read_u32()? as usize)
        } else {
            None
        };
        let modulus = r.read_bigint()?;

        Ok(Header {
            secret_length,
            required_parts,
            modulus,
        })
    }

    fn read_point(&self, header: Header, r: &mut Reader<'_>) -> Result<Share> {
        let per_byte = header.modulus == BigInt::from(PER_BYTE_SENTINEL);
        if per_byte && !self.per_byte_sentinel {
            return Err(Error::MalformedInput("negative modulus"));
        }

        // The point runs to the end of the input, checksum last. The checksum
        // is verified before any field inside the point is parsed.
        let section = r.read_rest();
        let fields = if self.checksum {
            let at = section
                .len()
                .checked_sub(CHECKSUM_LEN)
                .ok_or(Error::MalformedInput("unexpected end of input"))?;
            let (fields, checksum) = section.split_at(at);
            let checksum = <[u8; CHECKSUM_LEN]>::try_from(checksum)
                .map_err(|_| Error::MalformedInput("unexpected end of input"))?;
            Checksum::from_bytes(checksum).verify(fields)?;
            fields
        } else {
            section
        };

        let mut fields = Reader::new(fields);
        let x = fields.read_biguint()?;
        let y = fields.read_field()?;
        fields.finish()?;

        let payload = if per_byte {
            let x = x
                .to_u16()
                .ok_or(Error::MalformedInput("per-byte x-coordinate outside GF(257)"))?;
            Payload::PerByte(PerBytePoint {
                x: GF257(x),
                y: unpack_per_byte(y, header.secret_length)?,
            })
        } else {
            let modulus = match header.modulus.sign() {
                Sign::Minus => return Err(Error::MalformedInput("negative modulus")),
                _ => header.modulus.magnitude().clone(),
            };
            let y = decode_bigint(y)?
                .to_biguint()
                .ok_or(Error::MalformedInput("negative y-coordinate"))?;
            Payload::WholeSecret {
                modulus,
                point: Point::new(x, y),
            }
        };

        let share = Share::new(
            self.version,
            header.secret_length,
            header.required_parts,
            payload,
        );
        share.validate().map_err(|e| match e {
            Error::InvalidShare(reason) => Error::MalformedInput(reason),
            other => other,
        })?;
        Ok(share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::mersenne;
    use alloc::vec;
    use alloc::vec::Vec;
    use rstest::rstest;

    fn whole_share(version: u32) -> Share {
        let required = if version == 0 { None } else { Some(3) };
        Share::new(
            version,
            5,
            required,
            Payload::WholeSecret {
                modulus: mersenne(61),
                point: Point::new(BigUint::from(2u32), BigUint::from(0x1234_5678u32)),
            },
        )
    }

    fn per_byte_share(version: u32) -> Share {
        Share::new(
            version,
            3,
            Some(2),
            Payload::PerByte(PerBytePoint {
                x: GF257(256),
                y: vec![GF257(256), GF257(0), GF257(9)],
            }),
        )
    }

    #[test]
    fn registry_is_indexed_by_version() {
        for (i, f) in FORMATS.iter().enumerate() {
            assert_eq!(f.version as usize, i);
            assert_eq!(format(f.version).unwrap(), f);
        }
        assert_eq!(current_format().version, CURRENT_VERSION);
        assert_eq!(CURRENT_VERSION as usize, FORMATS.len() - 1);
    }

    #[test]
    fn unknown_version_is_unsupported() {
        assert_eq!(
            format(4),
            Err(Error::UnsupportedVersion {
                version: 4,
                latest: 3
            })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn whole_secret_round_trips(#[case] version: u32) {
        let share = whole_share(version);
        let f = format(version).unwrap();

        let text = f.encode_text(&share).unwrap();
        assert_eq!(f.decode_text(&text).unwrap(), share);
        assert_eq!(decode_text(&text).unwrap(), share);

        let bytes = f.encode_bytes(&share).unwrap();
        assert_eq!(f.decode_bytes(&bytes).unwrap(), share);
        assert_eq!(decode_bytes(&bytes).unwrap(), share);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    fn per_byte_round_trips(#[case] version: u32) {
        let share = per_byte_share(version);
        let text = encode_text(&share).unwrap();
        assert_eq!(decode_text(&text).unwrap(), share);
        let bytes = encode_bytes(&share).unwrap();
        assert_eq!(decode_bytes(&bytes).unwrap(), share);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn per_byte_needs_sentinel(#[case] version: u32) {
        let share = per_byte_share(3);
        let f = format(version).unwrap();
        assert!(matches!(f.encode_text(&share), Err(Error::InvalidShare(_))));
        assert!(matches!(f.encode_bytes(&share), Err(Error::InvalidShare(_))));
    }

    #[test]
    fn threshold_is_required_from_version_one() {
        let share = whole_share(0);
        assert!(matches!(
            format(1).unwrap().encode_bytes(&share),
            Err(Error::InvalidShare(_))
        ));
    }

    #[test]
    fn checksum_only_where_the_format_has_one() {
        let share = whole_share(2);
        let with = format(2).unwrap().encode_bytes(&share).unwrap();
        let without = format(3).unwrap().encode_bytes(&share).unwrap();
        assert_eq!(with.len(), without.len() + CHECKSUM_LEN);
    }

    #[test]
    fn corrupted_checksum_is_detected() {
        let share = whole_share(2);
        let mut bytes = encode_bytes(&share).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert_eq!(decode_bytes(&bytes), Err(Error::ChecksumMismatch));
    }

    fn point_digits(text: &str) -> Vec<usize> {
        let (_, point) = text.split_once("//").unwrap();
        let offset = text.len() - point.len();
        point
            .char_indices()
            .filter(|(_, c)| c.is_ascii_hexdigit())
            .map(|(i, _)| offset + i)
            .collect()
    }

    #[rstest]
    #[case(whole_share(2))]
    #[case(whole_share(0))]
    #[case(per_byte_share(2))]
    fn every_changed_point_digit_fails_the_checksum(#[case] share: Share) {
        let text = encode_text(&share).unwrap();
        for at in point_digits(&text) {
            let old = text.as_bytes()[at] as char;
            for new in "0123456789abcdef".chars().filter(|c| *c != old) {
                let mut corrupted = text.clone();
                corrupted.replace_range(at..at + 1, new.encode_utf8(&mut [0; 4]));
                assert_eq!(
                    decode_text(&corrupted),
                    Err(Error::ChecksumMismatch),
                    "digit {at} set to {new}"
                );
            }
        }
    }

    #[test]
    fn corrupted_length_prefix_fails_the_checksum() {
        let share = whole_share(1);
        let mut bytes = encode_bytes(&share).unwrap();
        // The x field starts after the tag, both u32 header fields and the
        // modulus (4 + 8 bytes).
        let x_len = 4 + 4 + 4 + 12;
        bytes[x_len + 3] = 0x40;
        assert_eq!(decode_bytes(&bytes), Err(Error::ChecksumMismatch));
    }

    #[test]
    fn short_point_section_is_malformed() {
        let share = whole_share(2);
        let bytes = encode_bytes(&share).unwrap();
        let header_len = 4 + 4 + 4 + 12;
        assert_eq!(
            decode_bytes(&bytes[..header_len + CHECKSUM_LEN - 1]),
            Err(Error::MalformedInput("unexpected end of input"))
        );
    }

    #[test]
    fn sentinel_in_old_format_is_malformed() {
        // Hand-built version 1 bytes carrying the per-byte sentinel.
        let mut w = Writer::new();
        w.write_u32(1).write_u32(1).write_u32(2);
        w.write_bigint(&BigInt::from(-1));
        let point = Point::new(BigUint::from(1u32), BigUint::from(5u32));
        w.write_biguint(&point.x).write_biguint(&point.y);
        w.write_bytes(Checksum::of(&point).as_bytes());
        assert_eq!(
            decode_bytes(&w.into_bytes()),
            Err(Error::MalformedInput("negative modulus"))
        );
    }

    #[test]
    fn invariant_violations_decode_as_malformed() {
        // Version 3 share whose x is zero.
        let mut w = Writer::new();
        w.write_u32(3).write_u32(1).write_u32(2);
        w.write_biguint(&mersenne(61));
        w.write_biguint(&BigUint::from(0u32))
            .write_biguint(&BigUint::from(5u32));
        assert_eq!(
            decode_bytes(&w.into_bytes()),
            Err(Error::MalformedInput("x must not be zero"))
        );
    }
}
