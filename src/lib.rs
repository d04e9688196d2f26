//! Threshold [Shamir's Secret Sharing](https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing) with versioned, transcribable share encodings
//!
//! A secret is split into `n` shares such that any `k` of them reconstruct it
//! exactly while fewer reveal nothing about it.
//!
//! # Usage
//!
//! ```
//! use secret_parts::{join, split};
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//!
//! let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
//! // Split into 5 shares, any 3 of which recover the secret
//! let shares = split(b"launch codes", 5, 3, &mut rng).unwrap();
//!
//! let secret = join(&[shares[4].clone(), shares[0].clone(), shares[2].clone()]).unwrap();
//! assert_eq!(secret, b"launch codes");
//!
//! // Two shares are not enough
//! assert!(join(&shares[..2]).is_err());
//! ```
//!
//! # Share variants
//!
//! - [`split`] treats the whole secret as one big-endian integer and samples a
//!   single polynomial over `Z/pZ`, where `p` is the smallest Mersenne prime of
//!   [`config::MERSENNE_EXPONENTS`] above the secret.
//! - [`split_per_byte`] samples one polynomial per secret byte over GF(257), all
//!   evaluated at the same x-coordinates. At most 256 shares can be issued.
//!
//! [`recover`] joins shares of either variant.
//!
//! # Encodings
//!
//! Shares encode to dash-grouped hex text, meant to be copied by hand, or to
//! compact bytes. Both carry a leading format version; every version listed in
//! [`codec::FORMATS`] stays decodable.
//!
//! ```
//! use secret_parts::{recover, split_per_byte, Share};
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//!
//! let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
//! let shares = split_per_byte(&[1, 2, 3, 4], 3, 2, &mut rng).unwrap();
//!
//! let texts = shares
//!     .iter()
//!     .map(|s| s.to_text())
//!     .collect::<Result<Vec<String>, _>>()
//!     .unwrap();
//! let parsed = texts[1..]
//!     .iter()
//!     .map(|t| t.parse())
//!     .collect::<Result<Vec<Share>, _>>()
//!     .unwrap();
//! assert_eq!(recover(&parsed).unwrap(), vec![1, 2, 3, 4]);
//! ```
//!
//! # Feature flags
//!
//! - `std`: links the standard library and adds [`is_probable_prime`], which draws
//!   its bases from `rand::thread_rng`. Splitting always takes an explicit generator.
//! - `zeroize_memory`: share coordinates, polynomial coefficients and recovered
//!   byte buffers are cleared once dropped. GF(257) values and byte buffers go
//!   through `zeroize`; big integers have their digits overwritten in place, which
//!   does not reach spare capacity of their digit buffer. Moduli, lengths and
//!   thresholds are public and kept as they are.
//! - `fuzzing`: derives `arbitrary::Arbitrary` on the share model.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod arith;
pub mod checksum;
pub mod codec;
pub mod config;
mod error;
mod field;
mod math;
mod memory;
mod share;

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;
use num_bigint::BigUint;

use crate::codec::CURRENT_VERSION;
use crate::config::{MIN_REQUIRED_PARTS, PER_BYTE_MAX_PARTS};

pub use arith::{choose_modulus, random_field_element};
#[cfg(feature = "std")]
pub use arith::is_probable_prime;
pub use arith::is_probable_prime_rng;
pub use checksum::Checksum;
pub use codec::{
    decode_bytes, decode_text, detect_bytes_version, detect_text_version, encode_bytes,
    encode_text, PartFormat,
};
pub use error::{Error, Result};
pub use field::GF257;
pub use math::{interpolate, interpolate_at, Polynomial};
pub use share::{Payload, PerBytePoint, Point, Share};

/// Splits `secret` into `n` shares, any `k` of which recover it.
///
/// The secret is read as one big-endian integer. Shares are issued at
/// `x = 1..=n` and tagged with the current format version.
///
/// Example:
/// ```
/// # use secret_parts::split;
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let shares = split(&[1, 2, 3, 4], 4, 2, &mut rng).unwrap();
/// assert_eq!(shares.len(), 4);
/// assert!(shares.iter().all(|s| s.required_parts() == Some(2)));
/// ```
pub fn split<R: rand::Rng>(secret: &[u8], n: usize, k: usize, rng: &mut R) -> Result<Vec<Share>> {
    check_split(secret, n, k)?;

    let value = BigUint::from_bytes_be(secret);
    let modulus = arith::choose_modulus(&value)?;
    if BigUint::from(n) >= modulus {
        return Err(Error::InvalidParameters("more shares than field elements"));
    }

    let poly = Polynomial::random(value, k - 1, &modulus, rng);

    Ok((1..=n)
        .map(|x| {
            let x = BigUint::from(x);
            let y = poly.evaluate(&x);
            Share::new(
                CURRENT_VERSION,
                secret.len(),
                Some(k),
                Payload::WholeSecret {
                    modulus: modulus.clone(),
                    point: Point::new(x, y),
                },
            )
        })
        .collect())
}

/// Splits every byte of `secret` on its own GF(257) polynomial.
///
/// All byte positions are sampled at the same `x = 1..=n`, so each share holds
/// one value per byte. `n` is at most 256.
pub fn split_per_byte<R: rand::Rng>(
    secret: &[u8],
    n: usize,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Share>> {
    check_split(secret, n, k)?;
    if n > PER_BYTE_MAX_PARTS {
        return Err(Error::InvalidParameters(
            "per-byte splitting issues at most 256 shares",
        ));
    }

    let mut polys: Vec<Vec<GF257>> = secret
        .iter()
        .map(|b| math::random_byte_polynomial(GF257(u16::from(*b)), k, rng))
        .collect();

    let shares = (1..=n)
        .map(|x| {
            let x = GF257(x as u16);
            Share::new(
                CURRENT_VERSION,
                secret.len(),
                Some(k),
                Payload::PerByte(PerBytePoint {
                    x,
                    y: math::evaluate_byte_polynomials(&polys, x),
                }),
            )
        })
        .collect();

    memory::wipe(&mut polys);

    Ok(shares)
}

/// Recovers a secret from whole-secret shares.
///
/// Shares must agree on modulus, secret length and threshold; a share of
/// version 0 has no threshold and agrees with any. When more shares than the
/// threshold are given, the first `required_parts` in the given order are
/// used. Without any known threshold all shares are used.
///
/// Fails, in this order of checks, with `InconsistentShares`, then
/// `InsufficientShares`, then `DuplicateShare` for the first share whose
/// x-coordinate was already seen.
///
/// Example:
/// ```
/// # use secret_parts::{join, split, Error};
/// # use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// # let mut rng = ChaCha8Rng::from_seed([0x90; 32]);
/// let shares = split(&[42], 3, 3, &mut rng).unwrap();
/// assert_eq!(join(&shares).unwrap(), vec![42]);
/// assert_eq!(
///     join(&shares[1..]),
///     Err(Error::InsufficientShares { required: 3, provided: 2 })
/// );
/// ```
pub fn join(shares: &[Share]) -> Result<Vec<u8>> {
    let used = select(shares)?;
    let first = &shares[0];
    let modulus = first.modulus().ok_or(Error::InvalidParameters(
        "per-byte shares are joined with join_per_byte",
    ))?;

    let points: Vec<Point> = shares[..used]
        .iter()
        .filter_map(|s| match s.payload() {
            Payload::WholeSecret { point, .. } => Some(point.clone()),
            Payload::PerByte(_) => None,
        })
        .collect();

    let secret = math::interpolate(&points, modulus)?;
    secret_bytes(secret, first.secret_length())
}

/// Recovers a secret from per-byte shares, one GF(257) interpolation per byte.
///
/// Share selection and failures are those of [`join`].
pub fn join_per_byte(shares: &[Share]) -> Result<Vec<u8>> {
    let used = select(shares)?;

    let mut xs = Vec::with_capacity(used);
    let mut ys = Vec::with_capacity(used);
    for share in &shares[..used] {
        match share.payload() {
            Payload::PerByte(p) => {
                xs.push(p.x);
                ys.push(p.y.as_slice());
            }
            Payload::WholeSecret { .. } => {
                return Err(Error::InvalidParameters(
                    "whole-secret shares are joined with join",
                ))
            }
        }
    }

    math::interpolate_bytes(&xs, &ys)
        .into_iter()
        .map(|v| {
            u8::try_from(v.0)
                .map_err(|_| Error::InconsistentShares("recovered value is not a byte"))
        })
        .collect()
}

/// Joins shares of either variant, chosen by the first share.
pub fn recover(shares: &[Share]) -> Result<Vec<u8>> {
    match shares.first() {
        Some(share) if share.is_per_byte() => join_per_byte(shares),
        _ => join(shares),
    }
}

fn check_split(secret: &[u8], n: usize, k: usize) -> Result<()> {
    if secret.is_empty() {
        return Err(Error::InvalidParameters("secret must not be empty"));
    }
    if k < MIN_REQUIRED_PARTS {
        return Err(Error::InvalidParameters("threshold must be at least 2"));
    }
    if n < k {
        return Err(Error::InvalidParameters(
            "share count must be at least the threshold",
        ));
    }
    Ok(())
}

// Checks that `shares` can come from one split and returns how many of them,
// from the front, take part in the interpolation.
fn select(shares: &[Share]) -> Result<usize> {
    let first = shares.first().ok_or(Error::InsufficientShares {
        required: MIN_REQUIRED_PARTS,
        provided: 0,
    })?;

    let mut required = None;
    for share in shares {
        share.validate()?;

        if share.is_per_byte() != first.is_per_byte() {
            return Err(Error::InconsistentShares("mixed share variants"));
        }
        if share.secret_length() != first.secret_length() {
            return Err(Error::InconsistentShares("secret lengths differ"));
        }
        if share.modulus() != first.modulus() {
            return Err(Error::InconsistentShares("moduli differ"));
        }
        match (required, share.required_parts()) {
            (Some(a), Some(b)) if a != b => {
                return Err(Error::InconsistentShares("thresholds differ"));
            }
            (None, Some(b)) => required = Some(b),
            _ => {}
        }
    }

    let needed = required.unwrap_or(MIN_REQUIRED_PARTS);
    if shares.len() < needed {
        return Err(Error::InsufficientShares {
            required: needed,
            provided: shares.len(),
        });
    }

    let mut keys: HashSet<BigUint> = HashSet::new();
    for (index, share) in shares.iter().enumerate() {
        if !keys.insert(share.x()) {
            return Err(Error::DuplicateShare { index });
        }
    }

    Ok(required.unwrap_or(shares.len()))
}

// Left-pads the recovered integer back to the recorded secret length.
fn secret_bytes(mut secret: BigUint, len: usize) -> Result<Vec<u8>> {
    let mut digits = secret.to_bytes_be();
    memory::wipe_biguint(&mut secret);

    let out = if digits.len() <= len {
        let mut out = vec![0u8; len - digits.len()];
        out.extend_from_slice(&digits);
        Ok(out)
    } else {
        Err(Error::InconsistentShares(
            "recovered secret is longer than the recorded length",
        ))
    };

    memory::wipe(&mut digits);
    out
}
