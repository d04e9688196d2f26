//! Frozen algorithm and wire-format parameters.
//!
//! Every value here is part of a share format. Changing one changes the bytes
//! produced for an existing version, so new values belong to a new version.

/// Prime used by the per-byte variant: the smallest prime above the byte range.
pub const PER_BYTE_PRIME: u16 = 257;

/// Largest number of per-byte shares; every x in `1..=256` is a distinct nonzero element.
pub const PER_BYTE_MAX_PARTS: usize = PER_BYTE_PRIME as usize - 1;

/// Modulus value written in place of a prime to mark a per-byte share.
pub const PER_BYTE_SENTINEL: i64 = -1;

/// Exponents `e` of the Mersenne primes `2^e - 1` offered by `choose_modulus`, ascending.
///
/// The largest entry bounds whole-secret shares to secrets of 16 506 bytes.
pub const MERSENNE_EXPONENTS: &[u32] = &[
    61, 89, 107, 127, 521, 607, 1279, 2203, 2281, 3217, 4253, 4423, 9689, 9941, 11213, 19937,
    21701, 23209, 44497, 86243, 110503, 132049,
];

/// Miller-Rabin rounds; each round with a random base has error at most 1/4.
pub const MILLER_RABIN_ROUNDS: usize = 64;

/// Minimum threshold. A threshold of one is a copy of the secret, not a share of it.
pub const MIN_REQUIRED_PARTS: usize = 2;

/// Length in bytes of the truncated digest embedded by checksummed formats.
pub const CHECKSUM_LEN: usize = 4;

/// Characters per dash-separated block in the text encoding.
pub const DASH_BLOCK_WIDTH: usize = 6;
