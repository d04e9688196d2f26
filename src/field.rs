// Arithmetic over the prime field GF(257) used by the per-byte variant.

use core::iter::{Product, Sum};
use core::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "fuzzing")]
use arbitrary::Arbitrary;

#[cfg(feature = "zeroize_memory")]
use zeroize::Zeroize;

use crate::config::PER_BYTE_PRIME;

const P: u32 = PER_BYTE_PRIME as u32;

/// An element of GF(257). Every byte value is an element; so is 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(Arbitrary))]
#[cfg_attr(feature = "zeroize_memory", derive(Zeroize))]
pub struct GF257(pub u16);

impl GF257 {
    /// Reduces any `u16` into the field.
    pub fn new(value: u16) -> Self {
        GF257((value as u32 % P) as u16)
    }

    /// Draws a uniform element by rejection over the 9-bit range `[0, 512)`.
    pub fn random<R: rand::Rng>(rng: &mut R) -> Self {
        loop {
            let candidate = rng.gen::<u16>() & 0x01ff;
            if (candidate as u32) < P {
                return GF257(candidate);
            }
        }
    }

    pub fn pow(self, mut exp: u32) -> Self {
        let mut base = self.0 as u32;
        let mut acc = 1u32;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * base % P;
            }
            base = base * base % P;
            exp >>= 1;
        }
        GF257(acc as u16)
    }

    /// Multiplicative inverse by Fermat's little theorem. Zero has none.
    pub fn inverse(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else {
            Some(self.pow(P - 2))
        }
    }
}

impl Add for GF257 {
    type Output = GF257;

    fn add(self, other: Self) -> Self::Output {
        GF257(((self.0 as u32 + other.0 as u32) % P) as u16)
    }
}

impl Sub for GF257 {
    type Output = GF257;

    fn sub(self, other: Self) -> Self::Output {
        GF257(((self.0 as u32 + P - other.0 as u32) % P) as u16)
    }
}

impl Neg for GF257 {
    type Output = GF257;

    fn neg(self) -> Self::Output {
        GF257(0) - self
    }
}

impl Mul for GF257 {
    type Output = GF257;

    fn mul(self, other: Self) -> Self::Output {
        GF257((self.0 as u32 * other.0 as u32 % P) as u16)
    }
}

impl Div for GF257 {
    type Output = GF257;

    // Callers guarantee a nonzero divisor (distinct x-coordinates).
    fn div(self, other: Self) -> Self::Output {
        debug_assert!(other.0 != 0, "division by zero in GF(257)");
        self * other.inverse().unwrap_or(GF257(0))
    }
}

impl Sum for GF257 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(GF257(0), |acc, x| acc + x)
    }
}

impl Product for GF257 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(GF257(1), |acc, x| acc * x)
    }
}
