//! Modular arithmetic over arbitrary-precision integers.
//!
//! Whole-secret shares live in `Z/pZ` for a Mersenne prime `p` taken from
//! [`MERSENNE_EXPONENTS`]; everything here works for any odd prime though.

use alloc::vec;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::config::{MERSENNE_EXPONENTS, MILLER_RABIN_ROUNDS};
use crate::error::{Error, Result};

/// Returns a uniform integer in `[0, modulus)`.
///
/// Draws `modulus.bits()` random bits and resamples until the candidate falls
/// below `modulus`, so no value is favoured the way `random() % modulus` would.
pub fn random_field_element<R: rand::Rng>(modulus: &BigUint, rng: &mut R) -> BigUint {
    if modulus.is_zero() {
        return BigUint::zero();
    }

    let bits = modulus.bits() as usize;
    let bytes_len = bits.div_ceil(8);
    let top_bits = bits % 8;

    let mut buf = vec![0u8; bytes_len];
    loop {
        rng.fill(buf.as_mut_slice());
        if top_bits != 0 {
            buf[0] &= (1u8 << top_bits) - 1;
        }

        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < modulus {
            return candidate;
        }
    }
}

/// Modular inverse with the extended Euclidean algorithm.
///
/// Returns `None` when `a` and `m` are not coprime, which for a prime `m` means `a ≡ 0`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }

    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    let mut old_r = BigInt::from_biguint(Sign::Plus, a % m);
    let mut r = modulus.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = core::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = core::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }

    let mut inverse = old_s % &modulus;
    if inverse.sign() == Sign::Minus {
        inverse += &modulus;
    }
    inverse.to_biguint()
}

/// Miller-Rabin with [`MILLER_RABIN_ROUNDS`] random bases drawn from `rng`.
///
/// A composite survives with probability at most `4^-64 = 2^-128`.
pub fn is_probable_prime_rng<R: rand::Rng>(n: &BigUint, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if (n % &two).is_zero() {
        return false;
    }

    const SMALL_PRIMES: [u32; 11] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_1 = n - &one;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;
    let base_range = n - &three;

    'rounds: for _ in 0..MILLER_RABIN_ROUNDS {
        // a in [2, n - 2]
        let a = random_field_element(&base_range, rng) + &two;
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_1 {
            continue;
        }

        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_1 {
                continue 'rounds;
            }
            if x == one {
                return false;
            }
        }

        return false;
    }

    true
}

/// [`is_probable_prime_rng`] with bases from the thread-local generator.
#[cfg(feature = "std")]
pub fn is_probable_prime(n: &BigUint) -> bool {
    is_probable_prime_rng(n, &mut rand::thread_rng())
}

/// The Mersenne number `2^exponent - 1`.
pub fn mersenne(exponent: u32) -> BigUint {
    (BigUint::one() << exponent as usize) - BigUint::one()
}

/// Smallest table prime strictly greater than `secret`.
pub fn choose_modulus(secret: &BigUint) -> Result<BigUint> {
    MERSENNE_EXPONENTS
        .iter()
        .map(|e| mersenne(*e))
        .find(|p| secret < p)
        .ok_or(Error::NoSuitableModulus {
            bits: secret.bits(),
        })
}

/// Whether `modulus` is one of the primes [`choose_modulus`] hands out.
pub fn is_table_modulus(modulus: &BigUint) -> bool {
    let bits = modulus.bits();
    MERSENNE_EXPONENTS
        .iter()
        .any(|e| u64::from(*e) == bits && *modulus == mersenne(*e))
}
