// Polynomial construction, evaluation and Lagrange interpolation for both
// share kinds. Whole-secret polynomials live in Z/pZ over big integers,
// per-byte polynomials in GF(257).

use alloc::vec::Vec;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::arith::{mod_inverse, random_field_element};
use crate::error::{Error, Result};
use crate::field::GF257;
#[cfg(feature = "zeroize_memory")]
use crate::memory;
use crate::share::Point;

/// A polynomial over `Z/pZ` whose constant term is the secret.
///
/// Coefficients are stored from the constant term upwards.
#[derive(Clone, Debug)]
pub struct Polynomial {
    coefficients: Vec<BigUint>,
    modulus: BigUint,
}

impl Polynomial {
    /// Draws `degree` uniform coefficients in `[0, modulus)` above the constant `secret`.
    pub fn random<R: rand::Rng>(
        secret: BigUint,
        degree: usize,
        modulus: &BigUint,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(degree + 1);
        coefficients.push(secret);
        for _ in 0..degree {
            coefficients.push(random_field_element(modulus, rng));
        }

        Polynomial {
            coefficients,
            modulus: modulus.clone(),
        }
    }

    pub fn coefficients(&self) -> &[BigUint] {
        &self.coefficients
    }

    /// Horner evaluation modulo `p`.
    pub fn evaluate(&self, x: &BigUint) -> BigUint {
        self.coefficients
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, c| (acc * x + c) % &self.modulus)
    }
}

#[cfg(feature = "zeroize_memory")]
impl Drop for Polynomial {
    fn drop(&mut self) {
        self.coefficients.iter_mut().for_each(memory::wipe_biguint);
    }
}

/// Takes sample points and returns the value at `x` of the unique polynomial of
/// degree `< points.len()` through them, modulo `modulus`.
///
/// Fails with `DuplicateShare` when two points share an x-coordinate.
pub fn interpolate_at(points: &[Point], x: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    let m = BigInt::from(modulus.clone());
    let x = BigInt::from(x.clone());
    let xs: Vec<BigInt> = points.iter().map(|p| BigInt::from(p.x.clone())).collect();
    let mut result = BigUint::zero();

    for (i, p_i) in points.iter().enumerate() {
        // Share indices are small, so the products stay short until they
        // outgrow the modulus.
        let mut numerator = BigInt::one();
        let mut denominator = BigInt::one();

        for (j, x_j) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = shorten(numerator * (&x - x_j), &m);
            denominator = shorten(denominator * (&xs[i] - x_j), &m);
        }

        let inverse = match mod_inverse(&residue(denominator, &m), modulus) {
            Some(inverse) => inverse,
            None => {
                return Err(match points.iter().position(|p| p.x == p_i.x) {
                    Some(first) if first != i => Error::DuplicateShare { index: i },
                    _ => match points.iter().skip(i + 1).position(|p| p.x == p_i.x) {
                        Some(offset) => Error::DuplicateShare {
                            index: i + 1 + offset,
                        },
                        None => Error::InvalidShare("modulus is not prime"),
                    },
                })
            }
        };
        let basis = residue(numerator, &m) * inverse % modulus;
        result = (result + &p_i.y * basis) % modulus;
    }

    Ok(result)
}

fn shorten(v: BigInt, m: &BigInt) -> BigInt {
    if v.bits() > m.bits() {
        v % m
    } else {
        v
    }
}

// The representative of `v` in `[0, m)`.
fn residue(v: BigInt, m: &BigInt) -> BigUint {
    let r = v % m;
    let r = if r.sign() == Sign::Minus { r + m } else { r };
    r.into_parts().1
}

/// Finds the constant term of the polynomial through `points`:
/// `Σ y_i · Π_{j≠i} x_j / (x_j - x_i)  (mod p)`.
pub fn interpolate(points: &[Point], modulus: &BigUint) -> Result<BigUint> {
    interpolate_at(points, &BigUint::zero(), modulus)
}

// Generates `k` polynomial coefficients, being the last one `s` and the others uniform in GF(257).
// Coefficient degrees go from higher to lower in the returned vector order.
pub fn random_byte_polynomial<R: rand::Rng>(s: GF257, k: usize, rng: &mut R) -> Vec<GF257> {
    let mut poly = Vec::with_capacity(k);

    for _ in 1..k {
        poly.push(GF257::random(rng));
    }
    poly.push(s);

    poly
}

// Evaluates every byte polynomial at `x`, returning one value per byte position.
pub fn evaluate_byte_polynomials(polys: &[Vec<GF257>], x: GF257) -> Vec<GF257> {
    polys
        .iter()
        .map(|p| p.iter().fold(GF257(0), |acc, c| acc * x + *c))
        .collect()
}

// Finds the [root of the Lagrange polynomial](https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing#Computationally_efficient_approach)
// for every byte position. `xs[i]` is the x of the share whose values are `ys[i]`.
// The caller guarantees distinct nonzero xs and equal-length ys.
pub fn interpolate_bytes(xs: &[GF257], ys: &[&[GF257]]) -> Vec<GF257> {
    let bases: Vec<GF257> = xs
        .iter()
        .map(|x_i| {
            xs.iter()
                .filter(|x_j| *x_j != x_i)
                .map(|x_j| *x_j / (*x_j - *x_i))
                .product::<GF257>()
        })
        .collect();

    (0..ys[0].len())
        .map(|pos| {
            bases
                .iter()
                .zip(ys)
                .map(|(basis, y)| *basis * y[pos])
                .sum::<GF257>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::mersenne;
    use alloc::vec;
    use rand_chacha::rand_core::SeedableRng;

    fn points(poly: &Polynomial, xs: &[u32]) -> Vec<Point> {
        xs.iter()
            .map(|x| {
                let x = BigUint::from(*x);
                let y = poly.evaluate(&x);
                Point::new(x, y)
            })
            .collect()
    }

    #[test]
    fn random_polynomial_works() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let p = mersenne(61);
        let poly = Polynomial::random(BigUint::from(42u32), 2, &p, &mut rng);
        assert_eq!(poly.coefficients().len(), 3);
        assert_eq!(poly.coefficients()[0], BigUint::from(42u32));
        assert!(poly.coefficients().iter().all(|c| c < &p));
    }

    #[test]
    fn evaluate_works() {
        // x^2 + 2x + 3 mod 17
        let poly = Polynomial {
            coefficients: vec![3u32, 2, 1].into_iter().map(BigUint::from).collect(),
            modulus: BigUint::from(17u32),
        };
        assert_eq!(poly.evaluate(&BigUint::from(1u32)), BigUint::from(6u32));
        assert_eq!(poly.evaluate(&BigUint::from(2u32)), BigUint::from(11u32));
        assert_eq!(poly.evaluate(&BigUint::from(5u32)), BigUint::from(4u32));
        assert_eq!(poly.evaluate(&BigUint::zero()), BigUint::from(3u32));
    }

    #[test]
    fn interpolate_works() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let p = mersenne(127);
        let secret = BigUint::from(0xdead_beefu32);
        let poly = Polynomial::random(secret.clone(), 9, &p, &mut rng);
        let pts = points(&poly, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(interpolate(&pts, &p).unwrap(), secret);
    }

    #[test]
    fn interpolate_ignores_point_order() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x11; 32]);
        let p = mersenne(89);
        let secret = BigUint::from(7u32);
        let poly = Polynomial::random(secret.clone(), 2, &p, &mut rng);
        let pts = points(&poly, &[9, 2, 250]);
        assert_eq!(interpolate(&pts, &p).unwrap(), secret);
    }

    #[test]
    fn interpolate_at_recovers_other_samples() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x22; 32]);
        let p = mersenne(61);
        let poly = Polynomial::random(BigUint::from(5u32), 3, &p, &mut rng);
        let pts = points(&poly, &[1, 2, 3, 4]);
        let x = BigUint::from(77u32);
        assert_eq!(interpolate_at(&pts, &x, &p).unwrap(), poly.evaluate(&x));
    }

    #[test]
    fn interpolate_at_large_x_and_threshold() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x33; 32]);
        let p = mersenne(521);
        let poly = Polynomial::random(BigUint::from(9u32), 199, &p, &mut rng);
        let xs: Vec<u32> = (1..=200).collect();
        let pts = points(&poly, &xs);
        assert_eq!(interpolate(&pts, &p).unwrap(), BigUint::from(9u32));

        let x = &p - BigUint::from(3u32);
        assert_eq!(interpolate_at(&pts, &x, &p).unwrap(), poly.evaluate(&x));
    }

    #[test]
    fn interpolate_rejects_repeated_x() {
        let p = BigUint::from(257u32);
        let pts = vec![
            Point::new(BigUint::from(3u32), BigUint::from(1u32)),
            Point::new(BigUint::from(3u32), BigUint::from(2u32)),
        ];
        assert!(matches!(
            interpolate(&pts, &p),
            Err(Error::DuplicateShare { .. })
        ));
    }

    #[test]
    fn random_byte_polynomial_works() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let poly = random_byte_polynomial(GF257(1), 3, &mut rng);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly[2], GF257(1));
    }

    #[test]
    fn byte_evaluator_works() {
        // 3x^2 + 2x + 5
        let polys = vec![vec![GF257(3), GF257(2), GF257(5)]];
        assert_eq!(evaluate_byte_polynomials(&polys, GF257(1)), vec![GF257(10)]);
        assert_eq!(evaluate_byte_polynomials(&polys, GF257(2)), vec![GF257(21)]);
        assert_eq!(evaluate_byte_polynomials(&polys, GF257(10)), vec![GF257(68)]);
    }

    #[test]
    fn interpolate_bytes_works() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let polys = vec![
            random_byte_polynomial(GF257(185), 10, &mut rng),
            random_byte_polynomial(GF257(0), 10, &mut rng),
            random_byte_polynomial(GF257(255), 10, &mut rng),
        ];
        let xs: Vec<GF257> = (1..=10).map(GF257).collect();
        let values: Vec<Vec<GF257>> = xs
            .iter()
            .map(|x| evaluate_byte_polynomials(&polys, *x))
            .collect();
        let ys: Vec<&[GF257]> = values.iter().map(|v| v.as_slice()).collect();
        assert_eq!(
            interpolate_bytes(&xs, &ys),
            vec![GF257(185), GF257(0), GF257(255)]
        );
    }
}
