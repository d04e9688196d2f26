// Clearing of secret material once it is no longer needed. Everything here is
// a no-op unless the `zeroize_memory` feature is enabled.

use num_bigint::BigUint;

#[cfg(feature = "zeroize_memory")]
use alloc::vec;

/// Overwrites the digits of `v` with zeros in place, leaving it equal to zero.
///
/// `BigUint` does not expose its digit buffer, so this rewrites it through
/// `assign_from_slice`, which reuses the existing allocation. Spare capacity
/// beyond the live digits is not touched.
#[cfg(feature = "zeroize_memory")]
pub(crate) fn wipe_biguint(v: &mut BigUint) {
    let zeros = vec![0u32; (v.bits() as usize).div_ceil(32)];
    v.assign_from_slice(&zeros);
}

#[cfg(not(feature = "zeroize_memory"))]
pub(crate) fn wipe_biguint(_: &mut BigUint) {}

#[cfg(feature = "zeroize_memory")]
pub(crate) fn wipe<Z: zeroize::Zeroize + ?Sized>(v: &mut Z) {
    v.zeroize();
}

#[cfg(not(feature = "zeroize_memory"))]
pub(crate) fn wipe<Z: ?Sized>(_: &mut Z) {}
