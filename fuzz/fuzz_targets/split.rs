#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use secret_parts::{recover, split, split_per_byte};

#[derive(Debug, Arbitrary)]
struct Parameters {
    pub seed: u64,
    pub secret: Vec<u8>,
    pub n_shares: u8,
    pub threshold: u8,
    pub per_byte: bool,
}

fuzz_target!(|params: Parameters| {
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let n = usize::from(params.n_shares);
    let k = usize::from(params.threshold);

    let shares = if params.per_byte {
        split_per_byte(&params.secret, n, k, &mut rng)
    } else {
        split(&params.secret, n, k, &mut rng)
    };

    if let Ok(shares) = shares {
        assert_eq!(recover(&shares[n - k..]).unwrap(), params.secret);
    }
});
