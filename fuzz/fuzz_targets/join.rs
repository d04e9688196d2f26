#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use secret_parts::{recover, Share};

#[derive(Debug, Arbitrary)]
struct Parameters {
    pub shares: Vec<Share>,
}

fuzz_target!(|params: Parameters| {
    // Recovery allocates the recorded secret length up front.
    if params.shares.iter().any(|s| s.secret_length() > 1 << 16) {
        return;
    }
    let _secret = recover(&params.shares);
});
