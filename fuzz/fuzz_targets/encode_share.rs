#![no_main]
use libfuzzer_sys::fuzz_target;

use secret_parts::Share;

fuzz_target!(|share: Share| {
    let _text = share.to_text();
    let _data = Vec::<u8>::try_from(&share);
});
