#![no_main]
use libfuzzer_sys::fuzz_target;

use secret_parts::decode_text;

fuzz_target!(|data: &str| {
    if let Ok(share) = decode_text(data) {
        let text = share.to_text().unwrap();
        assert_eq!(decode_text(&text).unwrap(), share);
    }
});
