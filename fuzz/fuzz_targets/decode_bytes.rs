#![no_main]
use core::convert::TryFrom;
use libfuzzer_sys::fuzz_target;
use secret_parts::Share;

fuzz_target!(|data: &[u8]| {
    if let Ok(share) = Share::try_from(data) {
        let bytes = Vec::<u8>::try_from(&share).unwrap();
        assert_eq!(Share::try_from(bytes.as_slice()).unwrap(), share);
    }
});
