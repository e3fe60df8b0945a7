#![no_main]

use libfuzzer_sys::fuzz_target;
use unitext::{ByteOrder, REPLACEMENT_CHAR, utf16, utf8};

// Feed arbitrary byte soup to both decoders and check the contracts a
// stream relies on: a decoder never over-consumes, failure always
// reports zero units with the replacement character, and a
// resynchronizing scan (skip one unit on failure) always terminates.
fuzz_target!(|data: &[u8]| {
    let mut offset = 0;
    while offset < data.len() {
        let (cp, consumed) = utf8::decode(&data[offset..]);
        assert!(consumed <= data.len() - offset);
        assert!(consumed <= 4);
        if consumed == 0 {
            assert_eq!(cp, REPLACEMENT_CHAR);
            offset += 1;
        } else {
            offset += consumed;
        }
    }

    for order in [ByteOrder::Little, ByteOrder::Big] {
        let mut offset = 0;
        while offset + 2 <= data.len() {
            let (cp, units) = utf16::decode(&data[offset..], order);
            assert!(units <= 2);
            if units == 0 {
                assert_eq!(cp, REPLACEMENT_CHAR);
                offset += 2;
            } else {
                assert!(cp <= 0x10FFFF);
                offset += units * 2;
            }
        }
    }
});
