#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|line: &str| {
    if let Ok(Some(record)) = hexcheck::decode_line(line) {
        let again = hexcheck::decode_line(&record.to_line());
        assert_eq!(again, Ok(Some(record)));
    }
});
