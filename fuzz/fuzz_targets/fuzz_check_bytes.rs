#![no_main]

use hexcheck::{ValidationMode, check_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let fast = check_bytes(data, ValidationMode::FailFast);
    let all = check_bytes(data, ValidationMode::CollectAll);
    assert!(fast.total() <= 1);
    assert_eq!(fast.first_issue(), all.first_issue());
});
